//! Transient user notifications.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How many notifications are kept at once.
pub const DEFAULT_CAPACITY: usize = 5;

/// Lifetime of a notification before it is dismissed automatically.
pub const DEFAULT_TTL_MS: i64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.timestamp) >= ttl
    }
}

/// Newest-first list of live notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
    capacity: usize,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL_MS)
    }
}

impl NotificationCenter {
    pub fn new(capacity: usize, ttl_ms: i64) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            capacity: capacity.max(1),
            ttl: Duration::milliseconds(ttl_ms.max(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Add a notification at the front, dropping the oldest beyond capacity.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(
            0,
            Notification {
                id,
                kind,
                title: title.into(),
                message: message.into(),
                timestamp: now,
            },
        );
        self.items.truncate(self.capacity);
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Remove everything older than the lifetime. Returns how many went.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        let ttl = self.ttl;
        self.items.retain(|n| !n.expired(now, ttl));
        before - self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn region_created(&mut self, vertex_count: usize, now: DateTime<Utc>) -> u64 {
        self.push(
            NotificationKind::Success,
            "Polygon Created",
            format!("New polygon added with {} points", vertex_count),
            now,
        )
    }

    pub fn region_deleted(&mut self, now: DateTime<Utc>) -> u64 {
        self.push(
            NotificationKind::Info,
            "Polygon Deleted",
            "Polygon removed from analysis",
            now,
        )
    }

    pub fn data_refreshed(&mut self, region_count: usize, now: DateTime<Utc>) -> u64 {
        self.push(
            NotificationKind::Success,
            "Data Updated",
            format!("Weather data refreshed for {} polygon(s)", region_count),
            now,
        )
    }

    pub fn data_error(&mut self, now: DateTime<Utc>) -> u64 {
        self.push(
            NotificationKind::Error,
            "Data Error",
            "Failed to fetch weather data",
            now,
        )
    }

    pub fn exported(&mut self, now: DateTime<Utc>) -> u64 {
        self.push(
            NotificationKind::Success,
            "Data Exported",
            "Project data exported successfully",
            now,
        )
    }

    /// Report a rejected drawing action.
    pub fn drawing_refused(&mut self, reason: &crate::DashboardError, now: DateTime<Utc>) -> u64 {
        self.push(NotificationKind::Warning, "Drawing", reason.to_string(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_newest_first_and_capped() {
        let mut center = NotificationCenter::default();
        for i in 0..7 {
            center.push(NotificationKind::Info, format!("n{}", i), "", now());
        }
        assert_eq!(center.len(), 5);
        let titles: Vec<_> = center.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["n6", "n5", "n4", "n3", "n2"]);
    }

    #[test]
    fn test_expire_after_ttl() {
        let mut center = NotificationCenter::default();
        center.region_created(4, now());
        center.data_error(now() + Duration::seconds(3));
        assert_eq!(center.expire(now() + Duration::milliseconds(4999)), 0);
        assert_eq!(center.expire(now() + Duration::seconds(5)), 1);
        assert_eq!(center.as_slice()[0].kind, NotificationKind::Error);
        assert_eq!(center.expire(now() + Duration::seconds(8)), 1);
        assert!(center.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut center = NotificationCenter::default();
        let id = center.data_refreshed(2, now());
        assert_eq!(
            center.as_slice()[0].message,
            "Weather data refreshed for 2 polygon(s)"
        );
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
    }

    #[test]
    fn test_drawing_refused_message() {
        let mut center = NotificationCenter::default();
        center.drawing_refused(
            &crate::DashboardError::InsufficientPoints { needed: 3, found: 1 },
            now(),
        );
        assert_eq!(
            center.as_slice()[0].message,
            "Polygon must have at least 3 points (found: 1)"
        );
    }
}
