//! Dashboard settings.
//!
//! Every field has a default so a partial TOML table (or none at all) yields
//! a usable configuration.

use crate::classify::DataSeries;
use crate::notify::{NotificationCenter, DEFAULT_CAPACITY, DEFAULT_TTL_MS};
use crate::series::TimeRange;
use crate::timeline::{Playback, BASE_TICK_MS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Days before "now" covered by the initial time range.
    pub days_before: i64,
    /// Days after "now" covered by the initial time range.
    pub days_after: i64,
    /// Data source assigned to newly drawn regions.
    pub default_data_source: String,
    pub data_sources: Vec<DataSeries>,
    pub notification_capacity: usize,
    pub notification_ttl_ms: i64,
    /// Tick period at 1× playback speed.
    pub playback_tick_ms: u64,
    pub weather_seed: u64,
    /// Artificial delay of the synthetic weather fetch.
    pub weather_latency_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            days_before: 15,
            days_after: 15,
            default_data_source: "temperature".to_string(),
            data_sources: DataSeries::builtin(),
            notification_capacity: DEFAULT_CAPACITY,
            notification_ttl_ms: DEFAULT_TTL_MS,
            playback_tick_ms: BASE_TICK_MS,
            weather_seed: 42,
            weather_latency_ms: 500,
        }
    }
}

impl DashboardConfig {
    pub fn initial_range(&self, now: DateTime<Utc>) -> TimeRange {
        TimeRange::around(now, self.days_before, self.days_after)
    }

    pub fn notification_center(&self) -> NotificationCenter {
        NotificationCenter::new(self.notification_capacity, self.notification_ttl_ms)
    }

    pub fn playback(&self, range: TimeRange) -> Playback {
        Playback::new(range).with_base_tick_ms(self.playback_tick_ms)
    }
}
