//! Time ranges and hourly sample series.
//!
//! Weather payloads arrive as loosely shaped JSON (an `hourly` object with a
//! `time` array and one array per field). They are checked once, here, and
//! turned into a [`SampleSeries`]; nothing downstream re-validates.

use crate::error::{DashboardError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Air temperature 2 m above ground (°C).
pub const TEMPERATURE: &str = "temperature_2m";
/// Relative humidity 2 m above ground (%).
pub const RELATIVE_HUMIDITY: &str = "relative_humidity_2m";
/// Precipitation (mm).
pub const PRECIPITATION: &str = "precipitation";
/// Wind speed 10 m above ground (km/h).
pub const WIND_SPEED: &str = "wind_speed_10m";

/// Display unit for a known field key, empty for anything else.
pub fn field_unit(field: &str) -> &'static str {
    match field {
        TEMPERATURE => "°C",
        RELATIVE_HUMIDITY => "%",
        PRECIPITATION => "mm",
        WIND_SPEED => "km/h",
        _ => "",
    }
}

/// Whole hours elapsed from `start` to `current`; `None` before `start`.
pub fn hour_index(start: DateTime<Utc>, current: DateTime<Utc>) -> Option<usize> {
    let elapsed = current.signed_duration_since(start);
    if elapsed < Duration::zero() {
        return None;
    }
    usize::try_from(elapsed.num_hours()).ok()
}

/// The active analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// A range; `end` must not precede `start`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(DashboardError::InvalidTimeRange(format!(
                "end {} precedes start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// `days_before` days before `now` through `days_after` days after it.
    pub fn around(now: DateTime<Utc>, days_before: i64, days_after: i64) -> Self {
        Self {
            start: now - Duration::days(days_before.max(0)),
            end: now + Duration::days(days_after.max(0)),
        }
    }

    /// Number of whole hours in the range.
    pub fn total_hours(&self) -> usize {
        hour_index(self.start, self.end).unwrap_or(0)
    }

    /// Start of the `hour`-th hour of the range.
    pub fn hour_start(&self, hour: usize) -> DateTime<Utc> {
        self.start + Duration::hours(hour as i64)
    }

    /// Hourly instants `start, start + 1h, ...` covering [`Self::total_hours`].
    pub fn hours(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.total_hours()).map(move |h| self.hour_start(h))
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn clamp(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        t.clamp(self.start, self.end)
    }
}

/// Hourly samples for one region: strictly increasing timestamps and, per
/// field, one value per timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSeries {
    #[serde(rename = "time")]
    timestamps: Vec<DateTime<Utc>>,
    #[serde(flatten)]
    fields: BTreeMap<String, Vec<f64>>,
}

impl SampleSeries {
    /// Validate and build a series.
    pub fn try_new(
        timestamps: Vec<DateTime<Utc>>,
        fields: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        if let Some(i) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(DashboardError::InvalidSeries(format!(
                "timestamps not strictly increasing at index {}",
                i + 1
            )));
        }
        if let Some((key, values)) = fields.iter().find(|(_, v)| v.len() != timestamps.len()) {
            return Err(DashboardError::InvalidSeries(format!(
                "field '{}' has {} samples for {} timestamps",
                key,
                values.len(),
                timestamps.len()
            )));
        }
        Ok(Self { timestamps, fields })
    }

    /// Ingest a weather payload of the form
    /// `{"hourly": {"time": [...], "<field>": [...], ...}}`.
    ///
    /// Non-numeric entries inside a field array become NaN, which no rule
    /// matches.
    pub fn from_hourly_json(payload: &serde_json::Value) -> Result<Self> {
        let hourly = payload
            .get("hourly")
            .and_then(|h| h.as_object())
            .ok_or_else(|| DashboardError::InvalidSeries("missing 'hourly' object".to_string()))?;

        let times = hourly
            .get("time")
            .and_then(|t| t.as_array())
            .ok_or_else(|| DashboardError::InvalidSeries("missing 'hourly.time' array".to_string()))?;
        let timestamps = times
            .iter()
            .map(|t| {
                t.as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok_or_else(|| DashboardError::InvalidSeries(format!("bad timestamp {}", t)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut fields = BTreeMap::new();
        for (key, value) in hourly.iter().filter(|(k, _)| k.as_str() != "time") {
            let Some(values) = value.as_array() else {
                continue;
            };
            let samples = values
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect();
            fields.insert(key.clone(), samples);
        }

        Self::try_new(timestamps, fields)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn field(&self, key: &str) -> Option<&[f64]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Sample `index` of field `key`, if both exist.
    pub fn sample(&self, key: &str, index: usize) -> Option<f64> {
        self.fields.get(key)?.get(index).copied()
    }

    /// Index of the first timestamp at or after `t`.
    pub fn index_at_or_after(&self, t: DateTime<Utc>) -> Option<usize> {
        let idx = self.timestamps.partition_point(|ts| *ts < t);
        (idx < self.timestamps.len()).then_some(idx)
    }
}
