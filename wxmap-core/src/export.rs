//! JSON snapshot of the dashboard for download.

use crate::cache::SampleCache;
use crate::classify::DataSeries;
use crate::region::{Region, RegionId};
use crate::series::{SampleSeries, TimeRange};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the user can see, borrowed from the live state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot<'a> {
    pub polygons: &'a [Region],
    pub data_sources: &'a [DataSeries],
    pub time_range: TimeRange,
    pub current_time: DateTime<Utc>,
    pub weather_data: BTreeMap<&'a RegionId, &'a SampleSeries>,
}

impl<'a> ExportSnapshot<'a> {
    pub fn new(
        polygons: &'a [Region],
        data_sources: &'a [DataSeries],
        time_range: TimeRange,
        current_time: DateTime<Utc>,
        cache: &'a SampleCache,
    ) -> Self {
        Self {
            polygons,
            data_sources,
            time_range,
            current_time,
            weather_data: cache.iter().collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `geospatial-data-YYYY-MM-DD.json` for the day of `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("geospatial-data-{}.json", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::DrawingTool;
    use crate::geom::{CanvasSize, ScreenPoint};
    use crate::viewport::Viewport;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 7, 4, 23, 59, 0).unwrap();
        assert_eq!(export_file_name(now), "geospatial-data-2024-07-04.json");
    }

    #[test]
    fn test_snapshot_keys() {
        let vp = Viewport::default();
        let canvas = CanvasSize::new(400.0, 400.0);
        let mut tool = DrawingTool::new();
        tool.start();
        for p in [
            ScreenPoint::new(10.0, 10.0),
            ScreenPoint::new(60.0, 10.0),
            ScreenPoint::new(10.0, 60.0),
        ] {
            tool.click(p, &vp, canvas, "humidity").unwrap();
        }
        let regions = vec![tool.complete(&vp, canvas, "humidity").unwrap()];
        let sources = DataSeries::builtin();
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let range = TimeRange::try_new(start, start + Duration::days(1)).unwrap();
        let cache = SampleCache::new();

        let snapshot = ExportSnapshot::new(&regions, &sources, range, start, &cache);
        let json: serde_json::Value =
            serde_json::from_str(&snapshot.to_json_pretty().unwrap()).unwrap();
        for key in ["polygons", "dataSources", "timeRange", "currentTime", "weatherData"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["polygons"][0]["dataSourceId"], "humidity");
        assert_eq!(json["dataSources"].as_array().unwrap().len(), 4);
    }
}
