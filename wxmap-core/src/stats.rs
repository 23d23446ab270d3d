//! Live averages across regions for the stats panel.

use crate::cache::SampleCache;
use crate::classify::DataSeries;
use crate::region::RegionSet;
use crate::series::field_unit;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Average of one data source at the current time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStat {
    pub source_id: String,
    pub display_name: String,
    pub unit: &'static str,
    /// `None` when no region had a sample.
    pub average: Option<f64>,
    pub contributing: usize,
}

/// Mean of `field` over every region with a cached series, taking from each
/// the first sample at or after `current`. Non-finite samples are skipped.
pub fn field_average(
    regions: &RegionSet,
    cache: &SampleCache,
    field: &str,
    current: DateTime<Utc>,
) -> (Option<f64>, usize) {
    let (total, count) = regions
        .iter()
        .filter_map(|r| cache.get(r.id()))
        .filter_map(|series| {
            let idx = series.index_at_or_after(current)?;
            series.sample(field, idx)
        })
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        (None, 0)
    } else {
        (Some(total / count as f64), count)
    }
}

/// One [`SourceStat`] per data source, in catalog order.
pub fn source_stats(
    regions: &RegionSet,
    cache: &SampleCache,
    sources: &[DataSeries],
    current: DateTime<Utc>,
) -> Vec<SourceStat> {
    sources
        .iter()
        .map(|s| {
            let (average, contributing) =
                field_average(regions, cache, &s.sample_field_key, current);
            SourceStat {
                source_id: s.id.clone(),
                display_name: s.display_name.clone(),
                unit: field_unit(&s.sample_field_key),
                average,
                contributing,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::DrawingTool;
    use crate::geom::{CanvasSize, ScreenPoint};
    use crate::series::{SampleSeries, TEMPERATURE};
    use crate::viewport::Viewport;
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeMap;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn regions(n: usize) -> RegionSet {
        let mut tool = DrawingTool::new();
        let mut set = RegionSet::new();
        let canvas = CanvasSize::new(800.0, 600.0);
        for i in 0..n {
            let x = 50.0 + 100.0 * i as f64;
            tool.start();
            for p in [
                ScreenPoint::new(x, 50.0),
                ScreenPoint::new(x + 50.0, 50.0),
                ScreenPoint::new(x, 100.0),
            ] {
                tool.click(p, &Viewport::default(), canvas, "temperature").unwrap();
            }
            set.insert(tool.complete(&Viewport::default(), canvas, "temperature").unwrap());
        }
        set
    }

    fn series(values: &[f64]) -> SampleSeries {
        let ts = (0..values.len())
            .map(|h| start() + Duration::hours(h as i64))
            .collect();
        let mut fields = BTreeMap::new();
        fields.insert(TEMPERATURE.to_string(), values.to_vec());
        SampleSeries::try_new(ts, fields).unwrap()
    }

    #[test]
    fn test_average_uses_first_sample_at_or_after() {
        let set = regions(3);
        let ids = set.ids();
        let mut cache = SampleCache::new();
        cache.insert(ids[0].clone(), series(&[10.0, 20.0]));
        cache.insert(ids[1].clone(), series(&[30.0, 40.0]));

        let at = start() + Duration::minutes(30);
        assert_eq!(field_average(&set, &cache, TEMPERATURE, at), (Some(30.0), 2));
        assert_eq!(field_average(&set, &cache, TEMPERATURE, start()), (Some(20.0), 2));
        assert_eq!(
            field_average(&set, &cache, TEMPERATURE, start() + Duration::hours(5)),
            (None, 0)
        );
    }

    #[test]
    fn test_source_stats_per_catalog_entry() {
        let set = regions(1);
        let mut cache = SampleCache::new();
        cache.insert(set.ids()[0].clone(), series(&[12.5]));
        let stats = source_stats(&set, &cache, &DataSeries::builtin(), start());
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].average, Some(12.5));
        assert_eq!(stats[0].unit, "°C");
        assert_eq!(stats[1].average, None);
    }
}
