//! Weather collaborator for the region map.
//!
//! - `WeatherSource`: async, fallible hourly sample provider
//! - `SyntheticWeather`: seeded generator standing in for a real API
//! - `fetch_all` / `refresh_regions`: fetch samples for every region and
//!   record them in a [`SampleCache`]

pub mod error;
pub mod synthetic;

pub use error::{Result, WeatherError};
pub use synthetic::SyntheticWeather;

use chrono::{DateTime, Utc};
use log::{info, warn};
use wxmap_core::cache::{ApplyOutcome, SampleCache};
use wxmap_core::geom::WorldPoint;
use wxmap_core::region::{RegionId, RegionSet};
use wxmap_core::series::{SampleSeries, TimeRange};

/// Provider of hourly samples for a location.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn fetch_samples(
        &self,
        latitude: f64,
        longitude: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SampleSeries>;
}

/// Where to sample a region: its centroid, read as (latitude, longitude).
pub fn fetch_targets(regions: &RegionSet) -> Vec<(RegionId, WorldPoint)> {
    regions
        .iter()
        .map(|r| (r.id().clone(), r.centroid()))
        .collect()
}

/// Fetch every target in order. One failure does not stop the rest.
pub async fn fetch_all<S: WeatherSource>(
    source: &S,
    targets: Vec<(RegionId, WorldPoint)>,
    range: TimeRange,
) -> Vec<(RegionId, Result<SampleSeries>)> {
    let mut results = Vec::with_capacity(targets.len());
    for (id, at) in targets {
        let fetched = source.fetch_samples(at.x, at.y, range.start, range.end).await;
        if let Err(e) = &fetched {
            warn!("weather fetch failed for {}: {}", id, e);
        }
        results.push((id, fetched));
    }
    results
}

/// Tally of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    pub stored: usize,
    pub failed: usize,
    pub stale: usize,
}

impl RefreshReport {
    pub fn ok(&self) -> bool {
        self.failed == 0
    }
}

/// Record fetch results made under `generation`.
pub fn apply_results(
    cache: &mut SampleCache,
    generation: u64,
    results: Vec<(RegionId, Result<SampleSeries>)>,
) -> RefreshReport {
    let mut report = RefreshReport::default();
    for (id, result) in results {
        match cache.apply(generation, id, result) {
            ApplyOutcome::Stored => report.stored += 1,
            ApplyOutcome::Retained => report.failed += 1,
            ApplyOutcome::Stale => report.stale += 1,
        }
    }
    report
}

/// Refresh the cache for every region and drop entries of deleted regions.
pub async fn refresh_regions<S: WeatherSource>(
    source: &S,
    cache: &mut SampleCache,
    regions: &RegionSet,
    range: TimeRange,
) -> RefreshReport {
    let generation = cache.begin_refresh();
    let results = fetch_all(source, fetch_targets(regions), range).await;
    let report = apply_results(cache, generation, results);
    cache.retain_regions(&regions.ids());
    info!(
        "refreshed {} region(s), {} failed",
        report.stored, report.failed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;
    use wxmap_core::drawing::DrawingTool;
    use wxmap_core::geom::{CanvasSize, ScreenPoint};
    use wxmap_core::series::TEMPERATURE;
    use wxmap_core::viewport::Viewport;

    /// Fails every call after the first `ok_calls`.
    struct Flaky {
        inner: SyntheticWeather,
        ok_calls: Cell<usize>,
    }

    impl WeatherSource for Flaky {
        async fn fetch_samples(
            &self,
            latitude: f64,
            longitude: f64,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<SampleSeries> {
            if self.ok_calls.get() == 0 {
                return Err(WeatherError::Unavailable("offline".to_string()));
            }
            self.ok_calls.set(self.ok_calls.get() - 1);
            self.inner.fetch_samples(latitude, longitude, start, end).await
        }
    }

    fn range() -> TimeRange {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeRange::try_new(start, start + Duration::hours(24)).unwrap()
    }

    fn regions(n: usize) -> RegionSet {
        let canvas = CanvasSize::new(800.0, 600.0);
        let vp = Viewport::default();
        let mut tool = DrawingTool::new();
        let mut set = RegionSet::new();
        for i in 0..n {
            let x = 40.0 + 120.0 * i as f64;
            tool.start();
            for p in [
                ScreenPoint::new(x, 40.0),
                ScreenPoint::new(x + 80.0, 40.0),
                ScreenPoint::new(x + 40.0, 120.0),
            ] {
                tool.click(p, &vp, canvas, "temperature").unwrap();
            }
            set.insert(tool.complete(&vp, canvas, "temperature").unwrap());
        }
        set
    }

    #[tokio::test]
    async fn test_refresh_fills_cache() {
        let set = regions(2);
        let mut cache = SampleCache::new();
        let report = refresh_regions(&SyntheticWeather::new(5), &mut cache, &set, range()).await;
        assert_eq!(report, RefreshReport { stored: 2, failed: 0, stale: 0 });
        for id in set.ids() {
            assert_eq!(cache.get(&id).unwrap().field(TEMPERATURE).unwrap().len(), 24);
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_samples() {
        let set = regions(2);
        let mut cache = SampleCache::new();
        refresh_regions(&SyntheticWeather::new(5), &mut cache, &set, range()).await;
        let before = cache.get(&set.ids()[1]).cloned();

        let flaky = Flaky {
            inner: SyntheticWeather::new(6),
            ok_calls: Cell::new(1),
        };
        let report = refresh_regions(&flaky, &mut cache, &set, range()).await;
        assert_eq!(report.stored, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.ok());
        assert_eq!(cache.get(&set.ids()[1]).cloned(), before);
    }

    #[tokio::test]
    async fn test_superseded_refresh_is_dropped() {
        let set = regions(1);
        let mut cache = SampleCache::new();
        let old = cache.begin_refresh();
        let results = fetch_all(&SyntheticWeather::new(1), fetch_targets(&set), range()).await;
        cache.begin_refresh();
        let report = apply_results(&mut cache, old, results);
        assert_eq!(report.stale, 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_regions_are_evicted() {
        let mut set = regions(2);
        let mut cache = SampleCache::new();
        refresh_regions(&SyntheticWeather::new(5), &mut cache, &set, range()).await;
        let gone = set.ids()[0].clone();
        set.remove(&gone);
        refresh_regions(&SyntheticWeather::new(5), &mut cache, &set, range()).await;
        assert!(cache.get(&gone).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_weather_error_becomes_fetch_error() {
        let err: wxmap_core::DashboardError = WeatherError::InvertedRange.into();
        assert!(matches!(err, wxmap_core::DashboardError::DataFetch(_)));
    }
}
