//! Per-region sample cache.
//!
//! Fetches are asynchronous and may finish out of order. Each refresh is
//! stamped with a generation; results from an older generation than the
//! latest started one are dropped. A failed fetch leaves whatever the region
//! had cached before.

use crate::region::RegionId;
use crate::series::SampleSeries;
use log::{debug, warn};
use std::collections::HashMap;

/// What happened to one fetch result handed to [`SampleCache::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Stored,
    /// Result belongs to a superseded refresh.
    Stale,
    /// Fetch failed; previous series, if any, kept.
    Retained,
}

#[derive(Debug, Clone, Default)]
pub struct SampleCache {
    entries: HashMap<RegionId, SampleSeries>,
    generation: u64,
}

impl SampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new refresh and return its generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        debug!("sample refresh generation {}", self.generation);
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record the result of a fetch started under `generation`.
    pub fn apply<E: std::fmt::Display>(
        &mut self,
        generation: u64,
        id: RegionId,
        result: std::result::Result<SampleSeries, E>,
    ) -> ApplyOutcome {
        if generation < self.generation {
            debug!("dropping stale samples for {} (gen {})", id, generation);
            return ApplyOutcome::Stale;
        }
        match result {
            Ok(series) => {
                self.entries.insert(id, series);
                ApplyOutcome::Stored
            }
            Err(e) => {
                warn!("keeping previous samples for {}: {}", id, e);
                ApplyOutcome::Retained
            }
        }
    }

    /// Store a series directly, bypassing generation checks.
    pub fn insert(&mut self, id: RegionId, series: SampleSeries) {
        self.entries.insert(id, series);
    }

    pub fn get(&self, id: &RegionId) -> Option<&SampleSeries> {
        self.entries.get(id)
    }

    pub fn evict(&mut self, id: &RegionId) -> Option<SampleSeries> {
        self.entries.remove(id)
    }

    /// Drop entries whose region is not in `ids`.
    pub fn retain_regions(&mut self, ids: &[RegionId]) {
        self.entries.retain(|id, _| ids.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &SampleSeries)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TEMPERATURE;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn one_sample(value: f64) -> SampleSeries {
        let mut fields = BTreeMap::new();
        fields.insert(TEMPERATURE.to_string(), vec![value]);
        SampleSeries::try_new(
            vec![Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()],
            fields,
        )
        .unwrap()
    }

    fn id(n: u64) -> RegionId {
        RegionId::from_sequence(n)
    }

    #[test]
    fn test_stale_results_are_ignored() {
        let mut cache = SampleCache::new();
        let first = cache.begin_refresh();
        let second = cache.begin_refresh();

        let ok: Result<_, String> = Ok(one_sample(2.0));
        assert_eq!(cache.apply(second, id(1), ok), ApplyOutcome::Stored);
        let late: Result<_, String> = Ok(one_sample(1.0));
        assert_eq!(cache.apply(first, id(1), late), ApplyOutcome::Stale);
        assert_eq!(cache.get(&id(1)).unwrap().sample(TEMPERATURE, 0), Some(2.0));
    }

    #[test]
    fn test_failure_retains_previous_series() {
        let mut cache = SampleCache::new();
        let g = cache.begin_refresh();
        cache.apply::<String>(g, id(1), Ok(one_sample(7.0)));
        let g = cache.begin_refresh();
        let outcome = cache.apply(g, id(1), Err("timeout".to_string()));
        assert_eq!(outcome, ApplyOutcome::Retained);
        assert_eq!(cache.get(&id(1)).unwrap().sample(TEMPERATURE, 0), Some(7.0));
    }

    #[test]
    fn test_last_write_wins_within_generation() {
        let mut cache = SampleCache::new();
        let g = cache.begin_refresh();
        cache.apply::<String>(g, id(1), Ok(one_sample(1.0)));
        cache.apply::<String>(g, id(1), Ok(one_sample(3.0)));
        assert_eq!(cache.get(&id(1)).unwrap().sample(TEMPERATURE, 0), Some(3.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_and_retain() {
        let mut cache = SampleCache::new();
        cache.insert(id(1), one_sample(1.0));
        cache.insert(id(2), one_sample(2.0));
        cache.insert(id(3), one_sample(3.0));

        assert!(cache.evict(&id(2)).is_some());
        assert!(cache.evict(&id(2)).is_none());
        cache.retain_regions(&[id(3)]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&id(3)).is_some());
    }
}
