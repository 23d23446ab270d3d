//! Deterministic pseudo-random hourly weather.

use crate::error::{Result, WeatherError};
use crate::WeatherSource;
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use wxmap_core::series::{
    SampleSeries, TimeRange, PRECIPITATION, RELATIVE_HUMIDITY, TEMPERATURE, WIND_SPEED,
};

/// Chance that an hour has any precipitation.
const RAIN_PROBABILITY: f64 = 0.1;

/// Samples derived from coordinates, calendar position and a seeded RNG.
///
/// The same seed, coordinates and range always produce the same series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticWeather {
    seed: u64,
}

impl SyntheticWeather {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, lat: f64, lon: f64, start: DateTime<Utc>) -> StdRng {
        let mix = self.seed
            ^ lat.to_bits().rotate_left(17)
            ^ lon.to_bits().rotate_left(41)
            ^ (start.timestamp() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        StdRng::seed_from_u64(mix)
    }

    /// Build the series synchronously.
    pub fn generate(
        &self,
        lat: f64,
        lon: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SampleSeries> {
        if !(lat.is_finite() && lon.is_finite()) {
            return Err(WeatherError::InvalidCoordinates { lat, lon });
        }
        let range = TimeRange::try_new(start, end).map_err(|_| WeatherError::InvertedRange)?;
        let hours = range.total_hours();
        let mut rng = self.rng_for(lat, lon, start);

        let base = 15.0 + lat / 10.0 + lon / 20.0;
        let mut time = Vec::with_capacity(hours);
        let mut temperature = Vec::with_capacity(hours);
        let mut humidity = Vec::with_capacity(hours);
        let mut precipitation = Vec::with_capacity(hours);
        let mut wind = Vec::with_capacity(hours);

        for h in 0..hours {
            let t = start + Duration::hours(h as i64);
            let diurnal = ((t.hour() as f64 - 6.0) * PI / 12.0).sin() * 8.0;
            let seasonal = ((t.ordinal() as f64 - 80.0) * 2.0 * PI / 365.0).sin() * 15.0;
            let noise = rng.gen_range(-2.0..2.0);

            time.push(t);
            temperature.push(round1(base + diurnal + seasonal + noise));
            humidity.push(round1(rng.gen_range(50.0..90.0)));
            let rain = if rng.gen_bool(RAIN_PROBABILITY) {
                rng.gen_range(0.0..5.0)
            } else {
                0.0
            };
            precipitation.push(round1(rain));
            wind.push(round1(rng.gen_range(5.0..20.0)));
        }

        let mut fields = BTreeMap::new();
        fields.insert(TEMPERATURE.to_string(), temperature);
        fields.insert(RELATIVE_HUMIDITY.to_string(), humidity);
        fields.insert(PRECIPITATION.to_string(), precipitation);
        fields.insert(WIND_SPEED.to_string(), wind);
        Ok(SampleSeries::try_new(time, fields)?)
    }
}

impl WeatherSource for SyntheticWeather {
    async fn fetch_samples(
        &self,
        latitude: f64,
        longitude: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SampleSeries> {
        self.generate(latitude, longitude, start, end)
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
