//! Offline replay of a scenario: per-hour region colors as CSV.

use crate::scenario::Scenario;
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use wxmap_core::cache::SampleCache;
use wxmap_core::classify::{find_source, region_color, sample_at, DataSeries};
use wxmap_core::region::RegionSet;
use wxmap_core::render::{render, Frame, Scene, Theme};
use wxmap_core::series::TimeRange;
use wxmap_weather::{refresh_regions, SyntheticWeather};

/// One region at one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRow {
    pub timestamp: String,
    pub region_id: String,
    pub data_source: String,
    /// Empty when the region had no sample for the hour
    pub value: Option<f64>,
    pub color: String,
}

/// Regions, samples and range of a scenario after drawing and fetching.
pub struct Replay {
    pub scenario: Scenario,
    pub regions: RegionSet,
    pub range: TimeRange,
    pub cache: SampleCache,
}

impl Replay {
    /// Draw the scenario's shapes and fetch samples for them.
    pub async fn prepare(scenario: Scenario) -> anyhow::Result<Self> {
        let regions = scenario.build_regions()?;
        let range = scenario.time_range()?;
        let source = SyntheticWeather::new(scenario.config.weather_seed);
        let mut cache = SampleCache::new();
        let report = refresh_regions(&source, &mut cache, &regions, range).await;
        if !report.ok() {
            warn!("{} region(s) have no samples", report.failed);
        }
        Ok(Self {
            scenario,
            regions,
            range,
            cache,
        })
    }

    pub fn sources(&self) -> &[DataSeries] {
        &self.scenario.config.data_sources
    }

    /// Colors of every region at `at`, in region order.
    pub fn rows_at(&self, at: DateTime<Utc>) -> Vec<ColorRow> {
        let sources = self.sources();
        self.regions
            .iter()
            .map(|region| {
                let series = self.cache.get(region.id());
                let value = find_source(sources, region.data_source_id())
                    .and_then(|s| sample_at(s, series, self.range.start, at));
                ColorRow {
                    timestamp: at.to_rfc3339(),
                    region_id: region.id().to_string(),
                    data_source: region.data_source_id().to_string(),
                    value,
                    color: region_color(region, sources, series, self.range.start, at).to_string(),
                }
            })
            .collect()
    }

    /// Every hour of the range times every region.
    pub fn rows(&self) -> Vec<ColorRow> {
        self.range.hours().flat_map(|t| self.rows_at(t)).collect()
    }

    /// The map as it would be painted at `at`.
    pub fn frame_at(&self, at: DateTime<Utc>) -> Frame {
        render(&Scene {
            canvas: self.scenario.canvas,
            viewport: &self.scenario.viewport,
            regions: &self.regions,
            sources: self.sources(),
            samples: &self.cache,
            range_start: self.range.start,
            current_time: at,
            drawing: &[],
            pointer: None,
            hovered: None,
            theme: Theme::Light,
        })
    }
}

pub fn write_rows(path: &str, rows: &[ColorRow]) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub async fn run_simulate(
    scenario_path: &str,
    output_csv: &str,
    frame_json: Option<&str>,
) -> anyhow::Result<()> {
    let replay = Replay::prepare(Scenario::load(scenario_path)?).await?;
    let rows = replay.rows();
    write_rows(output_csv, &rows)?;
    info!("wrote {} rows to {}", rows.len(), output_csv);

    if let Some(path) = frame_json {
        let frame = replay.frame_at(replay.range.start);
        std::fs::write(path, serde_json::to_string_pretty(&frame)?)
            .with_context(|| format!("writing {}", path))?;
        info!("wrote {} draw commands to {}", frame.commands.len(), path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxmap_core::render::DrawCommand;

    fn scenario() -> Scenario {
        Scenario::from_toml_str(
            r#"
            [config]
            weather_seed = 11

            [range]
            start = "2024-05-01T00:00"
            end = "2024-05-01T04:00"

            [[shapes]]
            points = [[100, 100], [300, 100], [300, 300]]

            [[shapes]]
            data_source = "wind_speed"
            points = [[400, 300], [600, 300], [500, 450]]
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_rows_cover_every_hour_and_region() {
        let replay = Replay::prepare(scenario()).await.unwrap();
        let rows = replay.rows();
        assert_eq!(rows.len(), 4 * 2);
        assert_eq!(rows[0].region_id, "polygon_1");
        assert_eq!(rows[1].data_source, "wind_speed");
        for row in &rows {
            let value = row.value.unwrap();
            let source = find_source(replay.sources(), &row.data_source).unwrap();
            assert_eq!(row.color, source.classify(value));
        }
    }

    #[tokio::test]
    async fn test_frame_and_csv_output() {
        let replay = Replay::prepare(scenario()).await.unwrap();
        let frame = replay.frame_at(replay.range.start);
        let outlines = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePolygon { .. }))
            .count();
        assert_eq!(outlines, 2);

        let path = std::env::temp_dir().join(format!("wxmap-simulate-{}.csv", std::process::id()));
        let path = path.to_string_lossy().to_string();
        write_rows(&path, &replay.rows()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,region_id,data_source,value,color")
        );
        assert_eq!(lines.count(), 8);
    }

    #[tokio::test]
    async fn test_frame_with_non_positive_zoom_is_bounded() {
        let scenario = Scenario::from_toml_str(
            r#"
            [viewport]
            center = { x = 0.0, y = 0.0 }
            zoom = -2.0

            [range]
            start = "2024-05-01T00:00"
            end = "2024-05-01T02:00"

            [[shapes]]
            points = [[100, 100], [300, 100], [300, 300]]
            "#,
        )
        .unwrap();
        let replay = Replay::prepare(scenario).await.unwrap();
        let frame = replay.frame_at(replay.range.start);
        let lines = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        // 800x600 canvas at 1x with 50px spacing.
        assert!(lines > 0 && lines <= 40, "{} grid lines", lines);
    }
}
