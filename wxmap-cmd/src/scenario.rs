//! Scenario files: a dashboard configuration, a canvas and viewport, a time
//! range and the shapes a user drew, replayed click by click.
//!
//! ```toml
//! [config]
//! weather_seed = 7
//!
//! [canvas]
//! width = 800.0
//! height = 600.0
//!
//! [range]
//! start = "2024-01-01T00:00"
//! end = "2024-01-02T00:00"
//!
//! [[shapes]]
//! data_source = "humidity"
//! points = [[100, 100], [300, 100], [300, 300], [102, 102]]
//! ```

use anyhow::{bail, Context};
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;
use wxmap_core::classify::find_source;
use wxmap_core::config::DashboardConfig;
use wxmap_core::drawing::{ClickOutcome, DrawingTool};
use wxmap_core::geom::{CanvasSize, ScreenPoint};
use wxmap_core::region::{Region, RegionSet};
use wxmap_core::series::TimeRange;
use wxmap_core::viewport::Viewport;
use wxmap_core::DashboardError;
use wxmap_utils::dates::parse_datetime;

#[derive(Debug, Clone, Deserialize)]
pub struct RangeSpec {
    pub start: String,
    pub end: String,
}

/// One drawn polygon: screen clicks in order. A shape whose clicks never
/// close the polygon is completed explicitly, like a double-click.
#[derive(Debug, Clone, Deserialize)]
pub struct Shape {
    /// Falls back to the config's default data source
    pub data_source: Option<String>,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: DashboardConfig,
    #[serde(default = "default_canvas")]
    pub canvas: CanvasSize,
    #[serde(default)]
    pub viewport: Viewport,
    pub range: RangeSpec,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

fn default_canvas() -> CanvasSize {
    CanvasSize::new(800.0, 600.0)
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn time_range(&self) -> anyhow::Result<TimeRange> {
        let start = parse_datetime(&self.range.start).context("range start")?;
        let end = parse_datetime(&self.range.end).context("range end")?;
        Ok(TimeRange::try_new(start, end)?)
    }

    /// Replay every shape through a [`DrawingTool`].
    pub fn build_regions(&self) -> anyhow::Result<RegionSet> {
        let mut tool = DrawingTool::new();
        let mut regions = RegionSet::new();
        for (n, shape) in self.shapes.iter().enumerate() {
            let region = self
                .draw(&mut tool, shape)
                .with_context(|| format!("shape {}", n + 1))?;
            regions.insert(region);
        }
        info!("scenario drew {} region(s)", regions.len());
        Ok(regions)
    }

    fn draw(&self, tool: &mut DrawingTool, shape: &Shape) -> anyhow::Result<Region> {
        let source = shape
            .data_source
            .as_deref()
            .unwrap_or(&self.config.default_data_source);
        if find_source(&self.config.data_sources, source).is_none() {
            bail!(DashboardError::UnknownDataSource(source.to_string()));
        }

        tool.start();
        for (i, [x, y]) in shape.points.iter().copied().enumerate() {
            let outcome = tool.click(ScreenPoint::new(x, y), &self.viewport, self.canvas, source);
            match outcome {
                Ok(ClickOutcome::Completed(region)) => {
                    let left = shape.points.len() - i - 1;
                    if left > 0 {
                        warn!("{} closed with {} click(s) left over", region.id(), left);
                    }
                    return Ok(region);
                }
                Ok(_) => {}
                Err(e) => {
                    tool.cancel();
                    return Err(e.into());
                }
            }
        }
        match tool.complete(&self.viewport, self.canvas, source) {
            Ok(region) => Ok(region),
            Err(e) => {
                tool.cancel();
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        [config]
        weather_seed = 7

        [range]
        start = "2024-01-01T00:00"
        end = "2024-01-01T06:00"

        [[shapes]]
        data_source = "humidity"
        points = [[100, 100], [300, 100], [300, 300], [105, 104]]

        [[shapes]]
        points = [[400, 400], [500, 400], [450, 500]]
    "#;

    #[test]
    fn test_parse_and_draw() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        assert_eq!(scenario.config.weather_seed, 7);
        assert_eq!(scenario.config.days_before, 15);
        assert_eq!(scenario.canvas, CanvasSize::new(800.0, 600.0));
        assert_eq!(scenario.time_range().unwrap().total_hours(), 6);

        let regions = scenario.build_regions().unwrap();
        assert_eq!(regions.len(), 2);
        let first = &regions.as_slice()[0];
        // The closing click is not stored.
        assert_eq!(first.vertices().len(), 3);
        assert_eq!(first.data_source_id(), "humidity");
        let second = &regions.as_slice()[1];
        assert_eq!(second.data_source_id(), "temperature");
        assert_eq!(second.label(), "Polygon 2");
    }

    #[test]
    fn test_too_few_points() {
        let text = r#"
            [range]
            start = "2024-01-01"
            end = "2024-01-02"

            [[shapes]]
            points = [[0, 0], [50, 0]]
        "#;
        let scenario = Scenario::from_toml_str(text).unwrap();
        let err = scenario.build_regions().unwrap_err();
        assert!(format!("{:#}", err).contains("at least 3 points"));
    }

    #[test]
    fn test_unknown_source_and_bad_range() {
        let text = r#"
            [range]
            start = "2024-01-02"
            end = "2024-01-01"

            [[shapes]]
            data_source = "pressure"
            points = [[0, 0], [50, 0], [50, 50]]
        "#;
        let scenario = Scenario::from_toml_str(text).unwrap();
        assert!(scenario.time_range().is_err());
        let err = scenario.build_regions().unwrap_err();
        assert!(format!("{:#}", err).contains("pressure"));
    }

    fn with_zoom(zoom: &str) -> Scenario {
        let text = format!(
            r#"
            [viewport]
            center = {{ x = 0.0, y = 0.0 }}
            zoom = {zoom}

            [range]
            start = "2024-01-01"
            end = "2024-01-02"
            "#
        );
        Scenario::from_toml_str(&text).unwrap()
    }

    #[test]
    fn test_viewport_zoom_is_clamped_on_load() {
        assert_eq!(with_zoom("0.0").viewport.zoom(), 1.0);
        assert_eq!(with_zoom("-2.0").viewport.zoom(), 1.0);
        assert_eq!(with_zoom("100.0").viewport.zoom(), 5.0);
    }
}
