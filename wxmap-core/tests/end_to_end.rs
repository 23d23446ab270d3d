use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use wxmap_core::cache::SampleCache;
use wxmap_core::classify::{region_color, ClassificationRule, DataSeries};
use wxmap_core::drawing::{ClickOutcome, DrawingState, DrawingTool};
use wxmap_core::geom::{CanvasSize, ScreenPoint, WorldPoint};
use wxmap_core::region::RegionSet;
use wxmap_core::render::{render, DrawCommand, Scene, Theme};
use wxmap_core::series::{SampleSeries, TEMPERATURE};
use wxmap_core::viewport::Viewport;
use wxmap_core::DashboardError;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
}

fn blue_red() -> Vec<DataSeries> {
    vec![DataSeries {
        id: "temperature".to_string(),
        display_name: "Temperature".to_string(),
        sample_field_key: TEMPERATURE.to_string(),
        base_color: "#ff6b6b".to_string(),
        rules: vec![
            ClassificationRule::less_than(10.0, "blue"),
            ClassificationRule::at_least(10.0, "red"),
        ],
    }]
}

#[test]
fn test_quadrilateral_changes_color_with_time() {
    let canvas = CanvasSize::new(800.0, 600.0);
    let viewport = Viewport::default();
    let mut tool = DrawingTool::new();
    let mut regions = RegionSet::new();

    tool.start();
    for p in [
        ScreenPoint::new(300.0, 200.0),
        ScreenPoint::new(500.0, 200.0),
        ScreenPoint::new(500.0, 400.0),
        ScreenPoint::new(300.0, 400.0),
    ] {
        tool.click(p, &viewport, canvas, "temperature").unwrap();
    }
    let outcome = tool
        .click(ScreenPoint::new(303.0, 204.0), &viewport, canvas, "temperature")
        .unwrap();
    let ClickOutcome::Completed(region) = outcome else {
        panic!("expected the closing click to complete the polygon");
    };
    assert_eq!(region.vertices().len(), 4);
    assert_eq!(region.centroid(), WorldPoint::ORIGIN);
    assert!(region.contains(WorldPoint::new(50.0, -50.0)));
    assert!(!region.contains(WorldPoint::new(150.0, 0.0)));
    regions.insert(region);

    let timestamps = (0..2).map(|h| start() + Duration::hours(h)).collect();
    let mut fields = BTreeMap::new();
    fields.insert(TEMPERATURE.to_string(), vec![8.0, 12.0]);
    let mut cache = SampleCache::new();
    cache.insert(
        regions.ids()[0].clone(),
        SampleSeries::try_new(timestamps, fields).unwrap(),
    );

    let sources = blue_red();
    let region = &regions.as_slice()[0];
    let at = |h: i64| {
        region_color(
            region,
            &sources,
            cache.get(region.id()),
            start(),
            start() + Duration::hours(h),
        )
    };
    assert_eq!(at(0), "blue");
    assert_eq!(at(1), "red");
    assert_eq!(at(2), "#ff6b6b");

    let scene = Scene {
        canvas,
        viewport: &viewport,
        regions: &regions,
        sources: &sources,
        samples: &cache,
        range_start: start(),
        current_time: start() + Duration::hours(1),
        drawing: tool.points(),
        pointer: None,
        hovered: None,
        theme: Theme::Dark,
    };
    let frame = render(&scene);
    assert!(frame.commands.iter().any(|c| matches!(
        c,
        DrawCommand::StrokePolygon { color, .. } if color == "red"
    )));
}

#[test]
fn test_cancelled_session_leaves_no_region() {
    let canvas = CanvasSize::new(800.0, 600.0);
    let viewport = Viewport::default();
    let mut tool = DrawingTool::new();
    let regions = RegionSet::new();

    tool.start();
    tool.click(ScreenPoint::new(10.0, 10.0), &viewport, canvas, "temperature")
        .unwrap();
    tool.click(ScreenPoint::new(90.0, 10.0), &viewport, canvas, "temperature")
        .unwrap();
    assert_eq!(
        tool.complete(&viewport, canvas, "temperature").unwrap_err(),
        DashboardError::InsufficientPoints { needed: 3, found: 2 }
    );
    tool.cancel();

    assert_eq!(tool.state(), &DrawingState::Idle);
    assert!(regions.is_empty());
}
