//! Frame construction for the map canvas.
//!
//! [`render`] turns a [`Scene`] into a [`Frame`]: a flat list of
//! self-contained draw commands in paint order. It keeps no state and never
//! touches a canvas; a backend replays the frame. [`FrameGate`] remembers the
//! last frame handed to the backend so identical frames are skipped.

use crate::cache::SampleCache;
use crate::classify::{region_color, DataSeries};
use crate::geom::{self, CanvasSize, ScreenPoint};
use crate::region::{Region, RegionId, RegionSet};
use crate::viewport::Viewport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// World units between grid lines at 1× zoom.
pub const GRID_SPACING: f64 = 50.0;
pub const GRID_ALPHA: f64 = 0.3;
pub const DRAWING_COLOR: &str = "#3b82f6";
pub const SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.1)";
pub const SHADOW_OFFSET: f64 = 2.0;
pub const MARKER_COLOR: &str = "#ffffff";
pub const PREVIEW_DASH: [f64; 2] = [5.0, 5.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Top-left and bottom-right colors of the background gradient.
    pub fn background(self) -> (&'static str, &'static str) {
        match self {
            Self::Light => ("#f0f9ff", "#e0f2fe"),
            Self::Dark => ("#1f2937", "#111827"),
        }
    }

    pub fn grid(self) -> &'static str {
        match self {
            Self::Light => "#e2e8f0",
            Self::Dark => "#4b5563",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Light => "#374151",
            Self::Dark => "#f3f4f6",
        }
    }

    pub fn label_background(self) -> &'static str {
        match self {
            Self::Light => "rgba(255, 255, 255, 0.9)",
            Self::Dark => "rgba(0, 0, 0, 0.9)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

/// A color stop at `offset` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Paint {
    Solid { color: String },
    LinearGradient {
        from: ScreenPoint,
        to: ScreenPoint,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    pub fn solid(color: impl Into<String>) -> Self {
        Self::Solid {
            color: color.into(),
        }
    }

    fn two_stop(from: ScreenPoint, to: ScreenPoint, a: String, b: String) -> Self {
        Self::LinearGradient {
            from,
            to,
            stops: vec![
                ColorStop { offset: 0.0, color: a },
                ColorStop { offset: 1.0, color: b },
            ],
        }
    }
}

/// One paint operation. Every command carries its full style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: String,
        width: f64,
        alpha: f64,
        dash: Vec<f64>,
    },
    /// Open path through `points`.
    Polyline {
        points: Vec<ScreenPoint>,
        color: String,
        width: f64,
    },
    FillPolygon {
        points: Vec<ScreenPoint>,
        paint: Paint,
    },
    StrokePolygon {
        points: Vec<ScreenPoint>,
        color: String,
        width: f64,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        color: String,
        /// Shadow color and blur radius.
        glow: Option<(String, f64)>,
    },
    Text {
        at: ScreenPoint,
        text: String,
        font_px: u32,
        align: TextAlign,
        color: String,
    },
    /// Centered text on a rounded box sized to the measured text.
    Label {
        at: ScreenPoint,
        text: String,
        font_px: u32,
        padding: f64,
        radius: f64,
        background: String,
        border: String,
        color: String,
    },
}

/// Ordered draw commands for one canvas size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub size: CanvasSize,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub canvas: CanvasSize,
    pub viewport: &'a Viewport,
    pub regions: &'a RegionSet,
    pub sources: &'a [DataSeries],
    pub samples: &'a SampleCache,
    pub range_start: DateTime<Utc>,
    pub current_time: DateTime<Utc>,
    /// Points of the open drawing session, empty when idle.
    pub drawing: &'a [ScreenPoint],
    pub pointer: Option<ScreenPoint>,
    pub hovered: Option<&'a RegionId>,
    pub theme: Theme,
}

/// `#rrggbb` plus a two-digit alpha; other color syntaxes are returned as is.
pub fn with_alpha(color: &str, alpha_hex: &str) -> String {
    let is_hex6 = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_hex6 {
        format!("{}{}", color, alpha_hex)
    } else {
        color.to_string()
    }
}

pub fn render(scene: &Scene<'_>) -> Frame {
    let size = scene.canvas;
    if size.is_empty() {
        return Frame {
            size,
            commands: Vec::new(),
        };
    }

    let mut commands = vec![DrawCommand::Clear {
        width: size.width,
        height: size.height,
    }];
    background(&mut commands, size, scene.theme);
    grid(&mut commands, size, scene.viewport, scene.theme);
    for region in scene.regions.iter() {
        let color = region_color(
            region,
            scene.sources,
            scene.samples.get(region.id()),
            scene.range_start,
            scene.current_time,
        );
        let hovered = scene.hovered == Some(region.id());
        region_shape(&mut commands, scene, region, color, hovered);
    }
    drawing_session(&mut commands, scene.drawing, scene.pointer);
    hud(&mut commands, scene.viewport, scene.theme);

    Frame { size, commands }
}

fn background(out: &mut Vec<DrawCommand>, size: CanvasSize, theme: Theme) {
    let (top, bottom) = theme.background();
    out.push(DrawCommand::FillRect {
        x: 0.0,
        y: 0.0,
        width: size.width,
        height: size.height,
        paint: Paint::two_stop(
            ScreenPoint::ORIGIN,
            ScreenPoint::new(size.width, size.height),
            top.to_string(),
            bottom.to_string(),
        ),
    });
}

fn grid(out: &mut Vec<DrawCommand>, size: CanvasSize, viewport: &Viewport, theme: Theme) {
    let step = GRID_SPACING * viewport.zoom();
    if !(step.is_finite() && step > 0.0) {
        return;
    }
    let center = viewport.center();
    let offset_x = (center.x * viewport.zoom()) % step;
    let offset_y = (center.y * viewport.zoom()) % step;
    let line = |from, to| DrawCommand::Line {
        from,
        to,
        color: theme.grid().to_string(),
        width: 1.0,
        alpha: GRID_ALPHA,
        dash: Vec::new(),
    };

    let mut x = -offset_x;
    while x < size.width + step {
        out.push(line(ScreenPoint::new(x, 0.0), ScreenPoint::new(x, size.height)));
        x += step;
    }
    let mut y = -offset_y;
    while y < size.height + step {
        out.push(line(ScreenPoint::new(0.0, y), ScreenPoint::new(size.width, y)));
        y += step;
    }
}

fn region_shape(
    out: &mut Vec<DrawCommand>,
    scene: &Scene<'_>,
    region: &Region,
    color: &str,
    hovered: bool,
) {
    let points: Vec<ScreenPoint> = region
        .vertices()
        .iter()
        .map(|v| scene.viewport.to_screen(*v, scene.canvas))
        .collect();
    let Some((lo, hi)) = geom::screen_bounds(&points) else {
        return;
    };

    out.push(DrawCommand::FillPolygon {
        points: points
            .iter()
            .map(|p| p.offset(SHADOW_OFFSET, SHADOW_OFFSET))
            .collect(),
        paint: Paint::solid(SHADOW_COLOR),
    });

    let (a, b) = if hovered { ("CC", "AA") } else { ("99", "77") };
    out.push(DrawCommand::FillPolygon {
        points: points.clone(),
        paint: Paint::two_stop(lo, hi, with_alpha(color, a), with_alpha(color, b)),
    });
    out.push(DrawCommand::StrokePolygon {
        points: points.clone(),
        color: color.to_string(),
        width: if hovered { 3.0 } else { 2.0 },
    });

    for (i, p) in points.iter().enumerate() {
        out.push(DrawCommand::Circle {
            center: *p,
            radius: if hovered { 6.0 } else { 4.0 },
            color: MARKER_COLOR.to_string(),
            glow: Some((color.to_string(), if hovered { 10.0 } else { 5.0 })),
        });
        out.push(DrawCommand::Circle {
            center: *p,
            radius: if hovered { 3.0 } else { 2.0 },
            color: color.to_string(),
            glow: None,
        });
        if hovered {
            out.push(vertex_number(*p, i));
        }
    }

    out.push(DrawCommand::Label {
        at: scene.viewport.to_screen(region.centroid(), scene.canvas),
        text: region.label(),
        font_px: 12,
        padding: 6.0,
        radius: 4.0,
        background: scene.theme.label_background().to_string(),
        border: color.to_string(),
        color: scene.theme.text().to_string(),
    });
}

fn vertex_number(p: ScreenPoint, index: usize) -> DrawCommand {
    DrawCommand::Text {
        at: p.offset(0.0, 3.0),
        text: (index + 1).to_string(),
        font_px: 10,
        align: TextAlign::Center,
        color: MARKER_COLOR.to_string(),
    }
}

fn drawing_session(out: &mut Vec<DrawCommand>, points: &[ScreenPoint], pointer: Option<ScreenPoint>) {
    let Some(last) = points.last() else {
        return;
    };
    if points.len() > 1 {
        out.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color: DRAWING_COLOR.to_string(),
            width: 2.0,
        });
    }
    if let Some(pointer) = pointer {
        out.push(DrawCommand::Line {
            from: *last,
            to: pointer,
            color: DRAWING_COLOR.to_string(),
            width: 2.0,
            alpha: 1.0,
            dash: PREVIEW_DASH.to_vec(),
        });
    }
    for (i, p) in points.iter().enumerate() {
        out.push(DrawCommand::Circle {
            center: *p,
            radius: 8.0,
            color: MARKER_COLOR.to_string(),
            glow: Some((DRAWING_COLOR.to_string(), 10.0)),
        });
        out.push(DrawCommand::Circle {
            center: *p,
            radius: 5.0,
            color: DRAWING_COLOR.to_string(),
            glow: None,
        });
        out.push(vertex_number(*p, i));
    }
}

fn hud(out: &mut Vec<DrawCommand>, viewport: &Viewport, theme: Theme) {
    let center = viewport.center();
    let lines = [
        (format!("Zoom: {:.1}x", viewport.zoom()), 25.0),
        (format!("Center: ({:.0}, {:.0})", center.x, center.y), 45.0),
    ];
    for (text, y) in lines {
        out.push(DrawCommand::Text {
            at: ScreenPoint::new(15.0, y),
            text,
            font_px: 14,
            align: TextAlign::Left,
            color: theme.text().to_string(),
        });
    }
}

/// Remembers the last painted frame.
#[derive(Debug, Default)]
pub struct FrameGate {
    last: Option<Frame>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True (and remembers `frame`) when it differs from the last one
    /// admitted.
    pub fn admit(&mut self, frame: &Frame) -> bool {
        if self.last.as_ref() == Some(frame) {
            return false;
        }
        self.last = Some(frame.clone());
        true
    }

    /// Force the next frame through, e.g. after the canvas was cleared
    /// externally.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
