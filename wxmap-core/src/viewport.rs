//! Pan/zoom state of the map view and the screen ↔ world transform.

use crate::geom::{CanvasSize, ScreenPoint, WorldPoint};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom multiplier for one wheel notch towards the user.
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom multiplier for one wheel notch away from the user.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Zoom multiplier of the zoom buttons.
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

/// Camera over the world plane: the world point shown at the canvas center
/// and a uniform zoom factor clamped to `[MIN_ZOOM, MAX_ZOOM]`.
///
/// Deserialized viewports go through [`Viewport::new`], so a stored zoom
/// that is out of range is clamped and one that is non-finite or
/// non-positive falls back to 1×.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredViewport")]
pub struct Viewport {
    center: WorldPoint,
    zoom: f64,
}

#[derive(Deserialize)]
struct StoredViewport {
    center: WorldPoint,
    zoom: f64,
}

impl From<StoredViewport> for Viewport {
    fn from(stored: StoredViewport) -> Self {
        Viewport::new(stored.center, stored.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: WorldPoint::ORIGIN,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport; the zoom is clamped into range.
    pub fn new(center: WorldPoint, zoom: f64) -> Self {
        let mut vp = Self { center, zoom: 1.0 };
        vp.set_zoom(zoom);
        vp
    }

    pub fn center(&self) -> WorldPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Convert a canvas-relative pixel position into world coordinates.
    ///
    /// A zero-sized canvas maps everything to the world origin.
    pub fn to_world(&self, screen: ScreenPoint, canvas: CanvasSize) -> WorldPoint {
        if canvas.is_empty() {
            return WorldPoint::ORIGIN;
        }
        let mid = canvas.center();
        WorldPoint::new(
            (screen.x - mid.x) / self.zoom + self.center.x,
            (screen.y - mid.y) / self.zoom + self.center.y,
        )
    }

    /// Convert a world position into canvas-relative pixels.
    ///
    /// A zero-sized canvas maps everything to the screen origin.
    pub fn to_screen(&self, world: WorldPoint, canvas: CanvasSize) -> ScreenPoint {
        if canvas.is_empty() {
            return ScreenPoint::ORIGIN;
        }
        let mid = canvas.center();
        ScreenPoint::new(
            (world.x - self.center.x) * self.zoom + mid.x,
            (world.y - self.center.y) * self.zoom + mid.y,
        )
    }

    /// Set the zoom factor. Non-finite or non-positive values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !(zoom.is_finite() && zoom > 0.0) {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Multiply the zoom factor, about the canvas center.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    /// Apply one wheel event: positive `delta_y` zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_by(WHEEL_ZOOM_OUT);
        } else {
            self.zoom_by(WHEEL_ZOOM_IN);
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(BUTTON_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / BUTTON_ZOOM_STEP);
    }

    /// Drag the map by a pixel delta: content follows the pointer.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        self.center = WorldPoint::new(
            self.center.x - dx / self.zoom,
            self.center.y - dy / self.zoom,
        );
    }

    /// Back to the origin at 1×.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_canvas_center_maps_to_viewport_center() {
        let vp = Viewport::new(WorldPoint::new(12.0, -7.0), 2.0);
        let canvas = CanvasSize::new(800.0, 600.0);
        let world = vp.to_world(ScreenPoint::new(400.0, 300.0), canvas);
        assert_eq!(world, WorldPoint::new(12.0, -7.0));
        let world = vp.to_world(ScreenPoint::new(500.0, 300.0), canvas);
        assert!((world.x - 62.0).abs() < EPS);
    }

    #[test]
    fn test_zero_sized_canvas_returns_origin() {
        let vp = Viewport::new(WorldPoint::new(5.0, 5.0), 3.0);
        let empty = CanvasSize::new(0.0, 600.0);
        assert_eq!(vp.to_world(ScreenPoint::new(10.0, 10.0), empty), WorldPoint::ORIGIN);
        assert_eq!(vp.to_screen(WorldPoint::new(10.0, 10.0), empty), ScreenPoint::ORIGIN);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.wheel(-1.0);
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
        for _ in 0..100 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), MIN_ZOOM);
        vp.set_zoom(0.0);
        assert_eq!(vp.zoom(), MIN_ZOOM);
        vp.set_zoom(f64::NAN);
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert_eq!(Viewport::new(WorldPoint::ORIGIN, 50.0).zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_wheel_direction() {
        let mut vp = Viewport::default();
        vp.wheel(120.0);
        assert!((vp.zoom() - 0.9).abs() < EPS);
        vp.reset();
        vp.wheel(-120.0);
        assert!((vp.zoom() - 1.1).abs() < EPS);
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let canvas = CanvasSize::new(800.0, 600.0);
        let mut vp = Viewport::new(WorldPoint::ORIGIN, 2.0);
        let anchor = WorldPoint::new(10.0, 10.0);
        let before = vp.to_screen(anchor, canvas);
        vp.pan_by_screen(30.0, -20.0);
        let after = vp.to_screen(anchor, canvas);
        assert!((after.x - before.x - 30.0).abs() < EPS);
        assert!((after.y - before.y + 20.0).abs() < EPS);
        vp.reset();
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn test_deserialize_clamps_zoom() {
        let parse = |zoom: &str| -> Viewport {
            let text = format!(r#"{{"center": {{"x": 3.0, "y": 4.0}}, "zoom": {zoom}}}"#);
            serde_json::from_str(&text).unwrap()
        };
        assert_eq!(parse("0.0").zoom(), 1.0);
        assert_eq!(parse("-2.0").zoom(), 1.0);
        assert_eq!(parse("100.0").zoom(), MAX_ZOOM);
        assert_eq!(parse("0.01").zoom(), MIN_ZOOM);
        let vp = parse("2.5");
        assert_eq!(vp.zoom(), 2.5);
        assert_eq!(vp.center(), WorldPoint::new(3.0, 4.0));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            sx in -2000.0f64..4000.0,
            sy in -2000.0f64..4000.0,
            cx in -1.0e4f64..1.0e4,
            cy in -1.0e4f64..1.0e4,
            zoom in MIN_ZOOM..=MAX_ZOOM,
            w in 1.0f64..4000.0,
            h in 1.0f64..4000.0,
        ) {
            let vp = Viewport::new(WorldPoint::new(cx, cy), zoom);
            let canvas = CanvasSize::new(w, h);
            let p = ScreenPoint::new(sx, sy);
            let back = vp.to_screen(vp.to_world(p, canvas), canvas);
            prop_assert!((back.x - p.x).abs() < 1e-6);
            prop_assert!((back.y - p.y).abs() < 1e-6);
        }
    }
}
