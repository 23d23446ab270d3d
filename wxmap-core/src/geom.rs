//! Points, canvas size and the polygon utilities used for hit testing and
//! digitizing.
//!
//! Screen and world coordinates are kept apart by type: a [`ScreenPoint`] is
//! a pixel position on the rendering surface (origin top-left, y-down), a
//! [`WorldPoint`] lives on the pannable/zoomable map plane. The only way to
//! move between the two is through [`crate::viewport::Viewport`].

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

/// Distance in pixels under which a click is treated as landing on the first
/// point of the session.
pub const CLOSE_DISTANCE_PX: f64 = 15.0;

/// Fewest vertices a polygon may have.
pub const MIN_VERTICES: usize = 3;

/// Most vertices a polygon may have.
pub const MAX_VERTICES: usize = 12;

/// A pixel position on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels.
    pub fn distance(&self, other: &ScreenPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// The same point shifted by `(dx, dy)` pixels.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A position on the world plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the rendering surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side has no area to draw into.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Even-odd ray casting test.
///
/// Polygons with fewer than three vertices never contain anything. Whether a
/// point lying exactly on an edge counts as inside is implementation-defined
/// and not guaranteed either way.
pub fn point_in_polygon(point: WorldPoint, vertices: &[WorldPoint]) -> bool {
    if vertices.len() < MIN_VERTICES {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Arithmetic mean of the vertices, `None` for an empty list.
pub fn centroid(vertices: &[WorldPoint]) -> Option<WorldPoint> {
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let (sx, sy) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), v| (sx + v.x, sy + v.y));
    Some(WorldPoint::new(sx / n, sy / n))
}

/// Check that a vertex list can back a region: between [`MIN_VERTICES`] and
/// [`MAX_VERTICES`] points, all finite.
pub fn validate_polygon(vertices: &[WorldPoint]) -> Result<()> {
    if vertices.len() < MIN_VERTICES || vertices.len() > MAX_VERTICES {
        return Err(DashboardError::DegenerateGeometry(format!(
            "expected {}..={} vertices, found {}",
            MIN_VERTICES,
            MAX_VERTICES,
            vertices.len()
        )));
    }
    if let Some(bad) = vertices.iter().position(|v| !(v.x.is_finite() && v.y.is_finite())) {
        return Err(DashboardError::DegenerateGeometry(format!(
            "vertex {} is not finite",
            bad
        )));
    }
    Ok(())
}

/// Whether clicking `candidate` should close the in-progress polygon.
///
/// Requires at least [`MIN_VERTICES`] placed points and the candidate to land
/// within [`CLOSE_DISTANCE_PX`] of the first one.
pub fn closes_polygon(points: &[ScreenPoint], candidate: ScreenPoint) -> bool {
    match points.first() {
        Some(first) if points.len() >= MIN_VERTICES => {
            candidate.distance(first) < CLOSE_DISTANCE_PX
        }
        _ => false,
    }
}

/// Axis-aligned bounds `(min, max)` of a screen point list.
pub fn screen_bounds(points: &[ScreenPoint]) -> Option<(ScreenPoint, ScreenPoint)> {
    let first = points.first()?;
    Some(points.iter().skip(1).fold((*first, *first), |(lo, hi), p| {
        (
            ScreenPoint::new(lo.x.min(p.x), lo.y.min(p.y)),
            ScreenPoint::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(10.0, 0.0),
            WorldPoint::new(10.0, 10.0),
            WorldPoint::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_square_contains_center() {
        assert!(point_in_polygon(WorldPoint::new(5.0, 5.0), &square()));
        assert!(!point_in_polygon(WorldPoint::new(15.0, 5.0), &square()));
        assert!(!point_in_polygon(WorldPoint::new(5.0, -1.0), &square()));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape opening upwards: the notch between the arms is outside.
        let u = vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(9.0, 0.0),
            WorldPoint::new(9.0, 9.0),
            WorldPoint::new(6.0, 9.0),
            WorldPoint::new(6.0, 3.0),
            WorldPoint::new(3.0, 3.0),
            WorldPoint::new(3.0, 9.0),
            WorldPoint::new(0.0, 9.0),
        ];
        assert!(point_in_polygon(WorldPoint::new(1.5, 6.0), &u));
        assert!(point_in_polygon(WorldPoint::new(7.5, 6.0), &u));
        assert!(!point_in_polygon(WorldPoint::new(4.5, 6.0), &u));
        assert!(point_in_polygon(WorldPoint::new(4.5, 1.5), &u));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let line = vec![WorldPoint::new(0.0, 0.0), WorldPoint::new(10.0, 10.0)];
        assert!(!point_in_polygon(WorldPoint::new(5.0, 5.0), &line));
        assert!(!point_in_polygon(WorldPoint::new(0.0, 0.0), &[]));
    }

    #[test]
    fn test_centroid_is_mean() {
        assert_eq!(centroid(&square()), Some(WorldPoint::new(5.0, 5.0)));
        assert_eq!(
            centroid(&[WorldPoint::new(3.0, -4.0)]),
            Some(WorldPoint::new(3.0, -4.0))
        );
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_validate_polygon() {
        assert!(validate_polygon(&square()).is_ok());
        assert!(matches!(
            validate_polygon(&square()[..2]),
            Err(DashboardError::DegenerateGeometry(_))
        ));
        let too_many: Vec<WorldPoint> = (0..13).map(|i| WorldPoint::new(i as f64, 0.0)).collect();
        assert!(validate_polygon(&too_many).is_err());
        let mut with_nan = square();
        with_nan[1].x = f64::NAN;
        assert!(validate_polygon(&with_nan).is_err());
    }

    #[test]
    fn test_closes_polygon_needs_three_points() {
        let two = [ScreenPoint::new(100.0, 100.0), ScreenPoint::new(200.0, 100.0)];
        assert!(!closes_polygon(&two, ScreenPoint::new(101.0, 101.0)));

        let three = [
            ScreenPoint::new(100.0, 100.0),
            ScreenPoint::new(200.0, 100.0),
            ScreenPoint::new(200.0, 200.0),
        ];
        assert!(closes_polygon(&three, ScreenPoint::new(110.0, 105.0)));
        assert!(!closes_polygon(&three, ScreenPoint::new(115.0, 100.0)));
        assert!(!closes_polygon(&[], ScreenPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_screen_bounds() {
        let pts = [
            ScreenPoint::new(5.0, 9.0),
            ScreenPoint::new(-1.0, 3.0),
            ScreenPoint::new(4.0, 12.0),
        ];
        let (lo, hi) = screen_bounds(&pts).unwrap();
        assert_eq!(lo, ScreenPoint::new(-1.0, 3.0));
        assert_eq!(hi, ScreenPoint::new(5.0, 12.0));
        assert!(screen_bounds(&[]).is_none());
    }
}
