//! Polygon digitizing state machine.
//!
//! The tool is `Idle` until draw mode is entered. While `Drawing` it collects
//! screen-space clicks; a session ends by completion (explicit, or a click
//! near the first point) which emits a [`Region`], or by cancellation which
//! emits nothing.
//!
//! Screen points are converted to world coordinates with the viewport current
//! *at completion*, not at click time. Panning or zooming mid-draw therefore
//! shifts the already placed points relative to the map.

use crate::error::{DashboardError, Result};
use crate::geom::{self, CanvasSize, ScreenPoint, MAX_VERTICES, MIN_VERTICES};
use crate::region::{Region, RegionId};
use crate::viewport::Viewport;
use log::{debug, info};

/// Where the tool currently is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawingState {
    #[default]
    Idle,
    Drawing(Vec<ScreenPoint>),
}

/// Result of a click accepted while drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The point was appended; `count` points are now placed.
    PointAdded { count: usize },
    /// The click repeated the last point and was dropped.
    Ignored,
    /// The click closed the polygon.
    Completed(Region),
}

/// Drawing state plus the sequence used to name finished regions.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingTool {
    state: DrawingState,
    next_sequence: u64,
}

impl Default for DrawingTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingTool {
    pub fn new() -> Self {
        Self::with_next_sequence(1)
    }

    /// Start numbering finished regions at `seq`.
    pub fn with_next_sequence(seq: u64) -> Self {
        Self {
            state: DrawingState::Idle,
            next_sequence: seq,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing(_))
    }

    /// Points placed in the open session; empty when idle.
    pub fn points(&self) -> &[ScreenPoint] {
        match &self.state {
            DrawingState::Drawing(points) => points,
            DrawingState::Idle => &[],
        }
    }

    /// True when no further points may be added and the session must be
    /// completed or cancelled.
    pub fn is_full(&self) -> bool {
        self.points().len() >= MAX_VERTICES
    }

    /// True when explicit completion would succeed.
    pub fn can_complete(&self) -> bool {
        self.is_drawing() && self.points().len() >= MIN_VERTICES
    }

    /// Enter draw mode with an empty point list. No-op if already drawing.
    pub fn start(&mut self) {
        if !self.is_drawing() {
            debug!("drawing session started");
            self.state = DrawingState::Drawing(Vec::new());
        }
    }

    /// Handle a primary click while drawing.
    ///
    /// A click within closing distance of the first point completes the
    /// polygon without storing the click. Otherwise the point is appended,
    /// unless the session already holds [`MAX_VERTICES`] points.
    pub fn click(
        &mut self,
        point: ScreenPoint,
        viewport: &Viewport,
        canvas: CanvasSize,
        data_source_id: &str,
    ) -> Result<ClickOutcome> {
        let DrawingState::Drawing(points) = &mut self.state else {
            return Err(DashboardError::NotDrawing);
        };

        if geom::closes_polygon(points, point) {
            return self
                .complete(viewport, canvas, data_source_id)
                .map(ClickOutcome::Completed);
        }
        if points.last() == Some(&point) {
            return Ok(ClickOutcome::Ignored);
        }
        if points.len() >= MAX_VERTICES {
            return Err(DashboardError::TooManyPoints { max: MAX_VERTICES });
        }

        points.push(point);
        Ok(ClickOutcome::PointAdded {
            count: points.len(),
        })
    }

    /// Finish the open session and emit the region.
    ///
    /// With fewer than [`MIN_VERTICES`] points the session stays open and
    /// `InsufficientPoints` is returned.
    pub fn complete(
        &mut self,
        viewport: &Viewport,
        canvas: CanvasSize,
        data_source_id: &str,
    ) -> Result<Region> {
        let DrawingState::Drawing(points) = &self.state else {
            return Err(DashboardError::NotDrawing);
        };
        if points.len() < MIN_VERTICES {
            return Err(DashboardError::InsufficientPoints {
                needed: MIN_VERTICES,
                found: points.len(),
            });
        }

        let vertices = points
            .iter()
            .map(|p| viewport.to_world(*p, canvas))
            .collect();
        let region = Region::new(
            RegionId::from_sequence(self.next_sequence),
            vertices,
            data_source_id,
        )?;

        info!(
            "completed {} with {} vertices",
            region.id(),
            region.vertices().len()
        );
        self.next_sequence += 1;
        self.state = DrawingState::Idle;
        Ok(region)
    }

    /// Abandon the open session. Returns whether a session was open.
    pub fn cancel(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        if was_drawing {
            debug!("drawing session cancelled");
        }
        self.state = DrawingState::Idle;
        was_drawing
    }
}
