use crate::{
    RegionError,
    region::{BoundingBox, ScreenPoint},
};

use tracing::debug;

/// The rectangle currently drawn on the overlay, corners already ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

/// Final result of an interactive selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The user released the pointer over a valid rectangle.
    Selected(BoundingBox),
    /// The user released the pointer over a zero-area rectangle.
    Rejected(RegionError),
    /// The user pressed escape. No selection was made.
    Cancelled,
}

/// Pointer-driven rectangle selection.
///
/// Feed it pointer-down, pointer-drag and pointer-up positions in physical
/// pixels. Only one rectangle exists at a time: every drag replaces the
/// previous one.
#[derive(Debug, Default)]
pub struct RegionDrag {
    start: Option<ScreenPoint>,
    rect: Option<DragRect>,
}

impl RegionDrag {
    /// Create an idle gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer went down: remember the anchor corner.
    pub fn press(&mut self, point: ScreenPoint) {
        self.start = Some(point);
        self.rect = None;
        debug!(x = point.x, y = point.y, "Selection started");
    }

    /// Pointer moved with the button held. Returns the rectangle to draw,
    /// or `None` if no press was seen.
    pub fn drag(&mut self, point: ScreenPoint) -> Option<DragRect> {
        let start = self.start?;
        let rect = DragRect {
            min: ScreenPoint::new(start.x.min(point.x), start.y.min(point.y)),
            max: ScreenPoint::new(start.x.max(point.x), start.y.max(point.y)),
        };
        self.rect = Some(rect);
        Some(rect)
    }

    /// Pointer went up. Returns `None` if no press was seen.
    pub fn release(&mut self, point: ScreenPoint) -> Option<SelectionOutcome> {
        let start = self.start.take()?;
        self.rect = None;

        let outcome = match BoundingBox::from_corners(start, point) {
            Ok(region) => SelectionOutcome::Selected(region),
            Err(e) => SelectionOutcome::Rejected(e),
        };
        debug!(?outcome, "Selection finished");

        Some(outcome)
    }

    /// Escape pressed: drop the gesture.
    pub fn cancel(&mut self) -> SelectionOutcome {
        self.start = None;
        self.rect = None;
        SelectionOutcome::Cancelled
    }

    /// The rectangle currently visible, if a drag is in progress.
    pub fn rectangle(&self) -> Option<DragRect> {
        self.rect
    }

    /// Whether the pointer is currently held down.
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}
