mod bounding_box;
mod drag;

pub use {
    bounding_box::{BoundingBox, ScreenPoint},
    drag::{DragRect, RegionDrag, SelectionOutcome},
};

use crate::{CoreResult, RecorderError, video::ScreenSource};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Select the whole primary display.
///
/// Returns `(0, 0, width, height)` using the display's live resolution.
#[track_caller]
#[instrument(skip(screen))]
pub fn select_full_screen<S: ScreenSource + ?Sized>(screen: &S) -> CoreResult<BoundingBox> {
    let (width, height) = screen.resolution()?;

    let region =
        BoundingBox::full_screen(width, height).map_err(|source| RecorderError::InvalidRegion {
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!(width, height, "Full screen selected");

    Ok(region)
}
