//! Live display capture.
//!
//! `XcapScreen` talks to the OS through `xcap`. Everything above it works on
//! the `ScreenSource` trait so the capture loop runs the same against a
//! display or an in-memory test source.

use crate::{CoreResult, RecorderError, region::BoundingBox, video::FrameBuffer};

use std::panic::Location;

use error_location::ErrorLocation;
use image::imageops;
use tracing::{info, instrument, trace, warn};
use xcap::Monitor;

/// Something that can report its resolution and hand out RGB frames.
pub trait ScreenSource {
    /// Current display resolution in physical pixels.
    fn resolution(&self) -> CoreResult<(u32, u32)>;

    /// Grab the pixels inside `region` as an RGB frame of the region's size.
    fn grab(&mut self, region: &BoundingBox) -> CoreResult<FrameBuffer>;
}

/// Primary monitor captured through `xcap`.
pub struct XcapScreen {
    monitor: Monitor,
}

impl XcapScreen {
    /// Open the primary monitor, falling back to the first one listed.
    #[track_caller]
    #[instrument]
    pub fn primary() -> CoreResult<Self> {
        let monitors = Monitor::all().map_err(|e| RecorderError::CaptureFailed {
            reason: format!("Failed to enumerate monitors: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                info!("Using primary monitor");
                return Ok(Self { monitor });
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }

        let monitor = fallback.ok_or(RecorderError::NoMonitorFound {
            location: ErrorLocation::from(Location::caller()),
        })?;
        warn!("No monitor reports as primary, using the first one");

        Ok(Self { monitor })
    }
}

impl ScreenSource for XcapScreen {
    #[track_caller]
    fn resolution(&self) -> CoreResult<(u32, u32)> {
        let width = self.monitor.width().map_err(|e| RecorderError::CaptureFailed {
            reason: format!("Failed to read monitor width: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let height = self
            .monitor
            .height()
            .map_err(|e| RecorderError::CaptureFailed {
                reason: format!("Failed to read monitor height: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok((width, height))
    }

    #[track_caller]
    fn grab(&mut self, region: &BoundingBox) -> CoreResult<FrameBuffer> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|e| RecorderError::CaptureFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if region.x2() > image.width() || region.y2() > image.height() {
            return Err(RecorderError::RegionOutOfBounds {
                x1: region.x1(),
                y1: region.y1(),
                x2: region.x2(),
                y2: region.y2(),
                display_width: image.width(),
                display_height: image.height(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let cropped = imageops::crop_imm(
            &image,
            region.x1(),
            region.y1(),
            region.width(),
            region.height(),
        )
        .to_image();
        trace!(width = cropped.width(), height = cropped.height(), "Grabbed region");

        Ok(FrameBuffer::from_rgba(&cropped))
    }
}
