use crate::{CoreResult, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;
use image::{ImageBuffer, Rgb, RgbaImage, imageops};

/// Width and height of an encoded video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Create a frame size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Channel order of a packed 3-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
}

/// A packed 8-bit, 3-channel raster image.
///
/// The channel order is tracked in `layout`; the bytes themselves are
/// stored row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    size: FrameSize,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Wrap raw RGB/BGR bytes. The length must be `width * height * 3`.
    #[track_caller]
    pub fn from_raw(size: FrameSize, layout: PixelLayout, data: Vec<u8>) -> CoreResult<Self> {
        let expected = size.width as usize * size.height as usize * 3;
        if data.len() != expected {
            return Err(RecorderError::CaptureFailed {
                reason: format!(
                    "Frame buffer holds {} bytes, expected {} for {}x{}",
                    data.len(),
                    expected,
                    size.width,
                    size.height
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { size, layout, data })
    }

    /// Drop the alpha channel of a captured RGBA image.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let size = FrameSize::new(image.width(), image.height());
        let data = image
            .pixels()
            .flat_map(|px| [px.0[0], px.0[1], px.0[2]])
            .collect();

        Self {
            size,
            layout: PixelLayout::Rgb,
            data,
        }
    }

    /// Frame dimensions.
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Current channel order.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Packed pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reorder channels to `layout`. A no-op when already there.
    pub fn into_layout(mut self, layout: PixelLayout) -> Self {
        if self.layout != layout {
            // RGB <-> BGR is the same swap in both directions.
            for px in self.data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            self.layout = layout;
        }
        self
    }

    /// Bilinear resize to `size`. A no-op when already there.
    #[track_caller]
    pub fn resized(self, size: FrameSize) -> CoreResult<Self> {
        if self.size == size {
            return Ok(self);
        }

        let layout = self.layout;
        let image: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.size.width, self.size.height, self.data).ok_or_else(
                || RecorderError::CaptureFailed {
                    reason: "Frame buffer does not match its dimensions".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
            )?;

        let resized = imageops::resize(
            &image,
            size.width,
            size.height,
            imageops::FilterType::Triangle,
        );

        Ok(Self {
            size,
            layout,
            data: resized.into_raw(),
        })
    }
}
