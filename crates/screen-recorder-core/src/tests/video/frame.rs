use crate::{FrameBuffer, FrameSize, PixelLayout, RecorderError};

use image::{Rgba, RgbaImage};

/// WHAT: Alpha is dropped when wrapping a captured RGBA image
/// WHY: Sinks take packed 3-byte pixels
#[test]
fn given_rgba_capture_when_wrapping_then_rgb_bytes_without_alpha() {
    // Given: A 2x1 RGBA image
    let mut image = RgbaImage::new(2, 1);
    image.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
    image.put_pixel(1, 0, Rgba([4, 5, 6, 128]));

    // When: Wrapping it
    let frame = FrameBuffer::from_rgba(&image);

    // Then: RGB layout, alpha gone
    assert_eq!(frame.layout(), PixelLayout::Rgb);
    assert_eq!(frame.data(), &[1, 2, 3, 4, 5, 6]);
}

/// WHAT: Converting to BGR swaps red and blue
/// WHY: Some sinks expect blue-first pixels
#[test]
#[allow(clippy::unwrap_used)]
fn given_rgb_frame_when_converting_to_bgr_then_channels_swapped() {
    // Given: One RGB pixel
    let frame =
        FrameBuffer::from_raw(FrameSize::new(1, 1), PixelLayout::Rgb, vec![9, 8, 7]).unwrap();

    // When: Converting to BGR and back
    let bgr = frame.into_layout(PixelLayout::Bgr);
    assert_eq!(bgr.data(), &[7, 8, 9]);
    let rgb = bgr.into_layout(PixelLayout::Rgb);

    // Then: Round trip restores the original
    assert_eq!(rgb.data(), &[9, 8, 7]);
}

/// WHAT: Resizing produces the requested dimensions
/// WHY: Every encoded frame must match the sink size
#[test]
#[allow(clippy::unwrap_used)]
fn given_frame_when_resizing_then_buffer_matches_target() {
    // Given: A solid 100x50 frame
    let frame = FrameBuffer::from_raw(
        FrameSize::new(100, 50),
        PixelLayout::Bgr,
        vec![200; 100 * 50 * 3],
    )
    .unwrap();

    // When: Resizing to 40x20
    let resized = frame.resized(FrameSize::new(40, 20)).unwrap();

    // Then: Size, layout and byte count follow
    assert_eq!(resized.size(), FrameSize::new(40, 20));
    assert_eq!(resized.layout(), PixelLayout::Bgr);
    assert_eq!(resized.data().len(), 40 * 20 * 3);
    assert!(resized.data().iter().all(|&b| b == 200));
}

/// WHAT: A byte count that does not match the size is rejected
/// WHY: Prevents malformed frames reaching the encoder
#[test]
fn given_short_buffer_when_wrapping_then_capture_failed() {
    let result = FrameBuffer::from_raw(FrameSize::new(4, 4), PixelLayout::Rgb, vec![0; 10]);
    assert!(matches!(result, Err(RecorderError::CaptureFailed { .. })));
}
