use crate::{
    BoundingBox, CaptureLoop, FrameBuffer, FrameSize, Mp4Sink, NOMINAL_FRAME_RATE, PixelLayout,
    QualityPreset, ScreenPoint, ScreenSource, VideoSink, XcapScreen,
    tests::fakes::FakeScreen,
};

use tokio_util::sync::CancellationToken;
use video_rs::decode::Decoder;

/// WHAT: The MP4 sink produces a decodable file with every frame
/// WHY: End-to-end check of dimensions and frame count through FFmpeg
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_mp4_sink_when_capturing_n_frames_then_file_has_n_frames_at_target_size() {
    // Given: A 640x480 region, 480p, and a display stopping after 12 frames
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screen_record.mp4");
    let region =
        BoundingBox::from_corners(ScreenPoint::new(0, 0), ScreenPoint::new(640, 480)).unwrap();
    let capture = CaptureLoop::new(region, QualityPreset::P480);
    let cancel = CancellationToken::new();
    let mut screen = FakeScreen::new((1920, 1080));
    screen.cancel_after = Some((12, cancel.clone()));
    let mut sink = Mp4Sink::create(&path, capture.size(), NOMINAL_FRAME_RATE).unwrap();

    // When: Running the capture loop
    let summary = capture.run(&mut screen, &mut sink, &cancel).unwrap();

    // Then: The container decodes to 12 frames of 640x480
    assert_eq!(summary.frames_written, 12);
    let mut decoder = Decoder::new(path.as_path()).unwrap();
    assert_eq!(decoder.size(), (640, 480));
    let decoded = decoder.decode_iter().take_while(Result::is_ok).count();
    assert_eq!(decoded, 12);
}

/// WHAT: Frames of the wrong size are refused
/// WHY: The container was opened for one fixed size
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_mp4_sink_when_appending_wrong_size_then_encoder_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink =
        Mp4Sink::create(&dir.path().join("out.mp4"), FrameSize::new(64, 48), NOMINAL_FRAME_RATE)
            .unwrap();
    let frame =
        FrameBuffer::from_raw(FrameSize::new(32, 24), PixelLayout::Rgb, vec![0; 32 * 24 * 3])
            .unwrap();

    assert!(sink.append(&frame).is_err());
    assert!(sink.finish().is_ok());
}

/// WHAT: The primary display reports a non-zero resolution
/// WHY: Full-screen selection depends on it
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_live_display_when_querying_resolution_then_non_zero() {
    let screen = XcapScreen::primary().unwrap();
    let (width, height) = screen.resolution().unwrap();
    assert!(width > 0 && height > 0);
}
