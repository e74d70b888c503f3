use crate::{
    AUDIO_JOIN_TIMEOUT, AudioStatus, BoundingBox, CHUNK_FRAMES, CaptureStop, FrameSize,
    QualityPreset, Recorder, RecorderError, RecordingOptions, ScreenPoint, SessionStatus,
    tests::fakes::{FakeBackend, SinkProbe},
};

use std::{
    sync::atomic::Ordering,
    time::{Duration, Instant},
};

use hound::WavReader;

#[allow(clippy::unwrap_used)]
fn region(x1: u32, y1: u32, x2: u32, y2: u32) -> BoundingBox {
    BoundingBox::from_corners(ScreenPoint::new(x1, y1), ScreenPoint::new(x2, y2)).unwrap()
}

fn options(quality: QualityPreset, record_audio: bool) -> RecordingOptions {
    RecordingOptions {
        quality,
        record_audio,
    }
}

async fn wait_for_frames(probe: &SinkProbe, frames: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while probe.frame_count() < frames && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// WHAT: Start without a selection is rejected
/// WHY: A session needs a region; state must stay Idle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_recorder_when_starting_then_no_selection_and_still_idle() {
    // Given: A recorder with nothing selected
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new();
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());

    // When: Starting
    let result = recorder.start(RecordingOptions::default()).await;

    // Then: Rejected, Idle, no sink opened
    assert!(matches!(result, Err(RecorderError::NoSelection { .. })));
    assert_eq!(recorder.status(), SessionStatus::Idle);
    assert_eq!(probe.opened.load(Ordering::SeqCst), 0);
}

/// WHAT: A second start while recording is rejected
/// WHY: At most one session may exist
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_starting_again_then_already_recording() {
    // Given: A running session
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new();
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    recorder.arm(region(0, 0, 640, 480)).unwrap();
    let first = recorder.start(RecordingOptions::default()).await.unwrap();

    // When: Starting again
    let second = recorder.start(RecordingOptions::default()).await;

    // Then: Rejected; the first session is the only one
    assert!(matches!(second, Err(RecorderError::AlreadyRecording { .. })));
    assert!(matches!(
        recorder.status(),
        SessionStatus::Recording { session_id, .. } if session_id == first.session_id
    ));
    assert_eq!(probe.opened.load(Ordering::SeqCst), 1);

    recorder.stop().await.unwrap();
}

/// WHAT: Stop outside a session is rejected and touches no sink
/// WHY: Stop must be a no-op when nothing records
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_not_recording_when_stopping_then_not_recording_and_no_sink_activity() {
    // Given: An idle recorder, then an armed one
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new();
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());

    // When/Then: Stop is rejected in both states
    assert!(matches!(
        recorder.stop().await,
        Err(RecorderError::NotRecording { .. })
    ));
    recorder.arm(region(10, 10, 110, 60)).unwrap();
    assert!(matches!(
        recorder.stop().await,
        Err(RecorderError::NotRecording { .. })
    ));

    // And: State and sink untouched
    assert_eq!(
        recorder.status(),
        SessionStatus::Armed {
            region: region(10, 10, 110, 60)
        }
    );
    assert_eq!(probe.opened.load(Ordering::SeqCst), 0);
    assert_eq!(probe.finish_calls.load(Ordering::SeqCst), 0);
}

/// WHAT: A full session writes every captured frame at the derived size
/// WHY: End-to-end lifecycle: arm, start, capture, stop, re-arm kept
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_armed_vga_region_when_recording_then_all_frames_written_and_selection_kept() {
    // Given: 640x480 region, 480p, no audio
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new();
    let probe = backend.probe.clone();
    let delivered = backend.delivered.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    let vga = region(0, 0, 640, 480);
    recorder.arm(vga).unwrap();

    // When: Recording for at least 5 frames, then stopping
    let started = recorder
        .start(options(QualityPreset::P480, false))
        .await
        .unwrap();
    wait_for_frames(&probe, 5).await;
    let stopped = recorder.stop().await.unwrap();

    // Then: Target size is 640x480 and the file exists
    assert_eq!(started.size, FrameSize::new(640, 480));
    assert_eq!(started.audio, AudioStatus::Disabled);
    assert!(stopped.video_path.exists());
    assert_eq!(stopped.video_path, dir.path().join("screen_record.mp4"));

    // And: Frames grabbed == frames written, none lost or duplicated
    let written = probe.frame_count();
    assert!(written >= 5);
    assert_eq!(stopped.capture.frames_written as usize, written);
    assert_eq!(delivered.load(Ordering::SeqCst), written);
    assert_eq!(stopped.capture.stop, CaptureStop::Cancelled);
    assert_eq!(probe.finish_calls.load(Ordering::SeqCst), 1);
    assert!(stopped.audio.is_none());

    // And: The selection is retained for another take
    assert_eq!(recorder.status(), SessionStatus::Armed { region: vga });
}

/// WHAT: Audio requested without an input device falls back to video only
/// WHY: Missing audio must not prevent recording, and no WAV is written
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_audio_device_when_recording_with_audio_then_video_only() {
    // Given: No audio devices
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new();
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    recorder.arm(region(0, 0, 320, 240)).unwrap();

    // When: Recording with audio enabled
    let started = recorder
        .start(options(QualityPreset::P720, true))
        .await
        .unwrap();
    wait_for_frames(&probe, 2).await;
    let stopped = recorder.stop().await.unwrap();

    // Then: Downgrade reported once at start, video written, no waveform
    assert_eq!(started.audio, AudioStatus::NoDevice);
    assert!(stopped.video_path.exists());
    assert!(stopped.audio.is_none());
    assert!(!recorder.audio_path().exists());
}

/// WHAT: Audio with a device produces a WAV of whole chunks
/// WHY: Audio is flushed once on stop, chunk count x 2048 frames
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_audio_device_when_recording_then_wave_file_matches_chunks() {
    // Given: An audio device
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.has_audio = true;
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    recorder.arm(region(0, 0, 320, 240)).unwrap();

    // When: Recording long enough for a few chunks
    let started = recorder
        .start(options(QualityPreset::P480, true))
        .await
        .unwrap();
    wait_for_frames(&probe, 3).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let stopped = recorder.stop().await.unwrap();

    // Then: The waveform holds exactly chunks x 2048 frames
    assert_eq!(started.audio, AudioStatus::Recording);
    let audio = stopped.audio.unwrap();
    assert!(audio.chunks > 0);
    assert_eq!(audio.sample_frames, audio.chunks * CHUNK_FRAMES);
    let file = audio.file.unwrap();
    assert_eq!(file, recorder.audio_path());
    let reader = WavReader::open(&file).unwrap();
    assert_eq!(reader.duration() as usize, audio.chunks * CHUNK_FRAMES);
}

/// WHAT: A sink that cannot open makes start fail without a session
/// WHY: Start errors must leave the recorder Armed
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_broken_encoder_when_starting_then_error_and_still_armed() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.fail_sink_open = true;
    let mut recorder = Recorder::new(backend, dir.path());
    let selected = region(0, 0, 200, 100);
    recorder.arm(selected).unwrap();

    let result = recorder.start(RecordingOptions::default()).await;

    assert!(matches!(result, Err(RecorderError::EncoderError { .. })));
    assert_eq!(recorder.status(), SessionStatus::Armed { region: selected });
}

/// WHAT: A capture failure ends the loop; stop reports it
/// WHY: Background failures surface only when the session is stopped
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_display_failure_when_stopping_then_partial_recording_reported() {
    // Given: A display failing after 4 frames
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.fail_after = Some(4);
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    recorder.arm(region(0, 0, 640, 480)).unwrap();

    // When: Recording until the loop gives up
    recorder.start(RecordingOptions::default()).await.unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !probe.finished.load(Ordering::SeqCst) && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let stopped = recorder.stop().await.unwrap();

    // Then: Four frames kept, sink finalized, failure reported
    assert_eq!(stopped.capture.frames_written, 4);
    assert!(matches!(stopped.capture.stop, CaptureStop::Failed(_)));
    assert_eq!(probe.finish_calls.load(Ordering::SeqCst), 1);
}

/// WHAT: Full-screen selection arms the recorder with the display size
/// WHY: Shortcut selection goes through the same state machine
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_display_when_selecting_full_screen_then_armed_with_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.resolution = (1366, 768);
    let mut recorder = Recorder::new(backend, dir.path());

    let selected = recorder.select_full_screen().await.unwrap();

    assert_eq!(selected, region(0, 0, 1366, 768));
    assert_eq!(recorder.status(), SessionStatus::Armed { region: selected });
}

/// WHAT: The region cannot change during a session
/// WHY: The bounding box is immutable once recording starts
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_arming_new_region_then_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut recorder = Recorder::new(FakeBackend::new(), dir.path());
    let original = region(0, 0, 640, 480);
    recorder.arm(original).unwrap();
    recorder.start(RecordingOptions::default()).await.unwrap();

    let rearm = recorder.arm(region(5, 5, 50, 50));
    let full = recorder.select_full_screen().await;

    assert!(matches!(rearm, Err(RecorderError::AlreadyRecording { .. })));
    assert!(matches!(full, Err(RecorderError::AlreadyRecording { .. })));
    recorder.stop().await.unwrap();
    assert_eq!(recorder.status(), SessionStatus::Armed { region: original });
}

/// WHAT: A device that exists but refuses to open is reported at start
/// WHY: The user must be told once that recording is video only
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_audio_device_that_fails_to_open_when_starting_then_unavailable_and_video_only() {
    // Given: An input device that errors when opened
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.has_audio = true;
    backend.fail_audio_open = true;
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    recorder.arm(region(0, 0, 320, 240)).unwrap();

    // When: Recording with audio enabled
    let started = recorder
        .start(options(QualityPreset::P480, true))
        .await
        .unwrap();
    wait_for_frames(&probe, 2).await;
    let stopped = recorder.stop().await.unwrap();

    // Then: Start already says audio is unavailable
    assert_eq!(started.audio, AudioStatus::Unavailable);

    // And: Video recorded, no waveform
    assert!(stopped.video_path.exists());
    assert!(stopped.capture.frames_written >= 2);
    assert!(stopped.audio.is_none());
    assert!(!recorder.audio_path().exists());
}

/// WHAT: Stop gives up on an audio read that outlasts the join timeout
/// WHY: A stuck audio device must not keep the video from being finalized
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_audio_read_blocking_past_timeout_when_stopping_then_video_finalized_without_audio() {
    // Given: Audio reads that block longer than the join timeout
    let dir = tempfile::tempdir().unwrap();
    let mut backend = FakeBackend::new();
    backend.has_audio = true;
    backend.audio_delay = AUDIO_JOIN_TIMEOUT + Duration::from_millis(500);
    let probe = backend.probe.clone();
    let mut recorder = Recorder::new(backend, dir.path());
    recorder.arm(region(0, 0, 320, 240)).unwrap();
    let started = recorder
        .start(options(QualityPreset::P480, true))
        .await
        .unwrap();
    assert_eq!(started.audio, AudioStatus::Recording);
    wait_for_frames(&probe, 2).await;

    // When: Stopping while the audio read is still blocked
    let stop_started = Instant::now();
    let stopped = recorder.stop().await.unwrap();
    let waited = stop_started.elapsed();

    // Then: Stop waited for the timeout, not for the read
    assert!(waited >= AUDIO_JOIN_TIMEOUT);
    assert!(waited < AUDIO_JOIN_TIMEOUT + Duration::from_millis(400));

    // And: No audio report, video finalized exactly once
    assert!(stopped.audio.is_none());
    assert_eq!(stopped.capture.stop, CaptureStop::Cancelled);
    assert_eq!(probe.finish_calls.load(Ordering::SeqCst), 1);
    assert!(stopped.video_path.exists());
}
