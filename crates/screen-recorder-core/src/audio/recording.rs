use crate::{
    CoreResult, RecorderError,
    audio::{AudioChunk, ChunkSource, WaveFormat},
};

use std::{panic::Location, path::Path, time::Duration};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Fixed output file name of the audio stream.
pub const AUDIO_FILE_NAME: &str = "temp_audio.wav";

/// Longest a single read blocks before the loop re-checks cancellation.
pub const READ_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Chunks accumulated during one session, in read order.
#[derive(Debug, Clone)]
pub struct AudioRecording {
    format: WaveFormat,
    chunks: Vec<AudioChunk>,
}

impl AudioRecording {
    /// Read chunks from `source` until `cancel` fires.
    ///
    /// Read errors are logged and the loop carries on. The source is
    /// dropped, releasing its device, before this returns.
    #[instrument(skip(source, cancel))]
    pub fn capture<S: ChunkSource>(source: S, cancel: &CancellationToken) -> Self {
        let mut source = source;
        let format = source.format();
        let mut chunks = Vec::new();

        while !cancel.is_cancelled() {
            match source.read_chunk(READ_POLL_INTERVAL) {
                Ok(Some(chunk)) => chunks.push(chunk),
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Stream read error");
                    std::thread::sleep(READ_POLL_INTERVAL);
                }
            }
        }

        drop(source);
        info!(chunks = chunks.len(), "Audio capture stopped");

        Self { format, chunks }
    }

    /// PCM layout of the captured chunks.
    pub fn format(&self) -> WaveFormat {
        self.format
    }

    /// Captured chunks in read order.
    pub fn chunks(&self) -> &[AudioChunk] {
        &self.chunks
    }

    /// Total sample frames across all chunks.
    pub fn sample_frames(&self) -> usize {
        let samples: usize = self.chunks.iter().map(|c| c.samples().len()).sum();
        samples / usize::from(self.format.channels.max(1))
    }

    /// Write all chunks as one uncompressed 32-bit float WAV file.
    ///
    /// Returns `Ok(false)` without touching the filesystem when nothing
    /// was captured.
    #[track_caller]
    #[instrument(skip(self), fields(chunks = self.chunks.len()))]
    pub fn save(&self, path: &Path) -> CoreResult<bool> {
        if self.chunks.is_empty() {
            debug!("No audio captured, skipping waveform file");
            return Ok(false);
        }

        let spec = WavSpec {
            channels: self.format.channels,
            sample_rate: self.format.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer =
            WavWriter::create(path, spec).map_err(|e| RecorderError::WaveWriteError {
                reason: format!("Failed to create {}: {}", path.display(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        for sample in self.chunks.iter().flat_map(|c| c.samples().iter().copied()) {
            writer
                .write_sample(sample)
                .map_err(|e| RecorderError::WaveWriteError {
                    reason: format!("Failed to write sample: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        writer.finalize().map_err(|e| RecorderError::WaveWriteError {
            reason: format!("Failed to finalize {}: {}", path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(
            path = %path.display(),
            sample_frames = self.sample_frames(),
            "Waveform file written"
        );

        Ok(true)
    }
}
