use crate::CoreResult;

use std::time::Duration;

/// Sample frames delivered per read.
pub const CHUNK_FRAMES: usize = 2048;

/// PCM layout of captured audio. Samples are always 32-bit float,
/// interleaved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveFormat {
    /// Interleaved channel count.
    pub channels: u16,
    /// Sample frames per second.
    pub sample_rate: u32,
}

impl WaveFormat {
    /// Stereo at 44.1 kHz, requested from every device first.
    pub const PREFERRED: WaveFormat = WaveFormat {
        channels: 2,
        sample_rate: 44_100,
    };

    /// Interleaved samples in one chunk.
    pub fn chunk_samples(&self) -> usize {
        CHUNK_FRAMES * usize::from(self.channels)
    }
}

/// One fixed-size block of interleaved samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    samples: Vec<f32>,
}

impl AudioChunk {
    /// Wrap interleaved samples.
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Blocking source of audio chunks, e.g. an open input device.
///
/// Dropping the source releases the underlying device.
pub trait ChunkSource {
    /// Layout of the chunks this source produces.
    fn format(&self) -> WaveFormat;

    /// Wait up to `timeout` for the next chunk. `Ok(None)` means nothing
    /// arrived in time; that is not an error.
    fn read_chunk(&mut self, timeout: Duration) -> CoreResult<Option<AudioChunk>>;
}
