//! Input device capture through `cpal`.

use crate::{
    CoreResult, RecorderError,
    audio::{AudioChunk, ChunkSource, WaveFormat},
};

use std::{
    panic::Location,
    sync::mpsc::{Receiver, RecvTimeoutError, TrySendError, sync_channel},
    time::Duration,
};

use cpal::{
    BufferSize, Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{error, info, instrument, trace, warn};

/// Chunks buffered between the device callback and the reader
/// (about three seconds of stereo audio at 44.1 kHz).
///
/// When the reader falls behind, newer chunks are dropped rather than
/// growing the queue.
const CHUNK_QUEUE_DEPTH: usize = 64;

/// First input device of the default host, opened for capture.
///
/// `cpal` streams are `!Send` on some platforms, so open this on the thread
/// that reads from it.
pub struct CpalChunkSource {
    // Held for its Drop: dropping the stream stops the device.
    _stream: Stream,
    chunk_rx: Receiver<Vec<f32>>,
    format: WaveFormat,
}

impl CpalChunkSource {
    /// Whether any device reports at least one input channel.
    pub fn has_input_device() -> bool {
        first_input_device().is_some()
    }

    /// Open the first device with an input channel.
    ///
    /// Returns `Ok(None)` when there is no such device. Stereo 44.1 kHz is
    /// tried first; if the device refuses it, its default input format is
    /// used instead.
    #[track_caller]
    #[instrument]
    pub fn open_first_input() -> CoreResult<Option<Self>> {
        let Some(device) = first_input_device() else {
            info!("No audio input device found");
            return Ok(None);
        };

        let preferred = StreamConfig {
            channels: WaveFormat::PREFERRED.channels,
            sample_rate: WaveFormat::PREFERRED.sample_rate,
            buffer_size: BufferSize::Default,
        };

        let (stream, chunk_rx, config) = match build_stream(&device, preferred.clone()) {
            Ok((stream, rx)) => (stream, rx, preferred),
            Err(e) => {
                warn!(error = %e, "Preferred audio format rejected, using device default");
                let config: StreamConfig = device
                    .default_input_config()
                    .map_err(|e| RecorderError::AudioDeviceError {
                        reason: format!("Failed to get config: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?
                    .into();
                let (stream, rx) = build_stream(&device, config.clone())?;
                (stream, rx, config)
            }
        };

        stream.play().map_err(|e| RecorderError::AudioDeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let format = WaveFormat {
            channels: config.channels,
            sample_rate: config.sample_rate,
        };

        info!(
            device_id = ?device.id(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Audio capture started"
        );

        Ok(Some(Self {
            _stream: stream,
            chunk_rx,
            format,
        }))
    }
}

impl ChunkSource for CpalChunkSource {
    fn format(&self) -> WaveFormat {
        self.format
    }

    #[track_caller]
    fn read_chunk(&mut self, timeout: Duration) -> CoreResult<Option<AudioChunk>> {
        match self.chunk_rx.recv_timeout(timeout) {
            Ok(samples) => Ok(Some(AudioChunk::new(samples))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(RecorderError::AudioDeviceError {
                reason: "Audio stream closed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

fn first_input_device() -> Option<Device> {
    let host = cpal::default_host();

    let devices = match host.input_devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!(error = %e, "Failed to enumerate audio input devices");
            return None;
        }
    };

    devices.into_iter().find(|device| {
        device
            .default_input_config()
            .map(|config| config.channels() > 0)
            .unwrap_or(false)
    })
}

#[track_caller]
fn build_stream(device: &Device, config: StreamConfig) -> CoreResult<(Stream, Receiver<Vec<f32>>)> {
    let chunk_samples = WaveFormat {
        channels: config.channels,
        sample_rate: config.sample_rate,
    }
    .chunk_samples();

    let (chunk_tx, chunk_rx) = sync_channel(CHUNK_QUEUE_DEPTH);
    let mut pending: Vec<f32> = Vec::with_capacity(chunk_samples * 2);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                pending.extend_from_slice(data);
                while pending.len() >= chunk_samples {
                    let rest = pending.split_off(chunk_samples);
                    let chunk = std::mem::replace(&mut pending, rest);
                    match chunk_tx.try_send(chunk) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => trace!("Audio queue full, chunk dropped"),
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                }
            },
            |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| RecorderError::AudioDeviceError {
            reason: format!("Failed to build stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok((stream, chunk_rx))
}
