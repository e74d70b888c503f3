mod capture;
mod chunk;
mod recording;

pub use {
    capture::CpalChunkSource,
    chunk::{AudioChunk, CHUNK_FRAMES, ChunkSource, WaveFormat},
    recording::{AUDIO_FILE_NAME, AudioRecording, READ_POLL_INTERVAL},
};
