//! Error types for spk-wp
//!
//! `FormatError` is the only failure the pure extraction core can produce.
//! `Error` is the service-level type used by the audio source, peak store,
//! batch processor and CLI.

use thiserror::Error;

use crate::wav::ChunkId;

/// Reasons a buffer cannot be turned into a peak sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Buffer does not begin with the ASCII tag "RIFF"
    #[error("not a valid WAV file")]
    NotRiff,

    /// Chunk walk reached the end of the buffer without a "data" chunk
    #[error("could not find data chunk")]
    MissingDataChunk,

    /// "data" appeared before any "fmt " chunk (strict mode only)
    #[error("data chunk found before fmt chunk")]
    MissingFmtChunk,

    /// A chunk we must read is shorter than its fixed fields
    #[error("{id} chunk truncated: need {needed} bytes, have {available}")]
    TruncatedChunk {
        id: ChunkId,
        needed: usize,
        available: usize,
    },

    /// Compressed or floating-point payload (strict mode only)
    #[error("unsupported audio format code: {0}")]
    UnsupportedAudioFormat(u16),

    /// Bit depth other than 16, 24 or 32 (strict mode only)
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// Zero channels or zero-width samples; no frame can be formed
    #[error("invalid frame layout: {channels} channels at {bits_per_sample} bits")]
    InvalidFrameLayout { channels: u16, bits_per_sample: u16 },
}

/// Service-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Audio buffer could not be parsed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Storage key escapes the audio root or is empty
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Database read or write failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored row cannot be turned back into a record
    #[error("Corrupt record for {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// Peak serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking extraction task panicked or was cancelled
    #[error("Worker error: {0}")]
    Worker(String),

    /// spk-common error
    #[error("Common error: {0}")]
    Common(#[from] spk_common::Error),
}

/// Convenience Result type using spk-wp Error
pub type Result<T> = std::result::Result<T, Error>;
