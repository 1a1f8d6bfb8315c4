//! spk-wp library interface
//!
//! Waveform peak extraction for sample pack audio. The core (`wav`, `peaks`)
//! is a pure transform from a WAV byte buffer to a short sequence of
//! normalized peaks; `services` wires it to storage, the database and the
//! batch tool.

pub mod error;
pub mod models;
pub mod peaks;
pub mod services;
pub mod wav;

pub use crate::error::{Error, FormatError, Result};
pub use crate::peaks::{
    extract_peaks, extract_peaks_with, PeakOptions, PeakReport, PeakSequence,
    DEFAULT_TARGET_PEAKS,
};
