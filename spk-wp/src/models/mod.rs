//! Data models

pub mod waveform;

pub use waveform::{sample_id_for, WaveformRecord};
