//! Waveform peak extraction
//!
//! Turns a complete WAV buffer into a short sequence of normalized peak
//! magnitudes for waveform rendering. Pure and deterministic: no I/O, no
//! logging, no shared state, so independent buffers can be processed on any
//! number of threads.
//!
//! Decimation:
//! - `total_samples = floor(data_len / frame_width)`
//! - `samples_per_peak = max(1, floor(total_samples / target_peaks))`
//! - one peak per window of `samples_per_peak` frames, the last window may be short
//! - only the first channel of each frame is read
//! - each peak is `max |sample| / 2^(bits - 1)`, clamped to `[0, 1]`
//!
//! The output therefore has `ceil(total_samples / samples_per_peak)` elements.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use thiserror::Error;

use crate::error::FormatError;
use crate::wav::{pcm, read_layout, WavLayout};

/// Number of peaks produced when no target is given
pub const DEFAULT_TARGET_PEAKS: usize = 300;

/// Ordered peak magnitudes, each in `[0, 1]`
///
/// Serializes as a plain JSON array. Deserialization rejects values outside
/// `[0, 1]` (including NaN) so a corrupt stored row never reaches a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f32>", try_from = "Vec<f32>")]
pub struct PeakSequence(Vec<f32>);

/// A value outside `[0, 1]` was offered as a peak
#[derive(Debug, Clone, PartialEq, Error)]
#[error("peak {index} out of range: {value}")]
pub struct PeakRangeError {
    pub index: usize,
    pub value: f32,
}

impl PeakSequence {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Largest peak, 0.0 for an empty sequence
    pub fn max_peak(&self) -> f32 {
        self.0.iter().copied().fold(0.0, f32::max)
    }
}

impl Deref for PeakSequence {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl TryFrom<Vec<f32>> for PeakSequence {
    type Error = PeakRangeError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(PeakRangeError { index, value });
        }
        Ok(Self(values))
    }
}

impl From<PeakSequence> for Vec<f32> {
    fn from(peaks: PeakSequence) -> Self {
        peaks.0
    }
}

/// Extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakOptions {
    /// Desired number of peaks; 0 is treated as 1
    pub target_peaks: usize,
    /// Reject unsupported bit depths, non-PCM formats and a missing "fmt "
    /// chunk instead of decoding them as silence or with defaults
    pub strict: bool,
}

impl Default for PeakOptions {
    fn default() -> Self {
        Self {
            target_peaks: DEFAULT_TARGET_PEAKS,
            strict: false,
        }
    }
}

impl PeakOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_peaks(mut self, target_peaks: usize) -> Self {
        self.target_peaks = target_peaks;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Peaks plus the facts they were derived from
#[derive(Debug, Clone, PartialEq)]
pub struct PeakReport {
    pub peaks: PeakSequence,
    pub layout: WavLayout,
    pub total_samples: usize,
    pub samples_per_peak: usize,
}

impl PeakReport {
    /// Audio duration, when the header carried a sample rate
    pub fn duration_ms(&self) -> Option<u64> {
        self.layout
            .sample_rate
            .and_then(|rate| spk_common::time::frames_to_millis(self.total_samples as u64, rate))
    }
}

/// Window size for a given number of frames: `max(1, floor(total / target))`
pub fn samples_per_peak(total_samples: usize, target_peaks: usize) -> usize {
    (total_samples / target_peaks.max(1)).max(1)
}

/// Extract the default 300-peak sequence
pub fn extract_peaks(buffer: &[u8]) -> Result<PeakSequence, FormatError> {
    extract_peaks_with(buffer, &PeakOptions::default()).map(|report| report.peaks)
}

/// Extract peaks with explicit options, keeping the parsed layout
pub fn extract_peaks_with(buffer: &[u8], options: &PeakOptions) -> Result<PeakReport, FormatError> {
    let layout = read_layout(buffer, options.strict)?;

    if layout.frame_width() == 0 {
        return Err(FormatError::InvalidFrameLayout {
            channels: layout.num_channels,
            bits_per_sample: layout.bits_per_sample,
        });
    }

    if options.strict && !pcm::is_supported_bit_depth(layout.bits_per_sample) {
        return Err(FormatError::UnsupportedBitDepth(layout.bits_per_sample));
    }

    let total_samples = layout.total_samples();
    let samples_per_peak = samples_per_peak(total_samples, options.target_peaks);
    let frame_width = layout.frame_width();

    // Whole frames only; a trailing partial frame is never read
    let pcm_bytes = &layout.data(buffer)[..total_samples * frame_width];

    let peaks = pcm_bytes
        .chunks(samples_per_peak * frame_width)
        .map(|window| window_peak(window, frame_width, layout.bits_per_sample))
        .collect();

    Ok(PeakReport {
        peaks: PeakSequence(peaks),
        layout,
        total_samples,
        samples_per_peak,
    })
}

/// Largest first-channel magnitude in a window of whole frames
fn window_peak(window: &[u8], frame_width: usize, bits_per_sample: u16) -> f32 {
    let max = window
        .chunks_exact(frame_width)
        .map(|frame| pcm::normalize(pcm::decode_sample(frame, bits_per_sample), bits_per_sample))
        .fold(0.0f64, f64::max);

    max.clamp(0.0, 1.0) as f32
}
