//! Persisted waveform data for one audio asset

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::peaks::{PeakReport, PeakSequence};

/// Namespace for sample ids derived from storage keys
const SAMPLE_NAMESPACE: Uuid = Uuid::from_u128(0x5b2f_6c1e_8a43_4d0f_9e7a_3c21_d4b8_a601);

/// Stable id for an audio asset, so re-running a batch updates the same row
pub fn sample_id_for(audio_path: &str) -> Uuid {
    Uuid::new_v5(&SAMPLE_NAMESPACE, audio_path.as_bytes())
}

/// Current peak sequence of one audio asset plus the header facts behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformRecord {
    pub sample_id: Uuid,
    /// Storage key, relative to the audio root
    pub audio_path: String,
    pub peaks: PeakSequence,
    pub num_channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: Option<u32>,
    pub duration_ms: Option<u64>,
    pub computed_at: DateTime<Utc>,
}

impl WaveformRecord {
    pub fn from_report(audio_path: &str, report: PeakReport) -> Self {
        let duration_ms = report.duration_ms();
        Self {
            sample_id: sample_id_for(audio_path),
            audio_path: audio_path.to_string(),
            num_channels: report.layout.num_channels,
            bits_per_sample: report.layout.bits_per_sample,
            sample_rate: report.layout.sample_rate,
            duration_ms,
            peaks: report.peaks,
            computed_at: spk_common::time::now(),
        }
    }
}
