//! Waveform metadata store
//!
//! Holds at most one current peak sequence per audio asset. Saving replaces
//! the previous sequence wholesale; no history is kept. Callers only save
//! after a successful extraction, so a failure leaves the prior row intact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::WaveformRecord;
use crate::peaks::PeakSequence;

/// Destination for computed peak sequences
#[async_trait]
pub trait PeakStore: Send + Sync {
    /// Insert or overwrite the record for `record.audio_path`
    async fn save(&self, record: &WaveformRecord) -> Result<()>;

    /// Current record for an audio asset, if peaks were ever stored
    async fn load(&self, audio_path: &str) -> Result<Option<WaveformRecord>>;

    /// Number of assets with stored peaks
    async fn count(&self) -> Result<u64>;
}

/// `samples` table in the shared SQLite database
#[derive(Debug, Clone)]
pub struct SqlitePeakStore {
    db: SqlitePool,
}

impl SqlitePeakStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PeakStore for SqlitePeakStore {
    async fn save(&self, record: &WaveformRecord) -> Result<()> {
        let peaks_json = serde_json::to_string(&record.peaks)?;

        sqlx::query(
            r#"
            INSERT INTO samples (
                id, audio_path, waveform_peaks, num_channels, bits_per_sample,
                sample_rate, duration_ms, peaks_updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(audio_path) DO UPDATE SET
                waveform_peaks = excluded.waveform_peaks,
                num_channels = excluded.num_channels,
                bits_per_sample = excluded.bits_per_sample,
                sample_rate = excluded.sample_rate,
                duration_ms = excluded.duration_ms,
                peaks_updated_at = excluded.peaks_updated_at
            "#,
        )
        .bind(record.sample_id.to_string())
        .bind(&record.audio_path)
        .bind(peaks_json)
        .bind(record.num_channels as i64)
        .bind(record.bits_per_sample as i64)
        .bind(record.sample_rate.map(i64::from))
        .bind(record.duration_ms.map(|d| d as i64))
        .bind(record.computed_at)
        .execute(&self.db)
        .await?;

        tracing::debug!(
            audio_path = %record.audio_path,
            peaks = record.peaks.len(),
            "Stored waveform peaks"
        );

        Ok(())
    }

    async fn load(&self, audio_path: &str) -> Result<Option<WaveformRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, audio_path, waveform_peaks, num_channels, bits_per_sample,
                   sample_rate, duration_ms, peaks_updated_at
            FROM samples
            WHERE audio_path = ? AND waveform_peaks IS NOT NULL
            "#,
        )
        .bind(audio_path)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| record_from_row(audio_path, &row)).transpose()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM samples WHERE waveform_peaks IS NOT NULL")
                .fetch_one(&self.db)
                .await?;
        Ok(count as u64)
    }
}

fn record_from_row(key: &str, row: &SqliteRow) -> Result<WaveformRecord> {
    let corrupt = |reason: String| Error::CorruptRecord {
        key: key.to_string(),
        reason,
    };

    let id: String = row.try_get("id")?;
    let sample_id = Uuid::parse_str(&id).map_err(|e| corrupt(format!("id: {}", e)))?;

    let peaks_json: String = row.try_get("waveform_peaks")?;
    let peaks: PeakSequence =
        serde_json::from_str(&peaks_json).map_err(|e| corrupt(format!("waveform_peaks: {}", e)))?;

    let num_channels: i64 = row.try_get("num_channels")?;
    let bits_per_sample: i64 = row.try_get("bits_per_sample")?;
    let sample_rate: Option<i64> = row.try_get("sample_rate")?;
    let duration_ms: Option<i64> = row.try_get("duration_ms")?;
    let computed_at: DateTime<Utc> = row.try_get("peaks_updated_at")?;

    Ok(WaveformRecord {
        sample_id,
        audio_path: row.try_get("audio_path")?,
        peaks,
        num_channels: u16::try_from(num_channels)
            .map_err(|_| corrupt(format!("num_channels: {}", num_channels)))?,
        bits_per_sample: u16::try_from(bits_per_sample)
            .map_err(|_| corrupt(format!("bits_per_sample: {}", bits_per_sample)))?,
        sample_rate: sample_rate
            .map(u32::try_from)
            .transpose()
            .map_err(|_| corrupt("sample_rate out of range".to_string()))?,
        duration_ms: duration_ms
            .map(u64::try_from)
            .transpose()
            .map_err(|_| corrupt("duration_ms negative".to_string()))?,
        computed_at,
    })
}
