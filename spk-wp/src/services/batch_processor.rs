//! Batch peak extraction
//!
//! Fetches each audio asset, extracts peaks on the blocking pool and stores
//! the result. Files are independent: one failure never aborts the batch and
//! never touches the stored peaks of that file.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::models::WaveformRecord;
use crate::peaks::{extract_peaks_with, PeakOptions};
use crate::services::{AudioSource, PeakStore};

/// Default number of files processed concurrently
pub const DEFAULT_WORKERS: usize = 4;

/// One file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub key: String,
    pub reason: String,
}

/// Per-batch success/failure counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sorted by key
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Drives fetch → extract → store for many files
pub struct BatchProcessor<S, P> {
    source: S,
    store: P,
    options: PeakOptions,
    workers: usize,
}

impl<S: AudioSource, P: PeakStore> BatchProcessor<S, P> {
    pub fn new(source: S, store: P, options: PeakOptions) -> Self {
        Self {
            source,
            store,
            options,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Process a single storage key
    ///
    /// Nothing is written unless extraction succeeds.
    pub async fn process_one(&self, key: &str) -> Result<WaveformRecord> {
        let bytes = self.source.fetch(key).await?;
        let options = self.options;

        // CPU-bound; keep it off the async workers
        let report = tokio::task::spawn_blocking(move || extract_peaks_with(&bytes, &options))
            .await
            .map_err(|e| Error::Worker(e.to_string()))??;

        let record = WaveformRecord::from_report(key, report);
        self.store.save(&record).await?;

        Ok(record)
    }

    /// Process every key with bounded concurrency
    pub async fn process(&self, keys: Vec<String>) -> BatchSummary {
        let total = keys.len();
        let completed = AtomicUsize::new(0);

        tracing::info!(total, workers = self.workers, "Starting waveform batch");

        let results: Vec<(String, Result<WaveformRecord>)> = stream::iter(keys)
            .map(|key| {
                let completed = &completed;
                async move {
                    let result = self.process_one(&key).await;

                    match &result {
                        Ok(record) => tracing::info!(
                            key = %key,
                            peaks = record.peaks.len(),
                            duration_ms = ?record.duration_ms,
                            "Waveform peaks stored"
                        ),
                        Err(e) => tracing::warn!(key = %key, error = %e, "Waveform extraction failed"),
                    }

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % 10 == 0 || done == total {
                        tracing::info!(progress = %format!("{}/{}", done, total), "Batch progress");
                    }

                    (key, result)
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };

        for (key, result) in results {
            match result {
                Ok(_) => summary.succeeded += 1,
                Err(e) => summary.failures.push(BatchFailure {
                    key,
                    reason: e.to_string(),
                }),
            }
        }

        summary.failures.sort_by(|a, b| a.key.cmp(&b.key));
        summary.failed = summary.failures.len();

        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Waveform batch completed"
        );

        summary
    }
}
