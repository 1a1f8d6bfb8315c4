//! Collaborators around the extraction core: where audio comes from, where
//! peaks go, which files to process and how a batch is driven.

pub mod audio_source;
pub mod batch_processor;
pub mod file_scanner;
pub mod peak_store;

pub use audio_source::{AudioSource, FsAudioSource};
pub use batch_processor::{BatchFailure, BatchProcessor, BatchSummary};
pub use file_scanner::{FileScanner, ScanError};
pub use peak_store::{PeakStore, SqlitePeakStore};
