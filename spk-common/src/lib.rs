//! # SPK Common Library
//!
//! Shared code for the sample-pack tooling:
//! - Error type shared by every crate
//! - Configuration loading and root folder resolution
//! - Database initialization (samples table)
//! - Timestamp helpers

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
