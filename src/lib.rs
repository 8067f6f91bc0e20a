//! blocksweep - block-size sweep disk benchmark
//!
//! Provisions a test file, then for every configured block size times a
//! sequential read, random read, sequential write and random write phase
//! against it and derives MB/s figures from the timings.

use thiserror::Error;

pub mod bench;
pub mod config;
pub mod io;
pub mod models;
pub mod report;
pub mod simple;
pub mod system;
pub mod util;

/// Errors produced by the benchmark and its collaborators
#[derive(Debug, Error)]
pub enum SweepError {
    /// Invalid or non-positive size, block size or settings value
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// System memory size could not be determined
    #[error("Detection error: {0}")]
    DetectionError(String),
    /// A buffer of the given size could not be reserved
    #[error("Allocation error: unable to reserve {bytes} bytes")]
    AllocationError { bytes: usize },
    /// Open/read/write/seek failure
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Report or settings serialization failure
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        SweepError::PersistenceError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(err: toml::de::Error) -> Self {
        SweepError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for SweepError {
    fn from(err: toml::ser::Error) -> Self {
        SweepError::PersistenceError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for blocksweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Error handling utilities
pub mod error {
    use super::SweepError;

    /// Whether an error raised inside a timed phase should stop the whole run.
    ///
    /// Phases are best-effort: only configuration problems escape them.
    pub fn is_fatal_in_phase(error: &SweepError) -> bool {
        matches!(error, SweepError::ConfigError(_))
    }

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &SweepError) -> String {
        match error {
            SweepError::ConfigError(msg) => {
                format!("Configuration error: {}. Check your flags or settings file.", msg)
            }
            SweepError::DetectionError(msg) => format!(
                "Could not detect system memory ({}). Pass an explicit size with --size-gb.",
                msg
            ),
            SweepError::AllocationError { bytes } => {
                format!("Could not allocate a {} byte buffer. Try smaller block sizes.", bytes)
            }
            SweepError::IoError(err) => match err.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    "Permission denied. Choose a writable --dir or check file permissions."
                        .to_string()
                }
                std::io::ErrorKind::StorageFull | std::io::ErrorKind::WriteZero => {
                    "Insufficient disk space. Free up space or request a smaller size.".to_string()
                }
                _ => error.to_string(),
            },
            SweepError::PersistenceError(msg) => format!(
                "Failed to write results: {}. Check disk space and permissions.",
                msg
            ),
        }
    }
}

pub const APP_NAME: &str = "blocksweep";
pub const CONFIG_FILE: &str = "blocksweep.toml";
pub const TEST_FILE: &str = "testfile.bin";
pub const SEQ_WRITE_FILE: &str = "temp_seq_write.bin";
pub const RAND_WRITE_FILE: &str = "temp_rand_write.bin";
pub const RESULTS_CSV: &str = "results.csv";

/// Block sizes exercised when none are configured
pub const DEFAULT_BLOCK_SIZES: [u64; 4] = [1, 1024, 32 * 1024, 1024 * 1024];

/// Operation ceiling per phase so tiny block sizes cannot stall a sweep
pub const DEFAULT_REQUEST_CAP: u64 = 10_000_000;
