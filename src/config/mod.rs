//! Configuration management module
//!
//! `BenchmarkConfig` is the validated, fully resolved input of a sweep.
//! `SweepSettings` is the user-facing layer it is resolved from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Result, SweepError, DEFAULT_BLOCK_SIZES, DEFAULT_REQUEST_CAP};

pub mod settings;

pub use settings::{Preset, SweepSettings};

/// Target size used by the light preset
pub const LIGHT_TARGET_BYTES: u64 = 64 * 1024 * 1024;

/// Parameters of one sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Directory holding the test and scratch files
    pub work_dir: PathBuf,
    /// Requested size before the multiplier is applied (bytes)
    pub target_total_bytes: u64,
    /// Test file size is `size_multiplier * target_total_bytes`
    pub size_multiplier: u64,
    /// Block sizes to sweep, in order (bytes)
    pub block_sizes: Vec<u64>,
    /// Ceiling on operations per phase; `None` disables it
    pub request_cap: Option<u64>,
    /// Seed for offsets and test file content; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Whether to keep the test and scratch files after the run
    pub keep_files: bool,
}

impl BenchmarkConfig {
    /// Full preset: 2x the target, default block sizes, request cap on
    pub fn new(target_total_bytes: u64) -> Self {
        Self {
            work_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            target_total_bytes,
            size_multiplier: 2,
            block_sizes: DEFAULT_BLOCK_SIZES.to_vec(),
            request_cap: Some(DEFAULT_REQUEST_CAP),
            seed: None,
            keep_files: false,
        }
    }

    /// Light preset: a small fixed file of exactly the target size, no cap
    pub fn light() -> Self {
        Self {
            size_multiplier: 1,
            request_cap: None,
            ..Self::new(LIGHT_TARGET_BYTES)
        }
    }

    /// Size of the provisioned test file.
    ///
    /// Saturates on overflow; [`validate`](Self::validate) rejects such
    /// configurations.
    pub fn file_size(&self) -> u64 {
        self.target_total_bytes.saturating_mul(self.size_multiplier)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.work_dir.is_dir() {
            return Err(SweepError::ConfigError(format!(
                "Work directory does not exist: {}",
                self.work_dir.display()
            )));
        }

        if self.target_total_bytes == 0 {
            return Err(SweepError::ConfigError(
                "Target size must be greater than 0".to_string(),
            ));
        }

        if self.size_multiplier == 0 {
            return Err(SweepError::ConfigError(
                "Size multiplier must be greater than 0".to_string(),
            ));
        }

        if self
            .target_total_bytes
            .checked_mul(self.size_multiplier)
            .is_none()
        {
            return Err(SweepError::ConfigError(format!(
                "Test file size overflows: {} x {}",
                self.target_total_bytes, self.size_multiplier
            )));
        }

        if self.block_sizes.is_empty() {
            return Err(SweepError::ConfigError(
                "At least one block size is required".to_string(),
            ));
        }

        if self.block_sizes.contains(&0) {
            return Err(SweepError::ConfigError(
                "Block sizes must be greater than 0".to_string(),
            ));
        }

        if self.request_cap == Some(0) {
            return Err(SweepError::ConfigError(
                "Request cap must be greater than 0 (omit it to disable)".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the directory for test and scratch files
    pub fn with_work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = path;
        self
    }

    /// Set the block sizes to sweep
    pub fn with_block_sizes(mut self, block_sizes: Vec<u64>) -> Self {
        self.block_sizes = block_sizes;
        self
    }

    /// Set the request cap
    pub fn with_request_cap(mut self, cap: Option<u64>) -> Self {
        self.request_cap = cap;
        self
    }

    /// Set the test file size multiplier
    pub fn with_size_multiplier(mut self, multiplier: u64) -> Self {
        self.size_multiplier = multiplier;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether to keep files after the run
    pub fn with_keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_full_defaults() {
        let config = BenchmarkConfig::new(1024 * 1024);
        assert_eq!(config.file_size(), 2 * 1024 * 1024);
        assert_eq!(config.block_sizes, vec![1, 1024, 32768, 1048576]);
        assert_eq!(config.request_cap, Some(10_000_000));
    }

    #[test]
    fn test_light_preset() {
        let config = BenchmarkConfig::light();
        assert_eq!(config.file_size(), LIGHT_TARGET_BYTES);
        assert_eq!(config.request_cap, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let base = BenchmarkConfig::new(4096).with_work_dir(dir.path().to_path_buf());
        assert!(base.validate().is_ok());

        let cases = vec![
            BenchmarkConfig {
                target_total_bytes: 0,
                ..base.clone()
            },
            base.clone().with_size_multiplier(0),
            base.clone().with_block_sizes(vec![]),
            base.clone().with_block_sizes(vec![512, 0]),
            base.clone().with_request_cap(Some(0)),
            BenchmarkConfig {
                target_total_bytes: u64::MAX,
                ..base.clone()
            },
            base.clone().with_work_dir(dir.path().join("missing")),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(SweepError::ConfigError(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_toml_serialization() {
        let config = BenchmarkConfig::new(4096).with_seed(Some(9)).with_request_cap(None);
        let text = toml::to_string(&config).expect("Failed to serialize to TOML");
        let parsed: BenchmarkConfig = toml::from_str(&text).expect("Failed to parse TOML");
        assert_eq!(parsed, config);
    }
}
