//! User-facing sweep settings
//!
//! Loaded from `<config dir>/blocksweep/blocksweep.toml`, overridden by
//! command-line flags, then resolved into a [`BenchmarkConfig`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::BenchmarkConfig;
use crate::system::MemoryProbe;
use crate::util::units::{format_bytes, gigabytes_to_bytes};
use crate::{Result, SweepError, APP_NAME, CONFIG_FILE, RESULTS_CSV};

/// Which flavour of the benchmark to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Test file of twice the requested size (or RAM), request cap on
    #[default]
    Full,
    /// Small fixed test file, no request cap
    Light,
}

/// Settings as written by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub preset: Preset,
    /// Requested size in GiB; `0` means "use physical RAM"
    pub size_gb: Option<f64>,
    /// Whether `size_gb = 0` may fall back to RAM detection
    pub detect_ram: bool,
    /// Block sizes in bytes; empty selects the defaults
    pub block_sizes: Vec<u64>,
    /// Ceiling on operations per phase; `0` disables it
    pub request_cap: Option<u64>,
    pub size_multiplier: Option<u64>,
    pub work_dir: Option<PathBuf>,
    pub csv_path: PathBuf,
    pub seed: Option<u64>,
    pub keep_files: bool,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            preset: Preset::Full,
            size_gb: None,
            detect_ram: true,
            block_sizes: Vec::new(),
            request_cap: None,
            size_multiplier: None,
            work_dir: None,
            csv_path: PathBuf::from(RESULTS_CSV),
            seed: None,
            keep_files: false,
        }
    }
}

impl SweepSettings {
    /// Load settings from the standard location, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SweepError::ConfigError(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings: Self = toml::from_str(&content).map_err(|e| {
            SweepError::ConfigError(format!(
                "Failed to parse settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to the standard location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Uses $CONFIG_HOME/blocksweep/blocksweep.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            SweepError::ConfigError("Unable to determine config directory".to_string())
        })?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve into a validated [`BenchmarkConfig`], detecting RAM through
    /// `probe` when the size asks for it.
    pub fn resolve(&self, probe: &dyn MemoryProbe) -> Result<BenchmarkConfig> {
        let mut config = match self.preset {
            Preset::Full => {
                let gb = self.size_gb.unwrap_or(0.0);
                BenchmarkConfig::new(resolve_target_bytes(gb, self.detect_ram, probe)?)
            }
            Preset::Light => match self.size_gb {
                Some(gb) if gb != 0.0 => {
                    let target = resolve_target_bytes(gb, false, probe)?;
                    BenchmarkConfig {
                        target_total_bytes: target,
                        ..BenchmarkConfig::light()
                    }
                }
                _ => BenchmarkConfig::light(),
            },
        };

        if !self.block_sizes.is_empty() {
            config.block_sizes = self.block_sizes.clone();
        }
        match self.request_cap {
            Some(0) => config.request_cap = None,
            Some(cap) => config.request_cap = Some(cap),
            None => {}
        }
        if let Some(multiplier) = self.size_multiplier {
            config.size_multiplier = multiplier;
        }
        if let Some(dir) = &self.work_dir {
            config.work_dir = dir.clone();
        }
        config.seed = self.seed;
        config.keep_files = self.keep_files;

        config.validate()?;
        info!(
            "Target {} x{} = {} test file, request cap {}",
            format_bytes(config.target_total_bytes),
            config.size_multiplier,
            format_bytes(config.file_size()),
            config
                .request_cap
                .map_or_else(|| "off".to_string(), |cap| cap.to_string())
        );
        Ok(config)
    }
}

/// Turn a GiB request into bytes; `0` detects RAM when allowed.
pub fn resolve_target_bytes(gb: f64, detect_ram: bool, probe: &dyn MemoryProbe) -> Result<u64> {
    if !gb.is_finite() || gb < 0.0 {
        return Err(SweepError::ConfigError(format!("Invalid GB value: {}", gb)));
    }
    if gb == 0.0 {
        if !detect_ram {
            return Err(SweepError::ConfigError(
                "Size is 0 and RAM detection is disabled".to_string(),
            ));
        }
        return probe.total_memory();
    }
    match gigabytes_to_bytes(gb) {
        0 => Err(SweepError::ConfigError(format!(
            "Invalid GB value: {} is less than one byte",
            gb
        ))),
        bytes => Ok(bytes),
    }
}
