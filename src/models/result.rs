//! Benchmark result data models
//!
//! Per-phase timings, the per-block-size record built from them, derived
//! bandwidth figures and the serializable report of a whole sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::bench::metrics;

/// The four timed phases run for every block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    SequentialRead,
    RandomRead,
    SequentialWrite,
    RandomWrite,
}

impl Phase {
    /// Execution order within one block size
    pub const ALL: [Phase; 4] = [
        Phase::SequentialRead,
        Phase::RandomRead,
        Phase::SequentialWrite,
        Phase::RandomWrite,
    ];

    /// Get a human-readable description of the phase
    pub fn description(&self) -> &'static str {
        match self {
            Phase::SequentialRead => "Sequential Read",
            Phase::RandomRead => "Random Read",
            Phase::SequentialWrite => "Sequential Write",
            Phase::RandomWrite => "Random Write",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of one timed phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTiming {
    /// Wall time from phase start to its end or first failure
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
    /// Loop iterations that issued their read or write
    pub operations: u64,
    /// Diagnostic for a phase that stopped on an error
    pub error: Option<String>,
}

impl PhaseTiming {
    pub fn completed(elapsed: Duration, operations: u64) -> Self {
        Self {
            elapsed,
            operations,
            error: None,
        }
    }

    pub fn failed(elapsed: Duration, operations: u64, error: impl Into<String>) -> Self {
        Self {
            elapsed,
            operations,
            error: Some(error.into()),
        }
    }

    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Timings of the four phases for one block size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    /// Bytes per read/write call
    pub block_size: u64,
    /// Operations requested per phase
    pub request_count: u64,
    pub seq_read: PhaseTiming,
    pub rand_read: PhaseTiming,
    pub seq_write: PhaseTiming,
    pub rand_write: PhaseTiming,
}

impl PhaseResult {
    pub fn timing(&self, phase: Phase) -> &PhaseTiming {
        match phase {
            Phase::SequentialRead => &self.seq_read,
            Phase::RandomRead => &self.rand_read,
            Phase::SequentialWrite => &self.seq_write,
            Phase::RandomWrite => &self.rand_write,
        }
    }

    pub fn seq_read_seconds(&self) -> f64 {
        self.seq_read.seconds()
    }

    pub fn rand_read_seconds(&self) -> f64 {
        self.rand_read.seconds()
    }

    pub fn seq_write_seconds(&self) -> f64 {
        self.seq_write.seconds()
    }

    pub fn rand_write_seconds(&self) -> f64 {
        self.rand_write.seconds()
    }

    /// Phases that stopped on an error
    pub fn failed_phases(&self) -> Vec<Phase> {
        Phase::ALL
            .into_iter()
            .filter(|phase| self.timing(*phase).is_failed())
            .collect()
    }
}

/// MB/s per phase, derived from a [`PhaseResult`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandwidthResult {
    pub seq_read_mbps: f64,
    pub rand_read_mbps: f64,
    pub seq_write_mbps: f64,
    pub rand_write_mbps: f64,
}

impl BandwidthResult {
    pub fn from_phases(result: &PhaseResult) -> Self {
        let bw = |secs: f64| metrics::bandwidth(secs, result.block_size, result.request_count);
        Self {
            seq_read_mbps: bw(result.seq_read_seconds()),
            rand_read_mbps: bw(result.rand_read_seconds()),
            seq_write_mbps: bw(result.seq_write_seconds()),
            rand_write_mbps: bw(result.rand_write_seconds()),
        }
    }
}

/// One block size worth of measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub phases: PhaseResult,
    pub bandwidth: BandwidthResult,
    /// MiB moved by each phase
    pub total_data_mb: f64,
}

impl SweepRow {
    pub fn new(phases: PhaseResult) -> Self {
        let bandwidth = BandwidthResult::from_phases(&phases);
        let total_data_mb = metrics::total_data_mb(phases.block_size, phases.request_count);
        Self {
            phases,
            bandwidth,
            total_data_mb,
        }
    }

    pub fn block_size(&self) -> u64 {
        self.phases.block_size
    }
}

/// Everything produced by one sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// When the sweep started
    pub timestamp: DateTime<Utc>,
    /// Size requested by the caller before the multiplier
    pub target_total_bytes: u64,
    /// Size of the provisioned test file
    pub file_size: u64,
    pub rows: Vec<SweepRow>,
    /// Block sizes that yielded zero requests against the test file
    pub skipped_block_sizes: Vec<u64>,
}

impl SweepReport {
    pub fn new(target_total_bytes: u64, file_size: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            target_total_bytes,
            file_size,
            rows: Vec::new(),
            skipped_block_sizes: Vec::new(),
        }
    }

    /// Number of phases that failed across all rows
    pub fn failed_phase_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.phases.failed_phases().len())
            .sum()
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_nanos() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
