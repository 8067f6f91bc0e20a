//! Block-size sweep
//!
//! Provisions the test file once, then runs the phase runner for every
//! configured block size, handing each finished row to the caller before
//! moving on so reports can be persisted incrementally.

use rand::Rng;
use tracing::info;

use crate::bench::provision::provision_test_file;
use crate::bench::runner::PhaseRunner;
use crate::config::BenchmarkConfig;
use crate::io::{BenchFiles, DiskIO, MonotonicClock, PlatformClock, PlatformDiskIO};
use crate::models::{SweepReport, SweepRow};
use crate::util::units::format_bytes;
use crate::Result;

/// Operations per phase for `block_size`: as many whole blocks as fit in
/// the file, bounded by `cap`. Zero means the block size is skipped.
pub fn request_count(file_size: u64, block_size: u64, cap: Option<u64>) -> u64 {
    if block_size == 0 {
        return 0;
    }
    let fit = file_size / block_size;
    match cap {
        Some(cap) => fit.min(cap),
        None => fit,
    }
}

/// Drives a full sweep over the configured block sizes
pub struct SweepRunner<D = PlatformDiskIO, C = MonotonicClock> {
    config: BenchmarkConfig,
    disk_io: D,
    clock: C,
}

impl SweepRunner {
    /// Create a sweep on the platform disk and clock
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        Self::with_parts(config, PlatformDiskIO::new(), MonotonicClock::new())
    }
}

impl<D, C> SweepRunner<D, C>
where
    D: DiskIO,
    C: PlatformClock,
{
    /// Create a sweep with explicit disk and clock capabilities
    pub fn with_parts(config: BenchmarkConfig, disk_io: D, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            disk_io,
            clock,
        })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// `(block_size, request_count)` for every configured block size
    pub fn plan(&self) -> Vec<(u64, u64)> {
        let file_size = self.config.file_size();
        self.config
            .block_sizes
            .iter()
            .map(|&bs| (bs, request_count(file_size, bs, self.config.request_cap)))
            .collect()
    }

    /// Run the sweep.
    ///
    /// Provisioning failures abort the run. `on_row` is called once per
    /// executed block size, in configuration order; an error from it aborts
    /// the run. Bench files are removed on return unless `keep_files` is
    /// set.
    pub fn run<R, F>(&self, rng: &mut R, mut on_row: F) -> Result<SweepReport>
    where
        R: Rng + ?Sized,
        F: FnMut(&SweepRow) -> Result<()>,
    {
        let mut files = BenchFiles::in_dir(&self.config.work_dir);
        if self.config.keep_files {
            files.keep_on_drop();
        }

        let file_size = self.config.file_size();
        provision_test_file(&self.disk_io, files.test_file(), file_size, &mut *rng)?;
        info!("Test file {} ready", files.test_file().display());

        let mut report = SweepReport::new(self.config.target_total_bytes, file_size);
        let phases = PhaseRunner::new(&self.disk_io, &self.clock);

        for (block_size, requests) in self.plan() {
            if requests == 0 {
                info!(
                    "Block size {} is larger than the {} test file, skipping",
                    block_size,
                    format_bytes(file_size)
                );
                report.skipped_block_sizes.push(block_size);
                continue;
            }

            info!(
                "Block size {}: {} requests per phase",
                format_bytes(block_size),
                requests
            );
            let result = phases.run(&files, block_size, requests, &mut *rng)?;
            let row = SweepRow::new(result);
            on_row(&row)?;
            report.rows.push(row);
        }

        Ok(report)
    }
}
