//! Phase runner
//!
//! Times the four phases for one block size. Each phase is best-effort: a
//! failure ends that phase, is logged and recorded, and the next phase
//! still runs.

use rand::Rng;
use tracing::{debug, warn};

use crate::bench::random::{random_read, random_write};
use crate::bench::sequential::{sequential_read, sequential_write};
use crate::error::is_fatal_in_phase;
use crate::io::{BenchFiles, DiskIO, PlatformClock};
use crate::models::{Phase, PhaseResult, PhaseTiming};
use crate::{Result, SweepError};

/// Runs the timed phases for one block size against a set of bench files
pub struct PhaseRunner<'a, D: ?Sized, C: ?Sized> {
    disk_io: &'a D,
    clock: &'a C,
}

impl<'a, D, C> PhaseRunner<'a, D, C>
where
    D: DiskIO + ?Sized,
    C: PlatformClock + ?Sized,
{
    pub fn new(disk_io: &'a D, clock: &'a C) -> Self {
        Self { disk_io, clock }
    }

    /// Run sequential read, random read, sequential write and random write,
    /// in that order, with `requests` operations of `block_size` bytes each.
    ///
    /// Only invalid parameters are returned as errors; I/O failures are
    /// recorded in the matching [`PhaseTiming`].
    pub fn run<R>(
        &self,
        files: &BenchFiles,
        block_size: u64,
        requests: u64,
        rng: &mut R,
    ) -> Result<PhaseResult>
    where
        R: Rng + ?Sized,
    {
        if block_size == 0 {
            return Err(SweepError::ConfigError(
                "block size must be greater than 0".to_string(),
            ));
        }
        if requests == 0 {
            return Err(SweepError::ConfigError(format!(
                "no requests to issue for block size {}",
                block_size
            )));
        }

        let disk_io = self.disk_io;
        let seq_read = self.timed(Phase::SequentialRead, block_size, |ops| {
            sequential_read(disk_io, files.test_file(), block_size, requests, ops)
        })?;
        let rand_read = self.timed(Phase::RandomRead, block_size, |ops| {
            random_read(disk_io, files.test_file(), block_size, requests, &mut *rng, ops)
        })?;
        let seq_write = self.timed(Phase::SequentialWrite, block_size, |ops| {
            sequential_write(disk_io, files.seq_write(), block_size, requests, ops)
        })?;
        let rand_write = self.timed(Phase::RandomWrite, block_size, |ops| {
            random_write(disk_io, files.rand_write(), block_size, requests, &mut *rng, ops)
        })?;

        Ok(PhaseResult {
            block_size,
            request_count: requests,
            seq_read,
            rand_read,
            seq_write,
            rand_write,
        })
    }

    /// Measure `body` from just before it opens its files to just after it
    /// has dropped them.
    fn timed<F>(&self, phase: Phase, block_size: u64, body: F) -> Result<PhaseTiming>
    where
        F: FnOnce(&mut u64) -> Result<()>,
    {
        let mut operations = 0u64;
        let start = self.clock.now();
        let outcome = body(&mut operations);
        let elapsed = self.clock.now().saturating_sub(start);

        match outcome {
            Ok(()) => {
                debug!(
                    "{} bs={}: {} ops in {:?}",
                    phase, block_size, operations, elapsed
                );
                Ok(PhaseTiming::completed(elapsed, operations))
            }
            Err(SweepError::AllocationError { bytes }) => {
                debug!("{} bs={}: skipped, no {} byte buffer", phase, block_size, bytes);
                Ok(PhaseTiming::completed(elapsed, operations))
            }
            Err(e) if is_fatal_in_phase(&e) => Err(e),
            Err(e) => {
                warn!(
                    "{} failed for block size {} after {} ops: {}",
                    phase, block_size, operations, e
                );
                Ok(PhaseTiming::failed(elapsed, operations, e.to_string()))
            }
        }
    }
}
