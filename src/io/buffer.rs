use crate::{Result, SweepError};

/// Reserve a buffer of exactly `len` bytes filled with `fill`.
///
/// Uses a fallible reservation so an oversized block size surfaces as
/// [`SweepError::AllocationError`] instead of aborting the process.
pub fn alloc_block(len: usize, fill: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| SweepError::AllocationError { bytes: len })?;
    buffer.resize(len, fill);
    Ok(buffer)
}

/// Convert a block size to an in-memory length
pub fn block_len(block_size: u64) -> Result<usize> {
    usize::try_from(block_size).map_err(|_| SweepError::AllocationError { bytes: usize::MAX })
}
