//! Sequential read and write phases
//!
//! Both phases rely on the file cursor advancing naturally; no seeks are
//! issued between operations.

use std::path::Path;

use crate::io::{alloc_block, block_len, DiskIO};
use crate::Result;

/// Fill byte for sequential writes
pub const SEQ_WRITE_BYTE: u8 = b'X';

/// Read up to `requests` blocks of `block_size` bytes from the start of
/// `path`.
///
/// A read returning fewer than `block_size` bytes means the file is
/// exhausted and ends the loop without error. `operations` counts full
/// blocks read.
pub fn sequential_read<D>(
    disk_io: &D,
    path: &Path,
    block_size: u64,
    requests: u64,
    operations: &mut u64,
) -> Result<()>
where
    D: DiskIO + ?Sized,
{
    let mut file = disk_io.open_read(path)?;
    let mut buffer = alloc_block(block_len(block_size)?, 0)?;

    for _ in 0..requests {
        let count = file.read_direct(&mut buffer)?;
        if count < buffer.len() {
            break;
        }
        *operations += 1;
    }
    Ok(())
}

/// Append `requests` blocks of [`SEQ_WRITE_BYTE`] to a freshly truncated
/// `path`.
///
/// Short write counts are not checked; only hard errors stop the loop.
pub fn sequential_write<D>(
    disk_io: &D,
    path: &Path,
    block_size: u64,
    requests: u64,
    operations: &mut u64,
) -> Result<()>
where
    D: DiskIO + ?Sized,
{
    let mut file = disk_io.create_write(path)?;
    let buffer = alloc_block(block_len(block_size)?, SEQ_WRITE_BYTE)?;

    for _ in 0..requests {
        file.write_direct(&buffer)?;
        *operations += 1;
    }
    Ok(())
}
