//! Random read and write phases
//!
//! Offsets are drawn from the caller's generator so a fixed seed replays
//! the same access pattern.

use std::io::SeekFrom;
use std::path::Path;

use rand::Rng;

use crate::io::{alloc_block, block_len, DiskIO};
use crate::{Result, SweepError};

/// Fill byte for random writes
pub const RAND_WRITE_BYTE: u8 = b'Y';

/// Pick a block start inside a region of `region_len` bytes.
///
/// There are `region_len - block_size + 1` valid start positions; when the
/// block does not fit the range is clamped to one and the offset is 0.
pub fn random_offset<R>(rng: &mut R, region_len: u64, block_size: u64) -> u64
where
    R: Rng + ?Sized,
{
    let range = region_len
        .checked_sub(block_size)
        .map_or(1, |span| span.saturating_add(1));
    let fraction: f64 = rng.gen();
    // f64 rounding can land on `range` for very large regions
    ((fraction * range as f64) as u64).min(range - 1)
}

/// Issue `requests` reads of `block_size` bytes at random offsets of `path`.
///
/// Files shorter than one block are skipped entirely. Short reads are not
/// treated as end of file here, unlike [`super::sequential::sequential_read`].
pub fn random_read<D, R>(
    disk_io: &D,
    path: &Path,
    block_size: u64,
    requests: u64,
    rng: &mut R,
    operations: &mut u64,
) -> Result<()>
where
    D: DiskIO + ?Sized,
    R: Rng + ?Sized,
{
    let mut file = disk_io.open_read(path)?;
    let file_len = file.seek_direct(SeekFrom::End(0))?;
    file.seek_direct(SeekFrom::Start(0))?;

    if file_len < block_size {
        return Ok(());
    }

    let mut buffer = alloc_block(block_len(block_size)?, 0)?;
    for _ in 0..requests {
        let offset = random_offset(rng, file_len, block_size);
        file.seek_direct(SeekFrom::Start(offset))?;
        file.read_direct(&mut buffer)?;
        *operations += 1;
    }
    Ok(())
}

/// Sparse-extend `path` to `block_size * requests` bytes, then overwrite
/// `requests` random blocks of it with [`RAND_WRITE_BYTE`].
pub fn random_write<D, R>(
    disk_io: &D,
    path: &Path,
    block_size: u64,
    requests: u64,
    rng: &mut R,
    operations: &mut u64,
) -> Result<()>
where
    D: DiskIO + ?Sized,
    R: Rng + ?Sized,
{
    let region_len = block_size.checked_mul(requests).ok_or_else(|| {
        SweepError::ConfigError(format!(
            "random write region {} x {} overflows",
            block_size, requests
        ))
    })?;

    sparse_extend(disk_io, path, region_len)?;

    let mut file = disk_io.open_write(path)?;
    let buffer = alloc_block(block_len(block_size)?, RAND_WRITE_BYTE)?;
    for _ in 0..requests {
        let offset = random_offset(rng, region_len, block_size);
        file.seek_direct(SeekFrom::Start(offset))?;
        file.write_direct(&buffer)?;
        *operations += 1;
    }
    Ok(())
}

/// Create `path` with length `size` by writing one byte at `size - 1`
pub fn sparse_extend<D>(disk_io: &D, path: &Path, size: u64) -> Result<()>
where
    D: DiskIO + ?Sized,
{
    let mut file = disk_io.create_write(path)?;
    if size > 0 {
        file.seek_direct(SeekFrom::Start(size - 1))?;
        file.write_direct(&[0])?;
    }
    Ok(())
}
