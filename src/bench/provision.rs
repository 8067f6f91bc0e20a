//! Test file provisioning
//!
//! Fills the backing file for the read phases with pseudo-random bytes,
//! one reused chunk at a time.

use std::io;
use std::path::Path;

use rand::RngCore;
use tracing::{debug, info};

use crate::io::{alloc_block, DiskIO};
use crate::util::units::format_bytes;
use crate::Result;

/// Size of the reused random buffer
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Create or truncate `path` and fill it with exactly `size` random bytes.
///
/// Every write's returned count is accumulated, so short writes are
/// completed by the next call. Returns the number of bytes written.
pub fn provision_test_file<D, R>(disk_io: &D, path: &Path, size: u64, rng: &mut R) -> Result<u64>
where
    D: DiskIO + ?Sized,
    R: RngCore + ?Sized,
{
    provision_with_chunk(disk_io, path, size, CHUNK_SIZE, rng)
}

/// [`provision_test_file`] with an explicit chunk size
pub fn provision_with_chunk<D, R>(
    disk_io: &D,
    path: &Path,
    size: u64,
    chunk_size: usize,
    rng: &mut R,
) -> Result<u64>
where
    D: DiskIO + ?Sized,
    R: RngCore + ?Sized,
{
    let mut chunk = alloc_block(chunk_size.max(1), 0)?;
    rng.fill_bytes(&mut chunk);

    info!("Creating test file {} ({})", path.display(), format_bytes(size));
    let mut file = disk_io.create_write(path)?;

    let mut written = 0u64;
    while written < size {
        let remaining = size - written;
        let to_write = remaining.min(chunk.len() as u64) as usize;
        let count = file.write_direct(&chunk[..to_write])?;
        if count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("write returned 0 bytes at offset {}", written),
            )
            .into());
        }
        written += count as u64;
    }

    file.sync_all()?;
    debug!("Test file synced: {} bytes", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{FileHandle, PlatformDiskIO};
    use crate::SweepError;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::io::SeekFrom;
    use tempfile::tempdir;

    /// Disk I/O whose writes transfer at most `max_write` bytes per call
    struct ShortWriteDiskIO {
        max_write: usize,
    }

    struct ShortWriteFile {
        inner: Box<dyn FileHandle>,
        max_write: usize,
    }

    impl FileHandle for ShortWriteFile {
        fn read_direct(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read_direct(buf)
        }

        fn write_direct(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let len = buf.len().min(self.max_write);
            self.inner.write_direct(&buf[..len])
        }

        fn seek_direct(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek_direct(pos)
        }

        fn sync_all(&mut self) -> std::io::Result<()> {
            self.inner.sync_all()
        }
    }

    impl DiskIO for ShortWriteDiskIO {
        fn open_read(&self, path: &Path) -> std::io::Result<Box<dyn FileHandle>> {
            PlatformDiskIO.open_read(path)
        }

        fn create_write(&self, path: &Path) -> std::io::Result<Box<dyn FileHandle>> {
            Ok(Box::new(ShortWriteFile {
                inner: PlatformDiskIO.create_write(path)?,
                max_write: self.max_write,
            }))
        }

        fn open_write(&self, path: &Path) -> std::io::Result<Box<dyn FileHandle>> {
            PlatformDiskIO.open_write(path)
        }
    }

    #[test]
    fn test_provisioned_size_matches_request() {
        let dir = tempdir().unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        for &(size, chunk) in &[
            (0u64, 1024usize),
            (1, 1024),
            (1024, 1024),
            (1025, 1024),
            (3 * 1024 * 1024 + 17, CHUNK_SIZE),
            (10_000, 333),
        ] {
            let path = dir.path().join(format!("t_{}_{}.bin", size, chunk));
            let written =
                provision_with_chunk(&PlatformDiskIO, &path, size, chunk, &mut rng).unwrap();
            assert_eq!(written, size);
            assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
        }
    }

    #[test]
    fn test_short_writes_are_accumulated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bin");
        let disk_io = ShortWriteDiskIO { max_write: 1000 };
        let mut rng = SmallRng::seed_from_u64(1);

        let written = provision_with_chunk(&disk_io, &path, 10_240, 4096, &mut rng).unwrap();
        assert_eq!(written, 10_240);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 10_240);
    }

    #[test]
    fn test_zero_length_writes_fail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stuck.bin");
        let disk_io = ShortWriteDiskIO { max_write: 0 };
        let mut rng = SmallRng::seed_from_u64(1);

        let result = provision_with_chunk(&disk_io, &path, 16, 16, &mut rng);
        match result {
            Err(SweepError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::WriteZero),
            other => panic!("expected WriteZero, got {:?}", other),
        }
    }

    #[test]
    fn test_content_is_seed_dependent() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        let c = dir.path().join("c.bin");

        provision_test_file(&PlatformDiskIO, &a, 4096, &mut SmallRng::seed_from_u64(42)).unwrap();
        provision_test_file(&PlatformDiskIO, &b, 4096, &mut SmallRng::seed_from_u64(42)).unwrap();
        provision_test_file(&PlatformDiskIO, &c, 4096, &mut SmallRng::seed_from_u64(43)).unwrap();

        let a = std::fs::read(a).unwrap();
        assert_eq!(a, std::fs::read(b).unwrap());
        assert_ne!(a, std::fs::read(c).unwrap());
    }

    #[test]
    fn test_uncreatable_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("testfile.bin");
        let result = provision_test_file(&PlatformDiskIO, &path, 16, &mut SmallRng::seed_from_u64(1));
        assert!(matches!(result, Err(SweepError::IoError(_))));
    }
}
