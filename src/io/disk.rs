use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{RAND_WRITE_FILE, SEQ_WRITE_FILE, TEST_FILE};

/// File opening capability used by the provisioner and the phase runner
pub trait DiskIO {
    /// Open an existing file read-only
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn FileHandle>>;

    /// Create (or truncate) a file for writing
    fn create_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>>;

    /// Open an existing file write-only without truncating it
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>>;
}

/// Unbuffered file operations; every call is one system call.
///
/// Offsets are 64-bit on every platform. The handle is closed on drop.
pub trait FileHandle {
    /// Read into `buf`, returning the number of bytes transferred
    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write from `buf`, returning the number of bytes transferred
    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Move the cursor, returning the new absolute position
    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Force file content to storage
    fn sync_all(&mut self) -> io::Result<()>;
}

/// `std::fs::File` backed handle
pub struct PlatformFile {
    file: File,
}

impl PlatformFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

impl FileHandle for PlatformFile {
    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// Platform-specific disk I/O implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformDiskIO;

impl PlatformDiskIO {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
mod platform {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;

    /// Owner read/write, matching S_IRUSR | S_IWUSR
    pub fn creation_options() -> OpenOptions {
        let mut options = OpenOptions::new();
        options.mode(0o600);
        options
    }
}

#[cfg(not(unix))]
mod platform {
    use std::fs::OpenOptions;

    pub fn creation_options() -> OpenOptions {
        OpenOptions::new()
    }
}

impl DiskIO for PlatformDiskIO {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(Box::new(PlatformFile::new(file)))
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        let file = platform::creation_options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Box::new(PlatformFile::new(file)))
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        let file = OpenOptions::new().write(true).open(path)?;
        Ok(Box::new(PlatformFile::new(file)))
    }
}

/// The test file and the two scratch files of one run, removed on drop
#[derive(Debug)]
pub struct BenchFiles {
    test_file: PathBuf,
    seq_write: PathBuf,
    rand_write: PathBuf,
    cleanup_on_drop: bool,
}

impl BenchFiles {
    /// Lay out the fixed file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            test_file: dir.join(TEST_FILE),
            seq_write: dir.join(SEQ_WRITE_FILE),
            rand_write: dir.join(RAND_WRITE_FILE),
            cleanup_on_drop: true,
        }
    }

    /// Disable automatic cleanup (for inspecting the files afterwards)
    pub fn keep_on_drop(&mut self) {
        self.cleanup_on_drop = false;
    }

    pub fn test_file(&self) -> &Path {
        &self.test_file
    }

    pub fn seq_write(&self) -> &Path {
        &self.seq_write
    }

    pub fn rand_write(&self) -> &Path {
        &self.rand_write
    }

    /// Remove every file that exists; missing files are not an error
    pub fn remove_all(&self) {
        for path in [&self.seq_write, &self.rand_write, &self.test_file] {
            match std::fs::remove_file(path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {}", path.display(), e),
            }
        }
    }
}

impl Drop for BenchFiles {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            self.remove_all();
        }
    }
}
