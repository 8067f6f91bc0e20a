#![allow(dead_code)]

use blocksweep::io::{DiskIO, FileHandle, PlatformClock, PlatformDiskIO};
use blocksweep::TEST_FILE;
use std::cell::{Cell, RefCell};
use std::io::{self, SeekFrom};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// Advances by one millisecond on every reading
#[derive(Default)]
pub struct StepClock {
    ticks: Cell<u64>,
}

impl PlatformClock for StepClock {
    fn now(&self) -> Duration {
        let t = self.ticks.get();
        self.ticks.set(t + 1);
        Duration::from_millis(t)
    }
}

/// Byte counts returned by every read, grouped per `open_read` call
pub type ReadLog = Rc<RefCell<Vec<Vec<usize>>>>;

/// Platform disk that records every read
#[derive(Default)]
pub struct RecordingDiskIO {
    pub reads: ReadLog,
}

struct RecordingHandle {
    inner: Box<dyn FileHandle>,
    reads: ReadLog,
    index: usize,
}

impl FileHandle for RecordingHandle {
    fn read_direct(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read_direct(buf)?;
        self.reads.borrow_mut()[self.index].push(n);
        Ok(n)
    }

    fn write_direct(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_direct(buf)
    }

    fn seek_direct(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek_direct(pos)
    }

    fn sync_all(&mut self) -> io::Result<()> {
        self.inner.sync_all()
    }
}

impl DiskIO for RecordingDiskIO {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        let inner = PlatformDiskIO.open_read(path)?;
        let index = {
            let mut log = self.reads.borrow_mut();
            log.push(Vec::new());
            log.len() - 1
        };
        Ok(Box::new(RecordingHandle {
            inner,
            reads: Rc::clone(&self.reads),
            index,
        }))
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        PlatformDiskIO.create_write(path)
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        PlatformDiskIO.open_write(path)
    }
}

/// Platform disk on which only the test file may be written
pub struct ReadOnlyScratch;

fn denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("{} is read-only", path.display()),
    )
}

fn is_test_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == TEST_FILE)
}

impl DiskIO for ReadOnlyScratch {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        PlatformDiskIO.open_read(path)
    }

    fn create_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        if is_test_file(path) {
            PlatformDiskIO.create_write(path)
        } else {
            Err(denied(path))
        }
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        Err(denied(path))
    }
}

/// Platform disk on which nothing can be created
pub struct FullDisk;

impl DiskIO for FullDisk {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        PlatformDiskIO.open_read(path)
    }

    fn create_write(&self, _path: &Path) -> io::Result<Box<dyn FileHandle>> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "no space left on device"))
    }

    fn open_write(&self, _path: &Path) -> io::Result<Box<dyn FileHandle>> {
        Err(io::Error::new(io::ErrorKind::StorageFull, "no space left on device"))
    }
}
