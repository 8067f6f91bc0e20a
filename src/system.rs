//! System memory detection
//!
//! The default test size is derived from physical RAM so the test file
//! cannot be served entirely from the page cache.

use tracing::debug;

use crate::{Result, SweepError};

/// Source of the machine's physical memory size
pub trait MemoryProbe {
    /// Total physical memory in bytes
    fn total_memory(&self) -> Result<u64>;
}

/// Queries the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemory;

impl MemoryProbe for SystemMemory {
    fn total_memory(&self) -> Result<u64> {
        let total = detect_total_ram()?;
        if total == 0 {
            return Err(SweepError::DetectionError(
                "operating system reported 0 bytes of RAM".to_string(),
            ));
        }
        debug!("Detected {} bytes of physical memory", total);
        Ok(total)
    }
}

/// A fixed memory size, for callers that already know it
#[derive(Debug, Clone, Copy)]
pub struct FixedMemory(pub u64);

impl MemoryProbe for FixedMemory {
    fn total_memory(&self) -> Result<u64> {
        if self.0 == 0 {
            return Err(SweepError::DetectionError("memory size is 0".to_string()));
        }
        Ok(self.0)
    }
}

#[cfg(unix)]
fn detect_total_ram() -> Result<u64> {
    // SAFETY: sysconf has no preconditions and only reads system values.
    let (pages, page_size) = unsafe {
        (
            libc::sysconf(libc::_SC_PHYS_PAGES),
            libc::sysconf(libc::_SC_PAGE_SIZE),
        )
    };
    if pages <= 0 || page_size <= 0 {
        return Err(SweepError::DetectionError(format!(
            "sysconf returned pages={} page_size={}",
            pages, page_size
        )));
    }
    (pages as u64)
        .checked_mul(page_size as u64)
        .ok_or_else(|| SweepError::DetectionError("physical memory size overflows".to_string()))
}

#[cfg(windows)]
fn detect_total_ram() -> Result<u64> {
    #[repr(C)]
    struct MemoryStatusEx {
        length: u32,
        memory_load: u32,
        total_phys: u64,
        avail_phys: u64,
        total_page_file: u64,
        avail_page_file: u64,
        total_virtual: u64,
        avail_virtual: u64,
        avail_extended_virtual: u64,
    }

    extern "system" {
        fn GlobalMemoryStatusEx(buffer: *mut MemoryStatusEx) -> i32;
    }

    let mut status = MemoryStatusEx {
        length: std::mem::size_of::<MemoryStatusEx>() as u32,
        memory_load: 0,
        total_phys: 0,
        avail_phys: 0,
        total_page_file: 0,
        avail_page_file: 0,
        total_virtual: 0,
        avail_virtual: 0,
        avail_extended_virtual: 0,
    };
    // SAFETY: status is a properly sized MEMORYSTATUSEX with length set.
    let ok = unsafe { GlobalMemoryStatusEx(&mut status) };
    if ok == 0 {
        return Err(SweepError::DetectionError(format!(
            "GlobalMemoryStatusEx failed: {}",
            std::io::Error::last_os_error()
        )));
    }
    Ok(status.total_phys)
}

#[cfg(not(any(unix, windows)))]
fn detect_total_ram() -> Result<u64> {
    Err(SweepError::DetectionError(
        "memory detection is not supported on this platform".to_string(),
    ))
}
