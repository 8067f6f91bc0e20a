//! I/O operations module
//!
//! File handle and clock capabilities the benchmark runs on, plus the
//! fallible buffer allocation used by every phase.

pub mod buffer;
pub mod clock;
pub mod disk;

pub use buffer::{alloc_block, block_len};
pub use clock::{MonotonicClock, PlatformClock};
pub use disk::{BenchFiles, DiskIO, FileHandle, PlatformDiskIO, PlatformFile};
