//! Benchmark engine module
//!
//! Test file provisioning, the four timed phases, bandwidth arithmetic and
//! the sweep that ties them together.

pub mod metrics;
pub mod provision;
pub mod random;
pub mod runner;
pub mod sequential;
pub mod sweep;

// Re-export commonly used types
pub use provision::{provision_test_file, CHUNK_SIZE};
pub use random::random_offset;
pub use runner::PhaseRunner;
pub use sweep::{request_count, SweepRunner};
