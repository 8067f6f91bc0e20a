//! Utility functions module
//!
//! Size formatting and parsing helpers.

pub mod units;

pub use units::{format_bytes, format_throughput, gigabytes_to_bytes, parse_bytes};
