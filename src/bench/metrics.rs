//! Bandwidth arithmetic
//!
//! Pure functions turning a block size, a request count and an elapsed
//! time into MB/s.

/// Bytes per MB in every figure this crate reports
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Durations below this are clamped before dividing
pub const MIN_ELAPSED_SECS: f64 = 1e-9;

/// MiB moved by `request_count` operations of `block_size` bytes
pub fn total_data_mb(block_size: u64, request_count: u64) -> f64 {
    block_size as f64 * request_count as f64 / BYTES_PER_MB
}

/// Throughput in MB/s.
///
/// Always finite and non-negative: `seconds` is clamped up to
/// [`MIN_ELAPSED_SECS`], which also absorbs negative and NaN inputs.
pub fn bandwidth(seconds: f64, block_size: u64, request_count: u64) -> f64 {
    let seconds = if seconds >= MIN_ELAPSED_SECS {
        seconds
    } else {
        MIN_ELAPSED_SECS
    };
    total_data_mb(block_size, request_count) / seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_data_mb() {
        assert_eq!(total_data_mb(1024 * 1024, 2), 2.0);
        assert_eq!(total_data_mb(1, 0), 0.0);
        assert_eq!(total_data_mb(512, 2048), 1.0);
    }

    #[test]
    fn test_bandwidth_formula() {
        for &(seconds, bs, n) in &[
            (1.0, 1024 * 1024, 2),
            (0.25, 32768, 64),
            (3.5, 1, 10_000_000),
            (2e-6, 1024, 1),
        ] {
            let expected = (bs as f64 * n as f64 / 1048576.0) / seconds;
            assert!((bandwidth(seconds, bs, n) - expected).abs() <= expected * 1e-12);
        }
    }

    #[test]
    fn test_bandwidth_clamps_tiny_durations() {
        let expected = 1.0 / MIN_ELAPSED_SECS;
        assert_eq!(bandwidth(0.0, 1024 * 1024, 1), expected);
        assert_eq!(bandwidth(1e-12, 1024 * 1024, 1), expected);
        assert_eq!(bandwidth(-5.0, 1024 * 1024, 1), expected);
        assert_eq!(bandwidth(f64::NAN, 1024 * 1024, 1), expected);
    }

    #[test]
    fn test_bandwidth_finite_and_non_negative() {
        for seconds in [0.0, 1e-9, 1e-3, 1.0, 1e6] {
            for bs in [1u64, 1024, 32768, 1048576] {
                for n in [0u64, 1, 2, 10_000_000] {
                    let value = bandwidth(seconds, bs, n);
                    assert!(value.is_finite());
                    assert!(value >= 0.0);
                }
            }
        }
    }
}
