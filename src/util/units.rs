//! Size and rate formatting, block-size parsing
//!
//! All user-facing "MB" and "GB" figures in this crate are binary
//! (1 MB = 1,048,576 bytes), matching the CSV bandwidth columns. Decimal
//! units are only accepted on input, spelled `kB`/`MB`/`GB`/`TB` after a
//! number, for compatibility with drive vendor sizes.

/// Bytes in one GiB; gigabyte inputs are interpreted as binary units
pub const GIB: f64 = (1u64 << 30) as f64;

const BINARY_SUFFIXES: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Render a byte count with the largest binary unit that keeps it >= 1
///
/// ```
/// use blocksweep::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1), "1 B");
/// assert_eq!(format_bytes(32 * 1024), "32.0 KiB");
/// assert_eq!(format_bytes(3 << 29), "1.5 GiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    // each step of 10 bits is one unit
    let step = if bytes == 0 {
        0
    } else {
        (bytes.ilog2() / 10) as usize
    };
    let step = step.min(BINARY_SUFFIXES.len() - 1);
    if step == 0 {
        return format!("{} B", bytes);
    }
    let scaled = bytes as f64 / (1u64 << (10 * step)) as f64;
    format!("{:.1} {}", scaled, BINARY_SUFFIXES[step])
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kib" => 1 << 10,
        "m" | "mib" => 1 << 20,
        "g" | "gib" => 1 << 30,
        "t" | "tib" => 1 << 40,
        "kb" => 1_000,
        "mb" => 1_000_000,
        "gb" => 1_000_000_000,
        "tb" => 1_000_000_000_000,
        _ => return None,
    };
    Some(multiplier)
}

/// Parse a byte count such as `512`, `4K`, `32KiB` or `1 MiB`.
///
/// Single-letter and `*iB` suffixes are binary; `kB`/`MB`/`GB`/`TB` are
/// decimal. The result must be a whole number of bytes.
///
/// ```
/// use blocksweep::util::units::parse_bytes;
///
/// assert_eq!(parse_bytes("4K").unwrap(), 4096);
/// assert_eq!(parse_bytes("1 MiB").unwrap(), 1_048_576);
/// assert_eq!(parse_bytes("1.5kB").unwrap(), 1500);
/// ```
pub fn parse_bytes(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let unit_start = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(unit_start);
    let number = number.trim();

    let multiplier =
        unit_multiplier(unit.trim()).ok_or_else(|| format!("unknown size unit {:?}", unit))?;

    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| format!("size {:?} is too large", input));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid size {:?}", input))?;
    let bytes = value * multiplier as f64;
    if !bytes.is_finite() || bytes < 0.0 || bytes >= u64::MAX as f64 {
        return Err(format!("size {:?} is out of range", input));
    }
    if bytes.fract() != 0.0 {
        return Err(format!("size {:?} is not a whole number of bytes", input));
    }
    Ok(bytes as u64)
}

/// Convert a gigabyte count to bytes; truncates fractional bytes
pub fn gigabytes_to_bytes(gb: f64) -> u64 {
    (gb * GIB) as u64
}

/// Render a MB/s figure, switching to GB/s from 1024 MB/s
///
/// ```
/// use blocksweep::util::units::format_throughput;
///
/// assert_eq!(format_throughput(812.345), "812.35 MB/s");
/// assert_eq!(format_throughput(3072.0), "3.00 GB/s");
/// ```
pub fn format_throughput(mbps: f64) -> String {
    if mbps >= 1024.0 {
        format!("{:.2} GB/s", mbps / 1024.0)
    } else {
        format!("{:.2} MB/s", mbps)
    }
}
