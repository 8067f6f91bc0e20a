//! Console results table

use crate::models::SweepRow;

const WIDTH: usize = 84;

/// Horizontal rule above and below the header
pub fn divider() -> String {
    "=".repeat(WIDTH)
}

/// Column titles, aligned with [`format_row`]
pub fn header() -> String {
    format!(
        "{:>9} | {:>10} | {:>11} | {:>11} | {:>12} |  {}",
        "BlockSize", "SeqRead(s)", "RandRead(s)", "SeqWrite(s)", "RandWrite(s)", "[MB/s]"
    )
}

/// Divider, header, divider
pub fn banner() -> String {
    format!("{}\n{}\n{}", divider(), header(), divider())
}

pub fn format_row(row: &SweepRow) -> String {
    let p = &row.phases;
    let bw = &row.bandwidth;
    let mut line = format!(
        "{:>9} | {:>10.3} | {:>11.3} | {:>11.3} | {:>12.3} |  [{:.2} / {:.2} / {:.2} / {:.2}]",
        p.block_size,
        p.seq_read_seconds(),
        p.rand_read_seconds(),
        p.seq_write_seconds(),
        p.rand_write_seconds(),
        bw.seq_read_mbps,
        bw.rand_read_mbps,
        bw.seq_write_mbps,
        bw.rand_write_mbps,
    );
    let failed = p.failed_phases();
    if !failed.is_empty() {
        let names: Vec<String> = failed.iter().map(|phase| phase.to_string()).collect();
        line.push_str(&format!("  (failed: {})", names.join(", ")));
    }
    line
}
