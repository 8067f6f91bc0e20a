//! CSV report writer
//!
//! Every row is flushed and synced to disk before the next block size
//! starts, so an interrupted sweep still leaves the finished rows behind.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::SweepRow;
use crate::{Result, SweepError};

pub const CSV_HEADER: &str = "BlockSize,SeqRead(s),RandRead(s),SeqWrite(s),RandWrite(s),\
SeqRead(MB/s),RandRead(MB/s),SeqWrite(MB/s),RandWrite(MB/s)";

/// Format one data row: seconds to 6 decimals, MB/s to 2
pub fn format_csv_row(row: &SweepRow) -> String {
    let p = &row.phases;
    let bw = &row.bandwidth;
    format!(
        "{},{:.6},{:.6},{:.6},{:.6},{:.2},{:.2},{:.2},{:.2}",
        p.block_size,
        p.seq_read_seconds(),
        p.rand_read_seconds(),
        p.seq_write_seconds(),
        p.rand_write_seconds(),
        bw.seq_read_mbps,
        bw.rand_read_mbps,
        bw.seq_write_mbps,
        bw.rand_write_mbps,
    )
}

/// An open CSV report
#[derive(Debug)]
pub struct CsvReport {
    path: PathBuf,
    writer: BufWriter<File>,
    rows: usize,
}

impl CsvReport {
    /// Create (or truncate) the report and write the header
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| {
            SweepError::PersistenceError(format!("cannot create {}: {}", path.display(), e))
        })?;
        let mut report = Self {
            path,
            writer: BufWriter::new(file),
            rows: 0,
        };
        report.write_line(CSV_HEADER)?;
        debug!("Writing results to {}", report.path.display());
        Ok(report)
    }

    /// Append a row and push it to stable storage
    pub fn append(&mut self, row: &SweepRow) -> Result<()> {
        self.write_line(&format_csv_row(row))?;
        self.rows += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .and_then(|_| self.writer.get_ref().sync_data())
            .map_err(|e| {
                SweepError::PersistenceError(format!(
                    "failed to write {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhaseResult, PhaseTiming};
    use std::time::Duration;
    use tempfile::tempdir;

    fn row(block_size: u64, request_count: u64) -> SweepRow {
        let t = |ms| PhaseTiming::completed(Duration::from_millis(ms), request_count);
        SweepRow::new(PhaseResult {
            block_size,
            request_count,
            seq_read: t(500),
            rand_read: t(1000),
            seq_write: t(250),
            rand_write: t(2000),
        })
    }

    #[test]
    fn test_row_format() {
        assert_eq!(
            format_csv_row(&row(1024 * 1024, 2)),
            "1048576,0.500000,1.000000,0.250000,2.000000,4.00,2.00,8.00,1.00"
        );
    }

    #[test]
    fn test_header_and_rows_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut report = CsvReport::create(&path).unwrap();

        // header is visible before any row is appended
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("{}\n", CSV_HEADER)
        );

        report.append(&row(1024, 4)).unwrap();
        report.append(&row(1024 * 1024, 2)).unwrap();
        assert_eq!(report.rows(), 2);

        let content = std::fs::read_to_string(report.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(',').count(), 9);
        assert!(lines[1].starts_with("1024,0.500000,"));
        assert!(lines[2].starts_with("1048576,"));
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let result = CsvReport::create(dir.path().join("missing").join("results.csv"));
        assert!(matches!(result, Err(SweepError::PersistenceError(_))));
    }
}
