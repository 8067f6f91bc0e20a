//! Result reporting
//!
//! CSV persistence and the console table. Both consume finished
//! [`SweepRow`](crate::models::SweepRow)s one at a time.

pub mod csv;
pub mod table;

pub use self::csv::CsvReport;
