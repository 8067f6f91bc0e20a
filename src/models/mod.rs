//! Data models module
//!
//! Phase timings, bandwidth figures and sweep reports.

pub mod result;

pub use result::{BandwidthResult, Phase, PhaseResult, PhaseTiming, SweepReport, SweepRow};
