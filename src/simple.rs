//! Plain terminal front-end: size prompt, progress bar and row printing.

use indicatif::ProgressStyle;
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::{info_span, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_indicatif::suspend_tracing_indicatif;

use crate::bench::SweepRunner;
use crate::io::{DiskIO, PlatformClock};
use crate::models::SweepReport;
use crate::report::{table, CsvReport};
use crate::{Result, SweepError};

/// Ask how many GB to test; `0` means "use the system RAM size".
pub fn ask_size_gb<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<f64> {
    write!(
        output,
        "How many GB of RAM should be tested (0 = use system RAM): "
    )?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SweepError::ConfigError("no size entered".to_string()));
    }
    let gb: f64 = line
        .trim()
        .parse()
        .map_err(|_| SweepError::ConfigError(format!("invalid input: {:?}", line.trim())))?;
    if !gb.is_finite() || gb < 0.0 {
        return Err(SweepError::ConfigError(format!("invalid GB value: {}", gb)));
    }
    Ok(gb)
}

/// Bar style for the sweep span
pub fn sweep_style() -> ProgressStyle {
    const TEMPLATE: &str = "{spinner} [{elapsed_precise}] {wide_bar} {pos}/{len} block sizes";
    ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Run the sweep, appending every row to `csv` and printing it as a table
/// line.
///
/// Progress is attached to a `sweep` span, so it is drawn by the
/// `tracing_indicatif` layer installed in `main` and log lines are printed
/// above it. Without that layer the span carries no bar.
pub fn run_sweep<D, C, R>(
    runner: &SweepRunner<D, C>,
    rng: &mut R,
    csv: &mut CsvReport,
    quiet: bool,
) -> Result<SweepReport>
where
    D: DiskIO,
    C: PlatformClock,
    R: Rng + ?Sized,
{
    let span = if quiet {
        Span::none()
    } else {
        let runnable = runner.plan().iter().filter(|(_, n)| *n > 0).count() as u64;
        let span = info_span!("sweep");
        span.pb_set_style(&sweep_style());
        span.pb_set_length(runnable);
        span
    };
    let _entered = span.enter();

    let mut header_printed = false;
    runner.run(rng, |row| {
        csv.append(row)?;
        if !quiet {
            let line = table::format_row(row);
            let banner = (!header_printed).then(table::banner);
            header_printed = true;
            suspend_tracing_indicatif(|| {
                if let Some(banner) = &banner {
                    println!("{}", banner);
                }
                println!("{}", line);
            });
        }
        span.pb_inc(1);
        Ok(())
    })
}
