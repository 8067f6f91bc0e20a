use blocksweep::config::{Preset, SweepSettings};
use blocksweep::error::user_friendly_message;
use blocksweep::report::CsvReport;
use blocksweep::simple::{ask_size_gb, run_sweep};
use blocksweep::system::SystemMemory;
use blocksweep::util::units::{format_bytes, format_throughput, parse_bytes};
use blocksweep::{bench::SweepRunner, Result};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "blocksweep")]
#[command(version, about = "Sequential and random read/write throughput across block sizes")]
struct Cli {
    /// Size to test in GB; the test file is twice this. 0 = system RAM
    #[arg(short = 's', long, env = "BLOCKSWEEP_SIZE_GB")]
    size_gb: Option<f64>,

    /// Benchmark preset
    #[arg(short, long, value_enum)]
    preset: Option<Preset>,

    /// Comma-separated block sizes, e.g. 1,4K,32KiB,1MiB
    #[arg(short, long, value_delimiter = ',', value_parser = parse_bytes)]
    block_sizes: Vec<u64>,

    /// Maximum operations per phase
    #[arg(long, conflicts_with = "no_cap")]
    request_cap: Option<u64>,

    /// Do not cap the number of operations per phase
    #[arg(long)]
    no_cap: bool,

    /// Fail instead of detecting RAM when the size is 0
    #[arg(long)]
    no_detect: bool,

    /// Test file size as a multiple of the requested size
    #[arg(long)]
    multiplier: Option<u64>,

    /// Directory for the test and scratch files
    #[arg(short, long, env = "BLOCKSWEEP_DIR")]
    dir: Option<PathBuf>,

    /// CSV output path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Seed for offsets and test data
    #[arg(long)]
    seed: Option<u64>,

    /// Keep the test and scratch files after the run
    #[arg(long)]
    keep_files: bool,

    /// Result output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Never prompt for the size
    #[arg(short = 'y', long)]
    no_prompt: bool,

    /// Settings file to load instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective settings to the default location
    #[arg(long)]
    save_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    /// Layer command-line overrides over the loaded settings
    fn apply(&self, settings: &mut SweepSettings) {
        if let Some(preset) = self.preset {
            settings.preset = preset;
        }
        if self.size_gb.is_some() {
            settings.size_gb = self.size_gb;
        }
        if !self.block_sizes.is_empty() {
            settings.block_sizes = self.block_sizes.clone();
        }
        if self.no_cap {
            settings.request_cap = Some(0);
        } else if self.request_cap.is_some() {
            settings.request_cap = self.request_cap;
        }
        if self.no_detect {
            settings.detect_ram = false;
        }
        if self.multiplier.is_some() {
            settings.size_multiplier = self.multiplier;
        }
        if self.dir.is_some() {
            settings.work_dir = self.dir.clone();
        }
        if let Some(csv) = &self.csv {
            settings.csv_path = csv.clone();
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.keep_files {
            settings.keep_files = true;
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version also arrive here, on stdout
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize logging; lines are printed above the progress bar
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .with(filter)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", user_friendly_message(&err));
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => SweepSettings::load_from(path)?,
        None => SweepSettings::load()?,
    };
    cli.apply(&mut settings);

    let needs_size = settings.preset == Preset::Full && settings.size_gb.is_none();
    if needs_size && !cli.no_prompt && std::io::stdin().is_terminal() {
        let stdin = std::io::stdin();
        settings.size_gb = Some(ask_size_gb(stdin.lock(), std::io::stdout())?);
    }

    if cli.save_config {
        let path = settings.save()?;
        info!("Saved settings to {}", path.display());
    }

    let config = settings.resolve(&SystemMemory)?;
    let mut csv = CsvReport::create(&settings.csv_path)?;
    let runner = SweepRunner::new(config)?;

    let mut rng = match runner.config().seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    info!(
        "Creating {} test file in {}",
        format_bytes(runner.config().file_size()),
        runner.config().work_dir.display()
    );
    let started = Instant::now();
    let report = run_sweep(&runner, &mut rng, &mut csv, cli.format == OutputFormat::Json)?;

    if cli.format == OutputFormat::Json {
        println!("{}", report.to_json_pretty()?);
    }

    let failed = report.failed_phase_count();
    if failed > 0 {
        warn!("{} phase(s) failed; their timings are partial", failed);
    }
    if let Some(best) = report
        .rows
        .iter()
        .map(|row| row.bandwidth.seq_read_mbps)
        .reduce(f64::max)
    {
        info!("Peak sequential read {}", format_throughput(best));
    }

    let total = Duration::from_secs(started.elapsed().as_secs());
    info!(
        "Finished {} block sizes in {}. Results in {}",
        report.rows.len(),
        humantime::format_duration(total),
        csv.path().display()
    );
    Ok(())
}
