pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod output;
pub mod places;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::{ConfigOverrides, SweepConfig};
use error::{CliError, SweepError};
use grid::GridWalker;
use places::google::GooglePlacesClient;
use places::{AreaSearcher, PlacesSource};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "places-sweep",
    version,
    about = "Sweep a grid over a metro area and collect places of one type into a CSV file"
)]
pub struct Cli {
    /// Places API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// TOML settings file (defaults to the platform config dir, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Nearby Search endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Place type filter, e.g. pharmacy
    #[arg(long = "type")]
    pub place_type: Option<String>,

    /// Grid centre latitude
    #[arg(long, allow_hyphen_values = true)]
    pub center_lat: Option<f64>,

    /// Grid centre longitude
    #[arg(long, allow_hyphen_values = true)]
    pub center_lng: Option<f64>,

    /// Distance between neighbouring cell centres, in degrees
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Cells along each axis of the square grid
    #[arg(long)]
    pub cells_per_axis: Option<u32>,

    /// Search radius per cell, in metres
    #[arg(long)]
    pub radius: Option<u32>,

    /// Stop once this many distinct places are collected
    #[arg(long)]
    pub cap: Option<usize>,

    /// Wait before using a continuation token, in milliseconds
    #[arg(long)]
    pub token_delay_ms: Option<u64>,

    /// HTTP request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output CSV path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Only log warnings and errors, and hide the progress bar
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            place_type: self.place_type.clone(),
            center_lat: self.center_lat,
            center_lng: self.center_lng,
            cell_size_deg: self.cell_size,
            cells_per_axis: self.cells_per_axis,
            radius_m: self.radius,
            cap: self.cap,
            token_delay_ms: self.token_delay_ms,
            timeout_secs: self.timeout_secs,
            output: self.output.clone(),
        }
    }

    /// Cell progress on stderr; hidden under `--quiet` or when stderr is not a terminal.
    pub fn progress_bar(&self) -> ProgressBar {
        progress_bar(!self.quiet)
    }
}

pub fn run() -> Result<(), CliError> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> Result<(), CliError> {
    // Keep the guard alive so the file writer flushes on exit.
    let _guard = init_logging(cli.log_dir.as_deref(), cli.quiet)?;

    let mut cfg = SweepConfig::load(cli.config.as_deref())?;
    cfg.apply(cli.overrides());
    cfg.validate()?;

    let client = GooglePlacesClient::from_config(&cfg)?;
    info!(
        place_type = client.place_type(),
        center = %cfg.center,
        cells_per_axis = cfg.cells_per_axis,
        cap = cfg.cap,
        "starting sweep"
    );
    let saved = sweep_to_file(client, &cfg, cli.progress_bar())?;

    println!("Saved {saved} places to {}", cfg.output.display());
    Ok(())
}

/// Run the whole pipeline against `source` and write the CSV. Returns the row count.
///
/// Nothing is written if the sweep fails.
pub fn sweep_to_file<S: PlacesSource>(
    source: S,
    cfg: &SweepConfig,
    progress: ProgressBar,
) -> error::Result<usize> {
    let searcher = AreaSearcher::new(source, cfg.token_delay());
    let walker = GridWalker::new(searcher, cfg.radius_m).with_progress(progress);
    let places = walker.sweep(cfg.center, cfg.cell_size_deg, cfg.cells_per_axis, cfg.cap)?;

    output::write_places(&places, &cfg.output)?;
    info!(count = places.len(), path = %cfg.output.display(), "wrote places");
    Ok(places.len())
}

fn init_logging(log_dir: Option<&Path>, quiet: bool) -> Result<Option<WorkerGuard>, SweepError> {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| SweepError::io(dir, e))?;
            let file_appender = tracing_appender::rolling::daily(dir, "places-sweep.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .compact()
                .with_target(false)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // A subscriber may already be installed (tests call `run_with` more than once).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(guard)
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} cells  {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
