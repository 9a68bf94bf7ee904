// src/cli.rs
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::LevelFilter;

use crate::config::TournamentConfig;
use crate::config::consts::{DEFAULT_DATA_FILE, DEFAULT_LOG_FILE};
use crate::core::{Fetcher, HttpFetcher};
use crate::fallback::FallbackClient;
use crate::logging;
use crate::progress::{ConsoleProgress, Progress};
use crate::runner::{RunReport, Runner, StandingsSource};
use crate::store;

/// Refresh a medal tracker file from public pages.
#[derive(Debug, Parser)]
#[command(name = "medal_watch", version, about)]
pub struct Args {
    /// Tracker JSON file to update in place
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data: PathBuf,

    /// Tournament configuration (TOML); built-in defaults otherwise
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log: PathBuf,

    /// Run everything but do not write the data file
    #[arg(long)]
    pub dry_run: bool,

    /// Per-page progress lines
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    logging::init(&args.log, level);

    let cfg = match &args.config {
        Some(path) => TournamentConfig::load(path).wrap_err("loading configuration")?,
        None => TournamentConfig::default(),
    };
    let mut data = store::load(&args.data).wrap_err("loading tracker data")?;

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
    let fallback = FallbackClient::from_env(&cfg)?;
    let runner = Runner::new(&cfg, fetcher).with_fallback(fallback);

    let mut progress = ConsoleProgress::new(args.verbose);
    let report = runner.run(&mut data, Utc::now(), Some(&mut progress));

    if args.dry_run {
        progress.log("Dry run: data file not written");
    } else {
        store::save(&args.data, &data).wrap_err("saving tracker data")?;
        progress.log(&format!("Saved {}", args.data.display()));
    }
    summarize(&report, &cfg, &mut progress);
    Ok(())
}

fn summarize(report: &RunReport, cfg: &TournamentConfig, progress: &mut dyn Progress) {
    let standings = match report.standings {
        Some(StandingsSource::Page) => format!("{} countries from medal table page", report.countries),
        Some(StandingsSource::Fallback) => format!("{} countries from fallback", report.countries),
        None => s!("unchanged"),
    };
    progress.log(&format!("Standings: {standings}"));
    if let Some(n) = report.events_completed {
        progress.log(&format!("Events completed: {n}/{}", cfg.events_total));
    }
    if report.times_changed > 0 {
        progress.log(&format!("Schedule times corrected: {}", report.times_changed));
    }
    if !report.marked_done.is_empty() {
        progress.log(&format!("Marked done: {}", report.marked_done.join(", ")));
    }
    if report.results.is_empty() {
        progress.log("No new results");
    } else {
        progress.log(&format!("New results: {}", report.results.join(", ")));
    }
    if let Some(p) = report.projection {
        progress.log(&format!(
            "{} projection: gold {}-{}-{}, total {}-{}-{}",
            cfg.tracked.code, p.gold.low, p.gold.mid, p.gold.high, p.total.low, p.total.mid, p.total.high,
        ));
    }
}
