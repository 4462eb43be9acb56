//! Trade Reroll Simulator
//!
//! Runs the reroll engine against a seeded sandbox world and prints the run
//! outcome as JSON.

use clap::Parser;
use std::cell::RefCell;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use reroll_core::config::default_config_toml;
use reroll_core::{RerollConfig, Services};
use reroll_sim::{
    logging, simulate, ConsoleNotifier, ScenarioOptions, SimulationSettings, StatisticsTracker,
};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "reroll_sim")]
#[command(about = "Simulates automated trade rerolling in a sandbox world")]
struct Args {
    /// Random seed for the offer roller
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Milliseconds per tick
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Statistics file (JSON), created if missing
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Spare lecterns in the inventory
    #[arg(long, default_value_t = 0)]
    spares: u32,

    /// Start without a placed lectern
    #[arg(long)]
    no_initial_site: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return;
    }

    logging::init();

    let config = match &args.config {
        Some(path) => RerollConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: could not load {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => RerollConfig::default(),
    };

    let tracker = match &args.stats {
        Some(path) => StatisticsTracker::load(path).unwrap_or_else(|e| {
            eprintln!("Warning: could not load statistics, starting fresh: {}", e);
            StatisticsTracker::in_memory()
        }),
        None => StatisticsTracker::in_memory(),
    };
    let tracker = Rc::new(RefCell::new(tracker));

    let notifier = ConsoleNotifier::new(config.general.notification_style);
    let services = Services::new(config, notifier, tracker.clone());

    let settings = SimulationSettings {
        scenario: ScenarioOptions {
            seed: args.seed,
            spares: args.spares,
            initial_site: !args.no_initial_site,
        },
        max_ticks: args.ticks,
        tick_ms: args.tick_ms,
    };

    let report = match simulate(&settings, services) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&report.outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Warning: could not serialize outcome: {}", e),
    }

    let tracker = tracker.borrow();
    let all_time = tracker.all_time();
    tracing::info!(
        "Simulated {} ticks: {} breaks, {} placements, {} interactions",
        report.ticks,
        report.break_starts,
        report.placements,
        report.interactions
    );
    tracing::info!(
        "All time: {} runs, {} successes, average {:.1} attempts to success",
        all_time.runs,
        all_time.successes,
        all_time.average_attempts()
    );
}
