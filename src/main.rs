//! Motor Control CLI
//!
//! Developer tooling for motor-function assessment results.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use motor_control::{
    config::Config,
    hand::{HandOrderCoordinator, HandSelection, JsonFilePreferenceStore},
    validation::{spawn_validation, SessionValidator, TaskIdentifier},
    Hand, HandOrder, TaskResult, VERSION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "motor-control")]
#[command(version = VERSION)]
#[command(about = "Timing, hand-order coordination and validation for motor assessments", long_about = None)]
struct Cli {
    /// Use this configuration file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the motion recordings of a finished task result
    Validate {
        /// Task result JSON file
        file: PathBuf,

        /// Validate as this task instead of the result's own identifier
        #[arg(long)]
        task: Option<String>,
    },

    /// Resolve and persist the hand order for a task
    HandOrder {
        /// Task identifier the preference is stored under
        #[arg(long)]
        root: String,

        /// Hand selection (left, right or both); defaults to the last one used
        #[arg(long)]
        selection: Option<HandSelection>,

        /// Seed for the coin flip, for reproducible orders
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List known tasks and the segments they record
    Tasks,

    /// Show configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Could not load configuration")?;

    match cli.command {
        Commands::Validate { file, task } => cmd_validate(&config, &file, task.as_deref()),
        Commands::HandOrder {
            root,
            selection,
            seed,
        } => cmd_hand_order(&config, &root, selection, seed),
        Commands::Tasks => {
            cmd_tasks();
            Ok(())
        }
        Commands::Config => cmd_config(&config, cli.config),
    }
}

fn cmd_validate(config: &Config, file: &Path, task: Option<&str>) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let task_result: TaskResult = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a task result", file.display()))?;

    let task = match task {
        Some(id) => match id.parse::<TaskIdentifier>() {
            Ok(task) => Some(task),
            Err(diagnostic) => bail!("{diagnostic}"),
        },
        None => None,
    };

    let validator = Arc::new(SessionValidator::new().with_bounds(config.motion_bounds));
    let report = spawn_validation(task_result, validator, task)
        .recv()
        .context("Validation worker stopped without a report")?;

    println!("Task: {}", report.task_identifier);
    println!(
        "Bounds: {}s - {}s",
        config.motion_bounds.min_secs, config.motion_bounds.max_secs
    );
    println!();
    for measurement in &report.measurements {
        println!("  {:<16} {:>8.3}s", measurement.segment, measurement.delta);
    }

    if report.is_clean() {
        println!();
        println!("All {} segments within bounds.", report.segments.len());
        return Ok(());
    }

    println!();
    println!("Findings:");
    for diagnostic in &report.diagnostics {
        println!("  - {diagnostic}");
    }
    std::process::exit(1);
}

fn cmd_hand_order(
    config: &Config,
    root: &str,
    selection: Option<HandSelection>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    config
        .ensure_directories()
        .context("Could not create data directory")?;

    let store = JsonFilePreferenceStore::open(config.preferences_path());
    let mut coordinator = HandOrderCoordinator::new(store);
    let selection = selection.unwrap_or_else(|| coordinator.initial_selection(root));

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let order = coordinator.resolve_order(root, selection, &mut rng);
    coordinator
        .persist_preference(root, selection)
        .context("Could not save hand preference")?;

    println!("Task:      {root}");
    println!("Selection: {selection}");
    println!("Order:     {}", order.identifiers().join(" -> "));
    Ok(())
}

fn cmd_tasks() {
    let example_order = HandOrder::both(Hand::Left);

    println!("Known tasks");
    println!("===========");
    println!();
    for task in TaskIdentifier::ALL {
        let segments = task.segments_for(&example_order).join(", ");
        if task.is_two_hand() {
            println!("  {:<22} {} (left first)", task.as_str(), segments);
        } else {
            println!("  {:<22} {}", task.as_str(), segments);
        }
    }
}

fn cmd_config(config: &Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!(
        "Config file: {:?}",
        path.unwrap_or_else(Config::config_path)
    );
    println!("Preferences: {:?}", config.preferences_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).context("Could not serialize configuration")?
    );
    Ok(())
}
