// WALL-E controller command line host
// Runs the behavior state machine against recorded frames and inspects images

mod host;
mod inspect;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use host::ReplayHost;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walle_brain::{BehaviorStateMachine, Driver};
use walle_core::WalleConfig;
use walle_eye::{Frame, ObjectClass};

#[derive(Parser)]
#[command(name = "walle")]
#[command(about = "WALL-E patrol robot controller", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML or JSON)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long, global = true)]
    ticks: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the controller from recorded camera frames
    Run {
        /// Top camera frames, replayed in order and looped
        #[arg(long, required = true, num_args = 1..)]
        top: Vec<PathBuf>,

        /// Small camera frames, replayed in order and looped
        #[arg(long, required = true, num_args = 1..)]
        small: Vec<PathBuf>,

        /// Battery fraction reported by the host
        #[arg(long, default_value = "0.8")]
        battery: String,

        /// Print the final statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify an image and print per-class detections
    Inspect {
        /// Image file to classify
        image: PathBuf,

        /// Class whose matching colors are listed
        #[arg(long, default_value = "trash", value_parser = inspect::parse_class)]
        class: ObjectClass,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn load_config(cli: &Cli) -> Result<WalleConfig> {
    let mut config = match &cli.config {
        Some(path) => WalleConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => WalleConfig::default(),
    }
    .with_env_overrides();

    if let Some(ticks) = cli.ticks {
        config.max_ticks = Some(ticks);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.log_level);

    match cli.command {
        Commands::Run {
            top,
            small,
            battery,
            json,
        } => run(&config, &top, &small, &battery, json).await,
        Commands::Inspect { image, class, json } => inspect_image(&image, class, json),
    }
}

async fn run(
    config: &WalleConfig,
    top: &[PathBuf],
    small: &[PathBuf],
    battery: &str,
    json: bool,
) -> Result<()> {
    let (host, devices) = ReplayHost::build(config, top, small, battery)?;
    let machine = BehaviorStateMachine::new(config, devices);
    let mut driver = Driver::new(config, machine);

    if config.max_ticks.is_none() {
        info!("No tick limit set, press Ctrl+C to stop");
    }

    let stats = tokio::select! {
        stats = driver.run() => stats,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            driver.halt();
            driver.stats().clone()
        }
    };

    let compress_pulses = host
        .signals
        .integer_history()
        .iter()
        .filter(|(name, value)| *name == config.compress_signal && *value == 1)
        .count();

    if json {
        let summary = serde_json::json!({
            "stats": stats,
            "final_state": driver.machine().current(),
            "compress_pulses": compress_pulses,
            "motor_writes": host.left.writes() + host.right.writes(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Ticks:           {}", stats.ticks);
        println!("Transitions:     {}", stats.transitions);
        println!("Sensor faults:   {}", stats.sensor_faults);
        println!("Signal faults:   {}", stats.signal_faults);
        println!("Compress pulses: {}", compress_pulses);
        println!("Final state:     {}", driver.machine().current());
    }

    Ok(())
}

fn inspect_image(path: &Path, class: ObjectClass, json: bool) -> Result<()> {
    let frame =
        Frame::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let report = inspect::inspect(&frame, class);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}
