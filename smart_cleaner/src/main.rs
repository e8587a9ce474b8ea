use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use smart_cleaner::library::{CleanerConfig, CleanerPipeline};
use smart_cleaner::Scheduler;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smart_cleaner")]
#[command(about = "Smart Cleaner - reactive patrol, avoidance and cleaning controller")]
#[command(version)]
struct Cli {
    /// Configuration file (.toml, .yaml or .yml)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(short = 'd', long = "duration", value_name = "SECS")]
    duration: Option<f64>,

    /// Attach synthetic lidar and camera nodes
    #[arg(short = 's', long = "sim")]
    sim: bool,

    /// Override the control loop rate in Hz
    #[arg(short = 'r', long = "rate", value_name = "HZ")]
    rate: Option<f64>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "smart_cleaner=info,cleaner_core=info,cleaner_library=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => CleanerConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CleanerConfig::default(),
    };
    if let Some(rate) = cli.rate {
        config.scheduler.timing.global_rate_hz = rate;
    }
    config.validate().context("invalid configuration")?;

    let mut scheduler = Scheduler::new()
        .with_config(config.scheduler.clone())
        .name("SmartCleaner");

    CleanerPipeline::new(&config)
        .context("failed to build controller nodes")?
        .register(&mut scheduler);

    if cli.sim {
        CleanerPipeline::register_simulated_sensors(&config, &mut scheduler)
            .context("failed to attach simulated sensors")?;
        tracing::info!("Simulation mode: synthetic lidar and camera attached");
    }

    tracing::info!(
        "Listening on '{}' and '{}', commanding '{}' every {:?}",
        config.topics.scan,
        config.topics.image,
        config.topics.cmd_vel,
        config.scheduler.tick_period()
    );

    match cli.duration {
        Some(secs) => {
            let limit = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid duration {}", secs))?;
            scheduler.run_for(limit)?
        }
        None => scheduler.run()?,
    }

    Ok(())
}
