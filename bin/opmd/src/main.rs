//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "binary"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Binary entrypoint for the OPM daemon."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use opm_common::config::AppConfig;
use opm_common::logging::init_tracing;
use opm_runtime::{Monitor, MonitorSettings};
use opm_telemetry::classify;
use tokio::signal;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(author, version, about = "OPM monitor daemon", long_about = None)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Override the walk seed from configuration")]
    seed: Option<u64>,

    #[arg(
        long,
        value_name = "MS",
        help = "Override the tick period in milliseconds"
    )]
    interval_ms: Option<u64>,

    #[arg(
        long,
        value_name = "N",
        help = "Stop after N ticks instead of running until ctrl-c"
    )]
    ticks: Option<u64>,

    #[arg(long, value_name = "FILE", help = "Write a tick jitter summary on exit")]
    jitter_report: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the monitor")]
    Run,
    #[command(about = "Validate configuration and exit")]
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/example.prod.toml"));
    candidates.push(PathBuf::from("configs/example.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let config = loaded.config;
    init_tracing("opmd", &config.logging)?;
    info!(config_path = %loaded.source.display(), "configuration loaded");

    match cli.command.take().unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(cli, config).await,
        Commands::CheckConfig => {
            println!(
                "Config: {}\nTick period: {} ms\nHistory window: {} samples\nSeed: {}",
                loaded.source.display(),
                config.simulation.tick_interval.as_millis(),
                config.simulation.history_capacity,
                config.simulation.random_seed,
            );
            Ok(())
        }
    }
}

async fn run_daemon(cli: Cli, config: AppConfig) -> Result<()> {
    let mut settings = MonitorSettings::from_config(&config)?;
    if let Some(seed) = cli.seed {
        settings.random_seed = seed;
    }
    if let Some(interval_ms) = cli.interval_ms {
        settings.tick_interval = std::time::Duration::from_millis(interval_ms);
    }
    if let Some(limit) = cli.ticks {
        settings = settings.with_max_ticks(limit);
    }
    if let Some(path) = cli.jitter_report {
        settings = settings.with_jitter_report(path);
    }

    let handle = Monitor::spawn(settings)?;

    // Stand-in for the presentation layer: log the display band of each
    // headline reading against its dashboard colouring bounds.
    let subscription = handle.subscribe(Box::new(|snapshot| {
        for (label, value, min, max) in [
            ("agzu_pressure", snapshot.readings.agzu_pressure, 40.0, 48.0),
            (
                "agzu_temperature",
                snapshot.readings.agzu_temperature,
                62.0,
                72.0,
            ),
            (
                "separator_pressure",
                snapshot.readings.separator_pressure,
                11.0,
                14.0,
            ),
            (
                "separator_temperature",
                snapshot.readings.separator_temperature,
                40.0,
                46.0,
            ),
            ("flow_rate", snapshot.readings.flow_rate, 145.0, 165.0),
            ("oil_level", snapshot.readings.oil_level, 72.0, 82.0),
        ] {
            debug!(
                tick = snapshot.tick,
                reading = label,
                value,
                band = %classify(value, min, max),
                "display band"
            );
        }
    }));

    if cli.ticks.is_some() {
        handle.join().await?;
    } else {
        info!("monitor running; waiting for termination signal");
        signal::ctrl_c().await?;
        info!("ctrl-c received; shutting down");
        handle.unsubscribe(subscription);
        handle.shutdown().await?;
    }

    Ok(())
}
