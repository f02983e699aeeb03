//! # SMC Console
//!
//! Interactive stepper/servo motor console. Opens a motor driver through the
//! driver registry, optionally runs the startup exercise, then drives the
//! frame loop from a headless scripted console until the script ends or
//! Ctrl-C is pressed.

use clap::Parser;
use smc_common::config::{ConfigError, ConfigLoader, LogLevel};
use smc_common::consts::DEFAULT_CONFIG_PATH;
use smc_control::config::ConsoleConfig;
use smc_control::console::scripted::{OperatorScript, ScriptedConsole};
use smc_control::cycle::{FrameRunner, startup_exercise};
use smc_control::link::MotorLink;
use smc_hal::DriverRegistry;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// SMC Console: frame-loop motor console
#[derive(Parser, Debug)]
#[command(name = "smc_control")]
#[command(version)]
#[command(about = "Interactive stepper/servo motor console")]
struct Args {
    /// Path to the console configuration TOML.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Device path override (e.g. /dev/ttyUSB0).
    #[arg(long)]
    device: Option<PathBuf>,

    /// Operator script to replay (TOML, `[[step]]` entries).
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Stop after this many frames (overrides the script's limit).
    #[arg(long)]
    frames: Option<u64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Logging depends on the config's level, so load before the subscriber exists.
    let loaded = ConsoleConfig::load_or_default(&args.config);
    let level = match &loaded {
        Ok((config, _)) => config.shared.log_level,
        Err(_) => LogLevel::default(),
    };
    setup_tracing(&args, level);

    info!("SMC Console v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|(config, found)| run(&args, config, found))
    {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("SMC Console shutdown complete");
}

fn run(
    args: &Args,
    mut config: ConsoleConfig,
    found: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if found {
        info!("Loaded config from {}", args.config.display());
    } else {
        warn!(
            "Config '{}' not found, using defaults",
            args.config.display()
        );
    }

    if let Some(ref device) = args.device {
        config.driver.device_path = device.display().to_string();
    }
    config.validate()?;

    info!(
        "Config OK: driver={}, device={}, rate={}Hz",
        config.driver.name, config.driver.device_path, config.frame.rate_hz
    );

    let registry = DriverRegistry::with_builtin();
    let driver = registry.open(&config.driver)?;
    let mut link = MotorLink::new(driver);

    startup_exercise(&mut link, &config.startup);

    let mut runner =
        FrameRunner::start(link, config.bounds)?.with_frame_rate(config.frame.rate_hz);

    let script = match args.script {
        Some(ref path) => {
            let script = OperatorScript::load(path).map_err(|e| match e {
                ConfigError::FileNotFound => {
                    ConfigError::ValidationError(format!("script not found: {}", path.display()))
                }
                other => other,
            })?;
            info!(
                "Replaying {} scripted operator events from {}",
                script.step.len(),
                path.display()
            );
            script
        }
        None => OperatorScript::default(),
    };

    let mut console = ScriptedConsole::new(script)
        .with_frame_limit(args.frames)
        .with_report_every(config.frame.report_every);

    let shutdown = console.shutdown_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        shutdown.store(true, Ordering::SeqCst);
    })?;

    runner.run(&mut console);

    if console.pending() > 0 {
        warn!("{} scripted events were never replayed", console.pending());
    }
    Ok(())
}

fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
