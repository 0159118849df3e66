//! termshot - main entry point

use anyhow::{Context, Result};
use std::io::stdin;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use termshot::cli::Cli;
use termshot::config::CaptureConfig;
use termshot::process_guard;
use termshot::session::run_session;

/// Initialize logging on stderr; RUST_LOG overrides the default level
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    info!("termshot starting up");

    let mut config = match &cli.config {
        Some(path) => CaptureConfig::load_from_file(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        None => CaptureConfig::default(),
    };
    cli.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    // Terminate the terminal if we are interrupted mid-session
    if let Err(e) = process_guard::init_signal_handlers(config.timing.terminate_grace()) {
        warn!("Failed to initialize signal handlers: {}", e);
    }
    debug!("Signal handlers initialized");

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        info!("Configuration saved to {}", path.display());
    }

    let report = run_session(&cli.script, &config, stdin().lock())
        .with_context(|| format!("Capture session for {} failed", cli.script.display()))?;

    for image in &report.images {
        println!("{}", image.display());
    }

    Ok(())
}
