//! fvm - Flutter Version Management
//!
//! Keeps several Flutter SDKs side by side and switches the active one.

use clap::Parser;
use fvm_platform::AppPaths;
use log::{debug, warn};

mod cli;
mod commands;
mod error;
mod logging;
mod settings;

use cli::Cli;
use settings::AppSettings;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (settings, settings_error) = match AppSettings::load() {
        Ok(settings) => (settings, None),
        Err(error) => (AppSettings::default(), Some(error)),
    };

    let log_file = AppPaths::new().ok().map(|paths| paths.log_file());
    logging::init_logging(
        log_file.as_deref(),
        cli.global.verbose,
        settings.debug_logging,
        settings.max_log_size_bytes,
    );
    if let Some(error) = settings_error {
        warn!("{error}; using default settings");
    }

    if let Err(error) = commands::run(cli, settings).await {
        debug!("Command failed: {error:?}");
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
