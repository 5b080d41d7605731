use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;
use std::path::Path;

/// Drop the older half of the log once it grows past `max_log_size`, cutting
/// at a line boundary.
fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

fn terminal_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn max_level(verbose: bool, file_logging: bool) -> LevelFilter {
    if verbose || file_logging {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the global logger: warnings (or everything with `--verbose`) on
/// stderr, plus a debug log file when enabled in settings.
pub fn init_logging(log_file: Option<&Path>, verbose: bool, debug_logging: bool, max_log_size: u64) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("fvm")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        terminal_level(verbose),
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let mut file_logging = false;
    if debug_logging && let Some(log_path) = log_file {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        trim_log_file_if_oversized(log_path, max_log_size);
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(log_path) {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
            file_logging = true;
        }
    }

    let _ = CombinedLogger::init(loggers);
    log::set_max_level(max_level(verbose, file_logging));

    if file_logging && let Some(log_path) = log_file {
        log::info!("Debug logging to {}", log_path.display());
    }
}
