#![deny(missing_docs)]
//! Shared logging utilities for the compressor workspace.
//!
//! This crate provides the `compressor_*` logging macros used across the
//! codebase, the process-wide logger initialisation used by the binary, and a
//! minimal test initializer for the global logger.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./compressor.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! compressor_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! compressor_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! compressor_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! compressor_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! compressor_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to [`DEFAULT_LOG_FILE`].
    File,
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initialize the global logger with the specified destination and level.
///
/// When the log file cannot be created, output falls back to the terminal.
/// Returns `false` only when a logger was already set.
pub fn initialize(destination: LogDestination, level: LevelFilter) -> bool {
    let loggers = build_loggers(destination, level, build_config(), Path::new(DEFAULT_LOG_FILE));
    CombinedLogger::init(loggers).is_ok()
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn build_loggers(
    destination: LogDestination,
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let file_logger = match destination {
        LogDestination::Terminal => None,
        LogDestination::File | LogDestination::Both => {
            create_file_logger(level, config.clone(), log_path)
        }
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination != LogDestination::File || file_logger.is_none() {
        loggers.push(terminal_logger(level, config));
    }
    if let Some(file_logger) = file_logger {
        loggers.push(file_logger);
    }
    loggers
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
