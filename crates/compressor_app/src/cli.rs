use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use compressor_logging::LogDestination;
use log::LevelFilter;

/// Upload a ZIP of PDFs to the compression service and save the compressed result.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// ZIP file to compress. Several paths behave like dropping them on the
    /// form: only the first one is used.
    pub files: Vec<PathBuf>,

    /// Base URL of the compression service
    #[arg(long)]
    pub server: Option<String>,

    /// Compression level, one of the values offered by the form
    #[arg(long)]
    pub level: Option<String>,

    /// Directory the compressed file is saved to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Configuration file (RON)
    #[arg(long, default_value = "compressor.ron")]
    pub config: PathBuf,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log debug details
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the compression levels offered by the server and exit
    #[arg(long)]
    pub list_levels: bool,

    /// Save the effective settings to the configuration file
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn several_files_and_flags_parse() {
        let args = Args::try_parse_from([
            "compressor_app",
            "a.zip",
            "b.zip",
            "--level",
            "high",
            "--log",
            "both",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a.zip"), PathBuf::from("b.zip")]);
        assert_eq!(args.level.as_deref(), Some("high"));
        assert_eq!(args.log, LogTarget::Both);
        assert_eq!(args.log_level(), LevelFilter::Debug);
        assert_eq!(args.config, PathBuf::from("compressor.ron"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
