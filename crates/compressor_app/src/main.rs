mod cli;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Args::parse();
    if !compressor_logging::initialize(args.log.into(), args.log_level()) {
        eprintln!("Warning: a logger was already installed; --log {:?} is ignored", args.log);
    }
    platform::run_app(args)
}
