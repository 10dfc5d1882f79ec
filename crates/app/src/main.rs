//! huffpack: compress and decompress files with Huffman coding
//!
//! ## Usage
//!
//! ```bash
//! # Compress
//! huffpack notes.txt notes.huf
//!
//! # Decompress
//! huffpack -d notes.huf notes.txt
//!
//! # Generate a reproducible sample, compress it and check the result
//! huffpack sample.bin sample.huf --sample-size 1048576 --seed 42 --verify
//! ```
//!
//! Exit status: 0 on success, 1 when the run fails, 2 for invalid usage.

mod config;
mod files;
mod input_gen;
mod run;

use std::error::Error as _;
use std::process::ExitCode;

use clap::{error::ErrorKind, CommandFactory, Parser};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Args, Config};

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {}", e);
    }

    if config.print_config {
        config.print();
    }

    match run::execute(&config) {
        Ok(metrics) => {
            if config.print_metrics {
                metrics.print_summary();
            }
            metrics.print_result();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
