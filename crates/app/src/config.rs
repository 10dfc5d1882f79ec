//! Configuration for the huffpack application.
//!
//! Command-line arguments are parsed with clap and resolved into a [`Config`]
//! that the rest of the binary consumes.
//!
//! # Philosophy
//!
//! Plain `huffpack IN OUT` must just work. Everything else is opt-in, and a
//! generated sample always records its seed so runs are reproducible.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use huffpack_core::{metrics::Mode, Error, Result};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Lossless file compression with Huffman coding", long_about = None)]
pub struct Args {
    /// Decompress INPUT instead of compressing it
    #[arg(short, long)]
    pub decompress: bool,

    /// File to read
    pub input: PathBuf,

    /// File to write (replaced only when the run succeeds)
    pub output: PathBuf,

    /// Decompress the result in memory and compare CRC-32 before writing
    #[arg(long, conflicts_with = "decompress")]
    pub verify: bool,

    /// Generate a sample of N bytes at INPUT before compressing
    #[arg(long, value_name = "N", conflicts_with = "decompress")]
    pub sample_size: Option<usize>,

    /// Seed for sample generation (default: time-based)
    #[arg(long, value_name = "N", requires = "sample_size")]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Print the resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

/// Deterministic sample to write at the input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleConfig {
    pub size_bytes: usize,
    pub seed: u64,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Files ===
    /// Input file path
    pub input_file: PathBuf,

    /// Output file path
    pub output_file: PathBuf,

    // === Behavior ===
    /// Compress or decompress
    pub mode: Mode,

    /// Round-trip check after compressing
    pub verify: bool,

    /// Sample generation, if requested
    pub sample: Option<SampleConfig>,

    // === Reporting ===
    /// Maximum tracing level
    pub log_level: Level,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// If `--sample-size` is given without `--seed`, a time-based seed is
    /// chosen; `print()` shows it so the sample can be regenerated.
    pub fn from_args(args: Args) -> Result<Self> {
        if args.input == args.output {
            return Err(Error::Config(format!(
                "input and output are the same file: {}",
                args.input.display()
            )));
        }

        let log_level: Level = args
            .log_level
            .parse()
            .map_err(|_| Error::Config(format!("invalid log level: {}", args.log_level)))?;

        let sample = match args.sample_size {
            Some(0) => return Err(Error::Config("--sample-size must be at least 1".to_string())),
            Some(size_bytes) => Some(SampleConfig {
                size_bytes,
                seed: args.seed.unwrap_or_else(time_seed),
            }),
            None => None,
        };

        Ok(Config {
            input_file: args.input,
            output_file: args.output,
            mode: if args.decompress {
                Mode::Decompress
            } else {
                Mode::Compress
            },
            verify: args.verify,
            sample,
            log_level,
            print_config: args.print_config,
            print_metrics: !args.no_metrics,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Mode:        {}", self.mode.as_str());
        println!("Input file:  {}", self.input_file.display());
        println!("Output file: {}", self.output_file.display());
        println!("Verify:      {}", if self.verify { "crc32" } else { "off" });
        println!("Log level:   {}", self.log_level);
        println!();
        if let Some(sample) = &self.sample {
            println!("=== Sample ===");
            println!("Size: {} bytes ({} KiB)", sample.size_bytes, sample.size_bytes / 1024);
            println!("Seed: {}", sample.seed);
            println!();
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("huffpack").chain(argv.iter().copied()))
    }

    #[test]
    fn test_minimal_compress() {
        let config = Config::from_args(parse(&["in.txt", "out.huf"]).unwrap()).unwrap();
        assert_eq!(config.mode, Mode::Compress);
        assert_eq!(config.input_file, PathBuf::from("in.txt"));
        assert_eq!(config.output_file, PathBuf::from("out.huf"));
        assert_eq!(config.log_level, Level::WARN);
        assert!(!config.verify);
        assert!(config.sample.is_none());
        assert!(config.print_metrics);
    }

    #[test]
    fn test_decompress_flag() {
        for flag in ["-d", "--decompress"] {
            let config = Config::from_args(parse(&[flag, "a.huf", "a.txt"]).unwrap()).unwrap();
            assert_eq!(config.mode, Mode::Decompress);
        }
    }

    #[test]
    fn test_missing_operands_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["only-input"]).is_err());
        assert!(parse(&["a", "b", "c"]).is_err());
    }

    #[test]
    fn test_usage_errors_exit_with_status_2() {
        let err = parse(&["--bogus", "a", "b"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_sample_with_seed() {
        let args = parse(&["in.bin", "out.huf", "--sample-size", "4096", "--seed", "42"]).unwrap();
        let config = Config::from_args(args).unwrap();
        assert_eq!(
            config.sample,
            Some(SampleConfig {
                size_bytes: 4096,
                seed: 42
            })
        );
    }

    #[test]
    fn test_seed_requires_sample_size() {
        assert!(parse(&["in.bin", "out.huf", "--seed", "42"]).is_err());
    }

    #[test]
    fn test_compress_only_flags_conflict_with_decompress() {
        assert!(parse(&["-d", "a", "b", "--verify"]).is_err());
        assert!(parse(&["-d", "a", "b", "--sample-size", "10"]).is_err());
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        let args = parse(&["in.bin", "out.huf", "--sample-size", "0"]).unwrap();
        assert!(matches!(Config::from_args(args), Err(Error::Config(_))));
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let args = parse(&["file", "file"]).unwrap();
        assert!(matches!(Config::from_args(args), Err(Error::Config(_))));
    }

    #[test]
    fn test_log_level_and_reporting_flags() {
        let args = parse(&[
            "a",
            "b",
            "--log-level",
            "debug",
            "--print-config",
            "--no-metrics",
        ])
        .unwrap();
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.print_config);
        assert!(!config.print_metrics);

        assert!(parse(&["a", "b", "--log-level", "loud"]).is_err());
    }
}
