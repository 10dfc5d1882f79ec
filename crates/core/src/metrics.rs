//! Metrics collection and reporting for one compress or decompress run.
//!
//! This module provides observable insights into a run:
//! - Throughput (bytes in/out)
//! - Compression ratio
//! - Header/body split and padding
//! - Timing information
//!
//! # Design
//!
//! A run is single-threaded, so `Metrics` is a plain struct updated once
//! from the pipeline's [`CodecSummary`] and then printed.

use std::time::{Duration, Instant};

use crate::codec::CodecSummary;

/// Which pipeline a run used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Compress => "compress",
            Mode::Decompress => "decompress",
        }
    }
}

/// Counts, sizes and timing for a single run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Pipeline used
    pub mode: Mode,

    // === Input/Output ===
    /// Total bytes read from input file
    pub input_bytes: u64,

    /// Total bytes written to output file
    pub output_bytes: u64,

    // === Compressed layout ===
    /// Header bytes in the compressed file
    pub header_bytes: u64,

    /// Packed body bytes in the compressed file
    pub body_bytes: u64,

    /// Padding bits in the last body byte
    pub padding_bits: u8,

    // === Code table ===
    /// Symbols in the code table
    pub distinct_symbols: usize,

    /// Longest code length in bits
    pub max_code_len: usize,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(mode: Mode) -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            mode,
            input_bytes: 0,
            output_bytes: 0,
            header_bytes: 0,
            body_bytes: 0,
            padding_bits: 0,
            distinct_symbols: 0,
            max_code_len: 0,
        }
    }

    /// Copy the figures of a finished pipeline run.
    pub fn record(&mut self, summary: &CodecSummary) {
        self.input_bytes = summary.input_bytes;
        self.output_bytes = summary.output_bytes;
        self.header_bytes = summary.header_bytes;
        self.body_bytes = summary.body_bytes;
        self.padding_bits = summary.padding_bits;
        self.distinct_symbols = summary.distinct_symbols;
        self.max_code_len = summary.max_code_len;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Size of the compressed side in bytes.
    fn compressed_bytes(&self) -> u64 {
        match self.mode {
            Mode::Compress => self.output_bytes,
            Mode::Decompress => self.input_bytes,
        }
    }

    /// Size of the uncompressed side in bytes.
    fn raw_bytes(&self) -> u64 {
        match self.mode {
            Mode::Compress => self.input_bytes,
            Mode::Decompress => self.output_bytes,
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if there is no raw data.
    pub fn compression_ratio(&self) -> f64 {
        let raw = self.raw_bytes();
        if raw == 0 {
            0.0
        } else {
            self.compressed_bytes() as f64 / raw as f64
        }
    }

    /// Average bits spent per raw byte in the packed body.
    pub fn bits_per_symbol(&self) -> f64 {
        let raw = self.raw_bytes();
        if raw == 0 {
            0.0
        } else {
            let body_bits = self.body_bytes * 8 - self.padding_bits as u64;
            body_bits as f64 / raw as f64
        }
    }

    /// Compute throughput in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let duration_ms = self.duration().as_millis();

        println!("\n=== {} Summary ===", capitalize(self.mode.as_str()));
        println!("Duration: {} ms", duration_ms);
        println!();

        println!("Input:  {} bytes ({:.2} KiB)", self.input_bytes, self.input_bytes as f64 / 1024.0);
        println!("Output: {} bytes ({:.2} KiB)", self.output_bytes, self.output_bytes as f64 / 1024.0);
        println!();

        println!("=== Layout ===");
        println!("Header: {} bytes", self.header_bytes);
        println!("Body: {} bytes", self.body_bytes);
        println!("Padding: {} bits", self.padding_bits);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!("Bits/symbol: {:.3}", self.bits_per_symbol());
        println!();

        println!("=== Code Table ===");
        println!("Symbols: {}", self.distinct_symbols);
        println!("Longest code: {} bits", self.max_code_len);
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Print just the final result line.
    pub fn print_result(&self) {
        println!(
            "✓ {} completed: {} -> {} bytes in {} ms",
            self.mode.as_str(),
            self.input_bytes,
            self.output_bytes,
            self.duration().as_millis()
        );
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "mode={}\n\
             duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             header_bytes={}\n\
             body_bytes={}\n\
             padding_bits={}\n\
             distinct_symbols={}\n\
             max_code_len={}\n\
             compression_ratio={:.4}\n",
            self.mode.as_str(),
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.header_bytes,
            self.body_bytes,
            self.padding_bits,
            self.distinct_symbols,
            self.max_code_len,
            self.compression_ratio(),
        )
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new(Mode::Compress);
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100); // Should be recent
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new(Mode::Compress);
        metrics.input_bytes = 1000;
        metrics.output_bytes = 750;
        assert_eq!(metrics.compression_ratio(), 0.75);

        // Decompression reads the compressed side
        let mut metrics = Metrics::new(Mode::Decompress);
        metrics.input_bytes = 750;
        metrics.output_bytes = 1000;
        assert_eq!(metrics.compression_ratio(), 0.75);
    }

    #[test]
    fn test_empty_run() {
        let metrics = Metrics::new(Mode::Compress);
        assert_eq!(metrics.compression_ratio(), 0.0);
        assert_eq!(metrics.bits_per_symbol(), 0.0);
    }

    #[test]
    fn test_record_summary() {
        let summary = CodecSummary {
            input_bytes: 11,
            output_bytes: 31,
            header_bytes: 27,
            body_bytes: 3,
            padding_bits: 1,
            distinct_symbols: 5,
            max_code_len: 3,
        };
        let mut metrics = Metrics::new(Mode::Compress);
        metrics.record(&summary);

        assert_eq!(metrics.header_bytes, 27);
        assert_eq!(metrics.distinct_symbols, 5);
        // 23 body bits over 11 symbols
        assert!((metrics.bits_per_symbol() - 23.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput() {
        let mut metrics = Metrics::new(Mode::Compress);
        metrics.input_bytes = 1_000_000;

        std::thread::sleep(Duration::from_millis(10));
        metrics.complete();

        assert!(metrics.throughput_bps() > 0.0);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new(Mode::Decompress);
        metrics.input_bytes = 31;
        metrics.output_bytes = 11;
        metrics.distinct_symbols = 5;

        let text = metrics.export_text();
        assert!(text.contains("mode=decompress"));
        assert!(text.contains("input_bytes=31"));
        assert!(text.contains("output_bytes=11"));
        assert!(text.contains("distinct_symbols=5"));
    }
}
