//! One compress or decompress run, from input file to published output.

use huffpack_core::{
    compress_into, decompress, decompress_into,
    metrics::{Metrics, Mode},
    Error, Result,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::files::{read_input, write_atomically};
use crate::input_gen::generate_sample_data;

/// Execute the configured run and return its metrics.
///
/// The output file is only touched after the pipeline (and verification,
/// when enabled) has succeeded.
pub fn execute(config: &Config) -> Result<Metrics> {
    if let Some(sample) = &config.sample {
        info!(
            path = %config.input_file.display(),
            bytes = sample.size_bytes,
            seed = sample.seed,
            "generating sample input"
        );
        write_atomically(
            &config.input_file,
            &generate_sample_data(sample.seed, sample.size_bytes),
        )?;
    }

    let mut metrics = Metrics::new(config.mode);
    let input = read_input(&config.input_file)?;

    let mut output = Vec::new();
    let summary = match config.mode {
        Mode::Compress => {
            let summary = compress_into(&input, &mut output)?;
            if config.verify {
                verify_round_trip(&input, &output)?;
            }
            summary
        }
        Mode::Decompress => decompress_into(&input, &mut output)?,
    };

    write_atomically(&config.output_file, &output)?;

    metrics.record(&summary);
    metrics.complete();
    info!(
        mode = config.mode.as_str(),
        input_bytes = metrics.input_bytes,
        output_bytes = metrics.output_bytes,
        "run complete"
    );
    Ok(metrics)
}

/// Decompress `compressed` and compare its CRC-32 against the original.
fn verify_round_trip(original: &[u8], compressed: &[u8]) -> Result<()> {
    let restored = decompress(compressed)?;
    let expected = crc32fast::hash(original);
    let actual = crc32fast::hash(&restored);

    if expected != actual {
        return Err(Error::Verify { expected, actual });
    }
    debug!(crc32 = expected, "verified round trip");
    Ok(())
}
