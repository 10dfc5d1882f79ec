//! Sample input generation.
//!
//! `--sample-size` writes a deterministic file whose sections compress very
//! differently, so the metrics summary shows how the code table adapts.
//!
//! # Sections
//!
//! - Runs of a single byte (one-bit codes)
//! - Text over a small alphabet (short codes)
//! - A short pattern repeated (a handful of symbols)
//! - Uniform random bytes (codes near eight bits)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest single section in bytes.
const SECTION_BYTES: usize = 8192;

const TEXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz .!,\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Run,
    Text,
    Pattern,
    Noise,
}

impl Section {
    /// 30% runs, 30% text, 20% patterns, 20% noise.
    fn pick(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..10u8) {
            0..=2 => Section::Run,
            3..=5 => Section::Text,
            6..=7 => Section::Pattern,
            _ => Section::Noise,
        }
    }

    fn fill(self, rng: &mut ChaCha8Rng, len: usize, data: &mut Vec<u8>) {
        match self {
            Section::Run => {
                let byte: u8 = rng.gen();
                data.resize(data.len() + len, byte);
            }
            Section::Text => {
                data.extend((0..len).map(|_| TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())]));
            }
            Section::Pattern => {
                let pattern: Vec<u8> = (0..rng.gen_range(4..=32)).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().copied().cycle().take(len));
            }
            Section::Noise => data.extend((0..len).map(|_| rng.gen::<u8>())),
        }
    }
}

/// Generate exactly `size_bytes` of mixed-compressibility data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let len = (size_bytes - data.len()).min(SECTION_BYTES);
        Section::pick(&mut rng).fill(&mut rng, len, &mut data);
    }

    data
}
