//! huffpack-core: lossless byte-stream compression with Huffman coding
//!
//! This library provides the codec behind the `huffpack` tool:
//! - Counts byte frequencies and builds a Huffman merge tree
//! - Derives a prefix-free code table from the tree
//! - Serializes the table into a self-describing header
//! - Packs codes into a dense MSB-first bitstream and reverses it exactly
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `frequency`: Byte frequency table
//! - `tree`: Arena-allocated Huffman tree
//! - `codebook`: Bidirectional symbol ↔ code table and decoding trie
//! - `header`: Code table header and padding trailer
//! - `bitio`: Low-level bit packing/reading
//! - `codec`: Compression and decompression pipelines
//! - `metrics`: Observable run statistics
//!
//! # Example
//! ```
//! let packed = huffpack_core::compress(b"abracadabra").unwrap();
//! assert_eq!(huffpack_core::decompress(&packed).unwrap(), b"abracadabra");
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Equal weights are merged in a fixed order, so the same
//!   input always produces the same file
//! - **No partial output**: Decoded data is released only after the whole body
//!   checks out

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod header;
pub mod metrics;
pub mod tree;

// Re-export commonly used types
pub use codebook::{Code, CodeTable};
pub use codec::{compress, compress_into, decompress, decompress_into, CodecSummary};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use tree::HuffmanTree;
