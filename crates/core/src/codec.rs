//! End-to-end compression and decompression.
//!
//! # File Format
//!
//! ```text
//! +------------------+
//! | header           |  code table, see `header`
//! +------------------+
//! | body             |  packed codes, MSB-first, last byte zero-padded
//! +------------------+
//! | padding (1)      |  ASCII '0'..='7': padding bits in the last body byte
//! +------------------+
//! ```
//!
//! An empty input compresses to an empty file and an empty file decompresses
//! to nothing.
//!
//! # Integrity
//!
//! The format carries no length or checksum, so decoding checks what it can:
//! the body must exist, the padding bits must be zero, every bit path must
//! reach a code, and the stream must not end in the middle of a code.

use std::io::Write;

use tracing::debug;

use crate::bitio::{BitPacker, BitReader};
use crate::codebook::{CodeTable, Step};
use crate::error::{DecodeError, HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::header::{decode_header, encode_header, padding_digit, parse_padding_digit, TRAILER_LEN};
use crate::tree::HuffmanTree;

/// Sizes and table facts gathered while running either pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecSummary {
    /// Bytes consumed
    pub input_bytes: u64,
    /// Bytes produced
    pub output_bytes: u64,
    /// Header length in the compressed file
    pub header_bytes: u64,
    /// Packed body length in the compressed file
    pub body_bytes: u64,
    /// Padding bits in the last body byte
    pub padding_bits: u8,
    /// Entries in the code table
    pub distinct_symbols: usize,
    /// Longest code in the table
    pub max_code_len: usize,
}

/// Compress `input` into a new buffer.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_into(input, &mut output)?;
    Ok(output)
}

/// Compress `input`, writing the compressed file to `sink`.
///
/// # Errors
/// Only I/O errors from `sink`.
pub fn compress_into<W: Write>(input: &[u8], mut sink: W) -> Result<CodecSummary> {
    let mut summary = CodecSummary {
        input_bytes: input.len() as u64,
        ..CodecSummary::default()
    };
    if input.is_empty() {
        debug!("empty input, nothing to compress");
        return Ok(summary);
    }

    let frequencies = FrequencyTable::from_bytes(input);
    let table = {
        let tree = HuffmanTree::build(&frequencies)?;
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built huffman tree"
        );
        CodeTable::from_tree(&tree)
    };

    let header = encode_header(&table);
    sink.write_all(&header)?;

    let mut packer = BitPacker::new(&mut sink);
    for &byte in input {
        let code = table
            .get(byte)
            .ok_or(HuffmanError::SymbolNotInTable { symbol: byte })?;
        packer.push_code(code)?;
    }
    let padding = packer.flush()?;
    let body_bytes = packer.bytes_written();

    sink.write_all(&[padding_digit(padding)])?;
    sink.flush()?;

    summary.header_bytes = header.len() as u64;
    summary.body_bytes = body_bytes as u64;
    summary.padding_bits = padding;
    summary.distinct_symbols = table.len();
    summary.max_code_len = table.max_code_len();
    summary.output_bytes = summary.header_bytes + summary.body_bytes + TRAILER_LEN as u64;

    debug!(
        symbols = summary.distinct_symbols,
        header_bytes = summary.header_bytes,
        body_bytes = summary.body_bytes,
        padding,
        "compressed"
    );
    Ok(summary)
}

/// Decompress `input` into a new buffer.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_into(input, &mut output)?;
    Ok(output)
}

/// Decompress `input`, writing the original bytes to `sink`.
///
/// Nothing is written unless the whole body decodes cleanly.
///
/// # Errors
/// - `HeaderError` variants for a malformed header or padding digit
/// - `DecodeError` variants for a damaged body
/// - I/O errors from `sink`
pub fn decompress_into<W: Write>(input: &[u8], mut sink: W) -> Result<CodecSummary> {
    let mut summary = CodecSummary {
        input_bytes: input.len() as u64,
        ..CodecSummary::default()
    };
    let Some((&digit, rest)) = input.split_last() else {
        debug!("empty input, nothing to decompress");
        return Ok(summary);
    };

    let padding = parse_padding_digit(digit)?;
    let (table, header_len) = decode_header(rest)?;
    let body = &rest[header_len..];
    debug!(
        symbols = table.len(),
        header_bytes = header_len,
        body_bytes = body.len(),
        padding,
        "parsed header"
    );

    if body.is_empty() {
        return Err(DecodeError::MissingBody.into());
    }

    let reader = BitReader::new(body, padding)?;
    if !reader.padding_is_zero() {
        return Err(DecodeError::NonZeroPadding { padding }.into());
    }

    let output = decode_body(&table, reader)?;
    sink.write_all(&output)?;
    sink.flush()?;

    summary.output_bytes = output.len() as u64;
    summary.header_bytes = header_len as u64;
    summary.body_bytes = body.len() as u64;
    summary.padding_bits = padding;
    summary.distinct_symbols = table.len();
    summary.max_code_len = table.max_code_len();
    Ok(summary)
}

/// Match bits against the table one at a time, emitting a symbol per complete code.
fn decode_body(table: &CodeTable, reader: BitReader<'_>) -> Result<Vec<u8>> {
    let decoder = table.decoder();
    let mut output = Vec::with_capacity(reader.bits_remaining() / table.max_code_len().max(1));
    let mut state = decoder.start();

    for (position, bit) in reader.enumerate() {
        match decoder.step(state, bit) {
            Step::Symbol(symbol) => {
                output.push(symbol);
                state = decoder.start();
            }
            Step::Partial(next) => state = next,
            Step::Invalid => return Err(DecodeError::InvalidCode { position }.into()),
        }
    }

    if !state.is_start() {
        return Err(DecodeError::TruncatedStream {
            pending_bits: state.pending_bits(),
        }
        .into());
    }

    Ok(output)
}
