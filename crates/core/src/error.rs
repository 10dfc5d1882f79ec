//! Error types for huffpack.
//!
//! All operations return structured errors rather than panicking. Only the
//! binary decides how an error becomes a message and an exit status.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: tree or code table construction
/// - Header: parsing the serialized code table or the padding digit
/// - Decode: data-integrity failures in the packed body
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman tree or code table error
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Malformed header
    #[error("malformed header: {0}")]
    Header(#[from] HeaderError),

    /// Corrupted or truncated body
    #[error("data integrity error: {0}")]
    Decode(#[from] DecodeError),

    /// Round-trip verification found different data
    #[error("verification failed: crc32 {expected:#010x} != {actual:#010x}")]
    Verify { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the last usable bit
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Padding count out of range for the given buffer
    #[error("invalid padding: {padding} bits over a {len}-byte buffer")]
    InvalidPadding { padding: u8, len: usize },
}

/// Huffman tree and code table errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty frequency table: cannot build tree")]
    EmptyFrequencyTable,

    /// Symbol has no code in the table
    #[error("symbol {symbol:#04x} not in code table")]
    SymbolNotInTable { symbol: u8 },

    /// Zero-length code
    #[error("symbol {symbol:#04x} has an empty code")]
    EmptyCode { symbol: u8 },

    /// Same symbol listed twice
    #[error("symbol {symbol:#04x} appears more than once")]
    DuplicateSymbol { symbol: u8 },

    /// One code is a prefix of (or equal to) another
    #[error("code of symbol {symbol:#04x} conflicts with code of symbol {other:#04x}")]
    PrefixConflict { symbol: u8, other: u8 },
}

/// Header parse errors. Every variant carries the byte offset where parsing failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// Input ended in the middle of a field
    #[error("unexpected end of header at offset {offset} while reading {field}")]
    UnexpectedEnd { offset: usize, field: &'static str },

    /// Non-hex character inside a numeric field
    #[error("invalid hex digit {byte:#04x} at offset {offset}")]
    InvalidHexDigit { offset: usize, byte: u8 },

    /// Numeric field with no digits before the delimiter
    #[error("empty {field} field at offset {offset}")]
    EmptyField { offset: usize, field: &'static str },

    /// Symbol count of zero or larger than the alphabet
    #[error("invalid symbol count {count} at offset {offset}")]
    InvalidSymbolCount { offset: usize, count: usize },

    /// Code length of zero or larger than any Huffman code can be
    #[error("invalid code length {length} at offset {offset}")]
    InvalidCodeLength { offset: usize, length: usize },

    /// Code value needs more bits than its length field allows
    #[error("code value of symbol {symbol:#04x} at offset {offset} does not fit in {length} bits")]
    ValueExceedsLength {
        offset: usize,
        symbol: u8,
        length: usize,
    },

    /// Fewer entries than the symbol count declares
    #[error("header declares {expected} symbols but only {found} are present (offset {offset})")]
    Truncated {
        offset: usize,
        expected: usize,
        found: usize,
    },

    /// Entries parse but do not form a valid code table
    #[error("invalid code table ending at offset {offset}: {source}")]
    InvalidTable {
        offset: usize,
        #[source]
        source: HuffmanError,
    },

    /// Final byte of the file is not a padding digit
    #[error("invalid padding digit {byte:#04x}: expected '0'..='7'")]
    InvalidPaddingDigit { byte: u8 },
}

/// Data-integrity errors raised while decoding the packed body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A header was found but no body bytes follow it
    #[error("compressed body is missing")]
    MissingBody,

    /// The padding bits of the final byte are not zero
    #[error("{padding} padding bits of the final byte are not zero")]
    NonZeroPadding { padding: u8 },

    /// Bit path does not lead to any code in the table
    #[error("invalid code at bit position {position}")]
    InvalidCode { position: usize },

    /// Stream ended inside a code
    #[error("stream ends with {pending_bits} unmatched bits")]
    TruncatedStream { pending_bits: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
