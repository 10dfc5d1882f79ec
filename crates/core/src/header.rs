//! Header and trailer serialization.
//!
//! The header describes the code table and is written before the packed body.
//! The trailer is a single ASCII digit at the very end of the file giving the
//! number of padding bits in the last body byte.
//!
//! # Header Format
//!
//! ```text
//! <count:hex> '*'
//! repeated count times:
//!     <symbol:1 raw byte> <length:hex> '*' <value:hex> '*'
//! ```
//!
//! `value` is the code read MSB-first as an unsigned integer. Leading zero
//! bits vanish in that form (`001` and `01` are both `1`), so `length` is
//! what restores them. Values are written with as many hex digits as needed,
//! so codes longer than any machine word still round-trip.
//!
//! Numbers are written in lowercase hex and accepted in either case. Entries
//! are written in ascending symbol order; any order is accepted.
//!
//! # Example
//!
//! ```text
//! 5*a1*0*b3*6*c3*4*d3*5*r3*7*
//! ```
//!
//! is the header of `abracadabra`: `a` is `0`, `b` is `110`, and so on.

use tracing::trace;

use crate::codebook::{Code, CodeTable};
use crate::error::{Error, HeaderError, Result};

/// Field terminator.
const DELIMITER: u8 = b'*';

/// More symbols than this cannot exist in a byte alphabet.
const MAX_SYMBOLS: usize = 256;

/// A Huffman code over 256 symbols is at most 255 bits long.
const MAX_CODE_LEN: usize = 255;

/// Longest hex field accepted for counts and lengths.
const MAX_NUMBER_DIGITS: usize = 8;

/// Size of the padding trailer in bytes.
pub const TRAILER_LEN: usize = 1;

/// Serialize a code table.
pub fn encode_header(table: &CodeTable) -> Vec<u8> {
    let mut header = Vec::with_capacity(4 + table.len() * 8);
    header.extend_from_slice(format!("{:x}", table.len()).as_bytes());
    header.push(DELIMITER);

    for (symbol, code) in table.iter() {
        header.push(symbol);
        header.extend_from_slice(format!("{:x}", code.len()).as_bytes());
        header.push(DELIMITER);
        header.extend_from_slice(&code_to_hex(code));
        header.push(DELIMITER);
    }

    header
}

/// Parse a header from the front of `bytes`.
///
/// Returns the table and the number of bytes the header occupies. Bytes
/// after the header are not examined.
///
/// # Errors
/// Any `HeaderError`, carrying the offset where parsing stopped.
pub fn decode_header(bytes: &[u8]) -> Result<(CodeTable, usize)> {
    let mut cursor = HeaderCursor::new(bytes);

    let count_offset = cursor.offset();
    let count = cursor.read_number("symbol count")?;
    if count == 0 || count > MAX_SYMBOLS {
        return Err(HeaderError::InvalidSymbolCount {
            offset: count_offset,
            count,
        }
        .into());
    }

    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        let entry = cursor.read_entry().map_err(|err| match err {
            Error::Header(HeaderError::UnexpectedEnd { offset, .. }) => HeaderError::Truncated {
                offset,
                expected: count,
                found: index,
            }
            .into(),
            other => other,
        })?;
        trace!(symbol = entry.0, code = %entry.1, "header entry");
        entries.push(entry);
    }

    let end = cursor.offset();
    let table = CodeTable::from_entries(entries).map_err(|err| match err {
        Error::Huffman(source) => HeaderError::InvalidTable { offset: end, source }.into(),
        other => other,
    })?;

    Ok((table, end))
}

/// ASCII digit recording `padding` bits of padding.
pub fn padding_digit(padding: u8) -> u8 {
    debug_assert!(padding < 8);
    b'0' + padding
}

/// Parse the trailing padding digit.
///
/// # Errors
/// `HeaderError::InvalidPaddingDigit` unless `byte` is `'0'..='7'`.
pub fn parse_padding_digit(byte: u8) -> Result<u8> {
    match byte {
        b'0'..=b'7' => Ok(byte - b'0'),
        _ => Err(HeaderError::InvalidPaddingDigit { byte }.into()),
    }
}

/// Hex digits of the code read as an unsigned integer, no leading zeros.
fn code_to_hex(code: &Code) -> Vec<u8> {
    let bits = code.bits();
    // Left-pad to whole nibbles
    let lead = (4 - bits.len() % 4) % 4;
    let padded = std::iter::repeat(false).take(lead).chain(bits.iter().copied());

    let mut digits = Vec::with_capacity((bits.len() + 3) / 4);
    let mut nibble = 0u8;
    for (i, bit) in padded.enumerate() {
        nibble = (nibble << 1) | bit as u8;
        if i % 4 == 3 {
            if !(digits.is_empty() && nibble == 0) {
                digits.push(HEX_DIGITS[nibble as usize]);
            }
            nibble = 0;
        }
    }

    if digits.is_empty() {
        digits.push(b'0');
    }
    digits
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Position-tracking reader over header bytes.
struct HeaderCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> HeaderCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn read_byte(&mut self, field: &'static str) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or(HeaderError::UnexpectedEnd {
                offset: self.offset,
                field,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    /// Read hex digits up to and including the delimiter; returns the digit values.
    fn read_hex_field(&mut self, field: &'static str) -> Result<Vec<u8>> {
        let start = self.offset;
        let mut digits = Vec::new();
        loop {
            let offset = self.offset;
            let byte = self.read_byte(field)?;
            if byte == DELIMITER {
                break;
            }
            let value = hex_value(byte).ok_or(HeaderError::InvalidHexDigit { offset, byte })?;
            digits.push(value);
        }

        if digits.is_empty() {
            return Err(HeaderError::EmptyField {
                offset: start,
                field,
            }
            .into());
        }
        Ok(digits)
    }

    /// Read a small hex number (count or length).
    ///
    /// Values too wide to matter saturate to `usize::MAX`; callers range-check.
    fn read_number(&mut self, field: &'static str) -> Result<usize> {
        let digits = self.read_hex_field(field)?;

        let significant: Vec<u8> = digits.into_iter().skip_while(|&d| d == 0).collect();
        if significant.len() > MAX_NUMBER_DIGITS {
            return Ok(usize::MAX);
        }

        Ok(significant
            .iter()
            .fold(0usize, |acc, &d| (acc << 4) | d as usize))
    }

    /// Read one `(symbol, code)` entry.
    fn read_entry(&mut self) -> Result<(u8, Code)> {
        let symbol = self.read_byte("symbol")?;

        let length_offset = self.offset;
        let length = self.read_number("code length")?;
        if length == 0 || length > MAX_CODE_LEN {
            return Err(HeaderError::InvalidCodeLength {
                offset: length_offset,
                length,
            }
            .into());
        }

        let value_offset = self.offset;
        let digits = self.read_hex_field("code value")?;
        let code = code_from_hex(&digits, length).ok_or(HeaderError::ValueExceedsLength {
            offset: value_offset,
            symbol,
            length,
        })?;

        Ok((symbol, code))
    }
}

/// Rebuild a `length`-bit code from hex digit values, restoring leading zeros.
///
/// Returns `None` if the value has a set bit above `length`.
fn code_from_hex(digits: &[u8], length: usize) -> Option<Code> {
    let bits: Vec<bool> = digits
        .iter()
        .flat_map(|&d| (0..4).rev().map(move |shift| (d >> shift) & 1 == 1))
        .collect();

    if bits.len() >= length {
        let (excess, code) = bits.split_at(bits.len() - length);
        if excess.iter().any(|&bit| bit) {
            return None;
        }
        Some(code.iter().copied().collect())
    } else {
        let zeros = length - bits.len();
        Some(
            std::iter::repeat(false)
                .take(zeros)
                .chain(bits)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;

    fn table_for(input: &[u8]) -> CodeTable {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(input)).unwrap();
        CodeTable::from_tree(&tree)
    }

    fn entries(list: &[(u8, &str)]) -> CodeTable {
        CodeTable::from_entries(list.iter().map(|&(s, c)| (s, Code::from_bit_str(c)))).unwrap()
    }

    #[test]
    fn test_encode_abracadabra() {
        let header = encode_header(&table_for(b"abracadabra"));
        assert_eq!(header, b"5*a1*0*b3*6*c3*4*d3*5*r3*7*".to_vec());
    }

    #[test]
    fn test_encode_uses_hex() {
        let table = entries(&[
            (b'x', "0"),
            (b'y', "1000000000000000"),
            (b'z', "1111111111111111"),
        ]);
        let header = encode_header(&table);
        assert_eq!(header, b"3*x1*0*y10*8000*z10*ffff*".to_vec());
    }

    #[test]
    fn test_decode_round_trip() {
        let table = table_for(b"the quick brown fox jumps over the lazy dog");
        let header = encode_header(&table);
        let (decoded, len) = decode_header(&header).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(len, header.len());
    }

    #[test]
    fn test_leading_zeros_restored() {
        // 0011 and 11 share the integer value 3
        let table = entries(&[(b'a', "0011"), (b'b', "11"), (b'c', "0000")]);
        let header = encode_header(&table);
        assert_eq!(header, b"3*a4*3*b2*3*c4*0*".to_vec());

        let (decoded, _) = decode_header(&header).unwrap();
        assert_eq!(decoded.get(b'a').unwrap().to_string(), "0011");
        assert_eq!(decoded.get(b'b').unwrap().to_string(), "11");
        assert_eq!(decoded.get(b'c').unwrap().to_string(), "0000");
    }

    #[test]
    fn test_long_codes_round_trip() {
        let long = format!("0{}", "1".repeat(99));
        let table = entries(&[(b'a', "1"), (b'b', &long)]);
        let (decoded, _) = decode_header(&encode_header(&table)).unwrap();
        assert_eq!(decoded.get(b'b').unwrap().len(), 100);
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_delimiter_and_digits_as_symbols() {
        let table = entries(&[(b'*', "0"), (b'1', "10"), (b'f', "11")]);
        let header = encode_header(&table);
        let (decoded, len) = decode_header(&header).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(len, header.len());
    }

    #[test]
    fn test_decode_stops_at_header_end() {
        let mut bytes = encode_header(&table_for(b"abracadabra"));
        let header_len = bytes.len();
        bytes.extend_from_slice(&[0x6E, 0x8A, 0xDC, b'1']);
        let (_, len) = decode_header(&bytes).unwrap();
        assert_eq!(len, header_len);
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let (decoded, _) = decode_header(b"2*a1*0*bA*3FF*").unwrap();
        assert_eq!(decoded.get(b'b').unwrap().to_string(), "1111111111");
    }

    #[test]
    fn test_invalid_hex_digit() {
        let result = decode_header(b"2*a1*0*b1*g*");
        assert!(matches!(
            result,
            Err(Error::Header(HeaderError::InvalidHexDigit {
                offset: 10,
                byte: b'g'
            }))
        ));
    }

    #[test]
    fn test_missing_delimiter() {
        let result = decode_header(b"2*a1*0");
        assert!(matches!(
            result,
            Err(Error::Header(HeaderError::Truncated {
                expected: 2,
                found: 0,
                ..
            }))
        ));

        let result = decode_header(b"2");
        assert!(matches!(
            result,
            Err(Error::Header(HeaderError::UnexpectedEnd { offset: 1, .. }))
        ));
    }

    #[test]
    fn test_symbol_count_mismatch() {
        // Declares three entries but only two follow
        let result = decode_header(b"3*a1*0*b1*1*");
        assert!(matches!(
            result,
            Err(Error::Header(HeaderError::Truncated {
                offset: 12,
                expected: 3,
                found: 2
            }))
        ));
    }

    #[test]
    fn test_invalid_symbol_count() {
        assert!(matches!(
            decode_header(b"0*"),
            Err(Error::Header(HeaderError::InvalidSymbolCount { count: 0, .. }))
        ));
        assert!(matches!(
            decode_header(b"101*"),
            Err(Error::Header(HeaderError::InvalidSymbolCount { count: 257, .. }))
        ));
        assert!(matches!(
            decode_header(b"*"),
            Err(Error::Header(HeaderError::EmptyField { offset: 0, .. }))
        ));
    }

    #[test]
    fn test_oversized_numbers_rejected() {
        assert!(matches!(
            decode_header(b"123456789abc*"),
            Err(Error::Header(HeaderError::InvalidSymbolCount { offset: 0, .. }))
        ));
        assert!(matches!(
            decode_header(b"1*a100*0*"),
            Err(Error::Header(HeaderError::InvalidCodeLength {
                offset: 3,
                length: 256
            }))
        ));
    }

    #[test]
    fn test_invalid_code_length() {
        assert!(matches!(
            decode_header(b"1*a0*0*"),
            Err(Error::Header(HeaderError::InvalidCodeLength {
                offset: 3,
                length: 0
            }))
        ));
    }

    #[test]
    fn test_value_exceeds_length() {
        // 5 = 101 does not fit in two bits
        assert!(matches!(
            decode_header(b"1*a2*5*"),
            Err(Error::Header(HeaderError::ValueExceedsLength {
                offset: 5,
                symbol: b'a',
                length: 2
            }))
        ));
    }

    #[test]
    fn test_prefix_conflict_in_header() {
        assert!(matches!(
            decode_header(b"2*a1*1*b2*3*"),
            Err(Error::Header(HeaderError::InvalidTable { offset: 12, .. }))
        ));
    }

    #[test]
    fn test_padding_digit() {
        for padding in 0..8 {
            assert_eq!(parse_padding_digit(padding_digit(padding)).unwrap(), padding);
        }
        assert!(matches!(
            parse_padding_digit(b'8'),
            Err(Error::Header(HeaderError::InvalidPaddingDigit { byte: b'8' }))
        ));
        assert!(parse_padding_digit(0xDC).is_err());
    }
}
