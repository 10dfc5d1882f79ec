//! Bit-level I/O for the packed body.
//!
//! [`BitPacker`] and [`BitReader`] both work MSB-first: the first bit written
//! becomes the high bit of its byte, and the reader yields bits in the same
//! order.
//!
//! # Padding Rules
//! - BitPacker: `flush` zero-fills the unused low bits of a partial final byte
//!   and reports how many were added (0 when the stream ended on a byte
//!   boundary, in which case nothing is emitted)
//! - BitReader: constructed with that padding count, never yields the padding
//!   bits of the final byte
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitPacker, BitReader};
//!
//! let mut packer = BitPacker::new(Vec::new());
//! for bit in [true, false, true, true, true] {
//!     packer.push_bit(bit).unwrap();
//! }
//! let padding = packer.flush().unwrap(); // 10111 -> 10111000
//! assert_eq!(padding, 3);
//!
//! let bytes = packer.into_inner();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let reader = BitReader::new(&bytes, padding).unwrap();
//! let bits: Vec<bool> = reader.collect();
//! assert_eq!(bits, vec![true, false, true, true, true]);
//! ```

use std::io::Write;

use crate::codebook::Code;
use crate::error::{BitIoError, Result};

/// Packs single bits MSB-first into bytes written to `W`.
///
/// # Invariants
/// - `bit_count` is always < 8 between calls
/// - `bit_buffer` only has its top `bit_count` bits set
#[derive(Debug)]
pub struct BitPacker<W: Write> {
    sink: W,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Bytes emitted to the sink so far
    bytes_written: usize,
}

impl<W: Write> BitPacker<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            bit_buffer: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Append one bit; emits a byte once eight have accumulated.
    pub fn push_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.bit_buffer |= 1 << (7 - self.bit_count);
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.emit()?;
        }
        Ok(())
    }

    /// Append every bit of `code`, first bit first.
    pub fn push_code(&mut self, code: &Code) -> Result<()> {
        for &bit in code.bits() {
            self.push_bit(bit)?;
        }
        Ok(())
    }

    /// Emit the partial final byte, zero-padded, and return the padding count.
    ///
    /// Returns 0 and emits nothing when no bits are pending.
    pub fn flush(&mut self) -> Result<u8> {
        if self.bit_count == 0 {
            return Ok(0);
        }
        let padding = 8 - self.bit_count;
        self.emit()?;
        Ok(padding)
    }

    fn emit(&mut self) -> Result<()> {
        self.sink.write_all(&[self.bit_buffer])?;
        self.bytes_written += 1;
        self.bit_buffer = 0;
        self.bit_count = 0;
        Ok(())
    }

    /// Total bits pushed, including the pending partial byte.
    pub fn bits_written(&self) -> usize {
        self.bytes_written * 8 + self.bit_count as usize
    }

    /// Number of complete bytes emitted so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Give back the sink. Pending bits are dropped; call `flush` first.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Reads bits MSB-first from a packed body, skipping trailing padding.
///
/// # Invariants
/// - `bit_position` never exceeds `usable_bits`
/// - `usable_bits == data.len() * 8 - padding`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Padding bits at the bottom of the final byte
    padding: u8,
    /// Number of data bits in the buffer
    usable_bits: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data` whose final byte carries `padding` unused bits.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidPadding` if `padding > 7`, or if
    /// `padding > 0` while `data` is empty.
    pub fn new(data: &'a [u8], padding: u8) -> Result<Self> {
        if padding > 7 || (data.is_empty() && padding > 0) {
            return Err(BitIoError::InvalidPadding {
                padding,
                len: data.len(),
            }
            .into());
        }

        Ok(Self {
            data,
            padding,
            usable_bits: data.len() * 8 - padding as usize,
            bit_position: 0,
        })
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` once all usable bits are consumed.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.next().ok_or_else(|| BitIoError::UnexpectedEof.into())
    }

    /// True if the padding bits of the final byte are all zero.
    pub fn padding_is_zero(&self) -> bool {
        match self.data.last() {
            Some(&last) if self.padding > 0 => last & ((1u8 << self.padding) - 1) == 0,
            _ => true,
        }
    }

    /// Return the number of usable bits not yet read.
    pub fn bits_remaining(&self) -> usize {
        self.usable_bits - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if every usable bit has been read.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.usable_bits
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn pack(bits: &[u8]) -> (Vec<u8>, u8) {
        let mut packer = BitPacker::new(Vec::new());
        for &bit in bits {
            packer.push_bit(bit == 1).unwrap();
        }
        let padding = packer.flush().unwrap();
        (packer.into_inner(), padding)
    }

    #[test]
    fn test_full_byte_has_no_padding() {
        let (bytes, padding) = pack(&[1, 0, 1, 1, 0, 0, 1, 1]);
        assert_eq!(bytes, vec![0b10110011]);
        assert_eq!(padding, 0);
    }

    #[test]
    fn test_partial_byte_padding() {
        let (bytes, padding) = pack(&[1]);
        assert_eq!(bytes, vec![0b10000000]);
        assert_eq!(padding, 7);

        let (bytes, padding) = pack(&[1, 0, 1, 1, 1]);
        assert_eq!(bytes, vec![0b10111000]);
        assert_eq!(padding, 3);
    }

    #[test]
    fn test_flush_on_empty_emits_nothing() {
        let (bytes, padding) = pack(&[]);
        assert!(bytes.is_empty());
        assert_eq!(padding, 0);
    }

    #[test]
    fn test_multi_byte() {
        let bits = [1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1];
        let (bytes, padding) = pack(&bits);
        assert_eq!(bytes, vec![0b10101011, 0b11110000, 0b11000000]);
        assert_eq!(padding, 6);

        let reader = BitReader::new(&bytes, padding).unwrap();
        let read: Vec<u8> = reader.map(|b| b as u8).collect();
        assert_eq!(read, bits);
    }

    #[test]
    fn test_push_code() {
        let mut packer = BitPacker::new(Vec::new());
        packer.push_code(&Code::from_bit_str("110")).unwrap();
        packer.push_code(&Code::from_bit_str("0")).unwrap();
        assert_eq!(packer.bits_written(), 4);
        assert_eq!(packer.bytes_written(), 0);
        assert_eq!(packer.flush().unwrap(), 4);
        assert_eq!(packer.bytes_written(), 1);
        assert_eq!(packer.into_inner(), vec![0b11000000]);
    }

    #[test]
    fn test_reader_suppresses_padding() {
        let data = [0b11111111, 0b10100000];
        let mut reader = BitReader::new(&data, 5).unwrap();
        assert_eq!(reader.bits_remaining(), 11);
        for _ in 0..8 {
            assert!(reader.read_bit().unwrap());
        }
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_empty());
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_padding_is_zero() {
        let clean = [0b10100000];
        assert!(BitReader::new(&clean, 5).unwrap().padding_is_zero());

        let dirty = [0b10100001];
        assert!(!BitReader::new(&dirty, 5).unwrap().padding_is_zero());

        // No padding: every bit is data
        assert!(BitReader::new(&dirty, 0).unwrap().padding_is_zero());
    }

    #[test]
    fn test_invalid_padding() {
        assert!(matches!(
            BitReader::new(&[0xFF], 8),
            Err(Error::BitIo(BitIoError::InvalidPadding { padding: 8, len: 1 }))
        ));
        assert!(matches!(
            BitReader::new(&[], 3),
            Err(Error::BitIo(BitIoError::InvalidPadding { padding: 3, len: 0 }))
        ));
        assert!(BitReader::new(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_position_tracks_reads() {
        let data = [0xFF, 0xFF];
        let mut reader = BitReader::new(&data, 0).unwrap();
        assert_eq!(reader.bits_remaining(), 16);
        for _ in 0..5 {
            reader.read_bit().unwrap();
        }
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.bits_remaining(), 11);
    }
}
