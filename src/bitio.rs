//! Bit-level packing on top of `bitstream-io`
//!
//! Bits are packed most-significant-bit first. The writer zero-pads the final
//! byte and reports the exact number of valid bits so the reader can stop
//! before the padding.

use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitWrite};

use crate::code_table::Code;
use crate::error::CompressError;

/// Packed bytes plus the number of bits in them that carry data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedBits {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl PackedBits {
    /// Pair `bytes` with a valid-bit count. The count must need exactly
    /// `bytes.len()` bytes.
    pub fn from_parts(bytes: Vec<u8>, bit_len: u64) -> Result<Self, CompressError> {
        if bit_len.div_ceil(8) != bytes.len() as u64 {
            return Err(CompressError::MalformedContainer(format!(
                "{} valid bits do not fit {} packed bytes",
                bit_len,
                bytes.len()
            )));
        }
        Ok(Self { bytes, bit_len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Zero bits appended to fill the last byte (0..=7).
    pub fn padding_bits(&self) -> u8 {
        ((8 - self.bit_len % 8) % 8) as u8
    }
}

pub struct BitWriter {
    inner: bitstream_io::BitWriter<Vec<u8>, BigEndian>,
    bit_len: u64,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            inner: bitstream_io::BitWriter::endian(Vec::new(), BigEndian),
            bit_len: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<(), CompressError> {
        self.inner.write_bit(bit)?;
        self.bit_len += 1;
        Ok(())
    }

    pub fn write_bits<I: IntoIterator<Item = bool>>(&mut self, bits: I) -> Result<(), CompressError> {
        for bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    pub fn write_code(&mut self, code: Code) -> Result<(), CompressError> {
        self.inner.write(code.length() as u32, code.bits())?;
        self.bit_len += code.length() as u64;
        Ok(())
    }

    /// Bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Pad to a byte boundary with zeros and hand back the buffer.
    pub fn finish(mut self) -> Result<PackedBits, CompressError> {
        self.inner.byte_align()?;
        Ok(PackedBits {
            bytes: self.inner.into_writer(),
            bit_len: self.bit_len,
        })
    }
}

pub struct BitReader<'a> {
    inner: bitstream_io::BitReader<Cursor<&'a [u8]>, BigEndian>,
    position: u64,
    bit_len: u64,
}

impl<'a> BitReader<'a> {
    /// Read at most `bit_len` bits from `bytes`.
    pub fn new(bytes: &'a [u8], bit_len: u64) -> Result<Self, CompressError> {
        let available = bytes.len() as u64 * 8;
        if bit_len > available {
            return Err(CompressError::MalformedContainer(format!(
                "{} valid bits claimed but only {} packed",
                bit_len, available
            )));
        }
        Ok(Self {
            inner: bitstream_io::BitReader::endian(Cursor::new(bytes), BigEndian),
            position: 0,
            bit_len,
        })
    }

    pub fn from_packed(packed: &'a PackedBits) -> Self {
        Self {
            inner: bitstream_io::BitReader::endian(Cursor::new(packed.as_bytes()), BigEndian),
            position: 0,
            bit_len: packed.bit_len(),
        }
    }

    pub fn read_bit(&mut self) -> Result<bool, CompressError> {
        if self.position >= self.bit_len {
            return Err(CompressError::BitOutOfRange {
                position: self.position,
                bit_len: self.bit_len,
            });
        }
        let bit = self.inner.read_bit()?;
        self.position += 1;
        Ok(bit)
    }

    pub fn read_bits(&mut self, count: u64) -> Result<Vec<bool>, CompressError> {
        (0..count).map(|_| self.read_bit()).collect()
    }

    /// Valid bits not yet read.
    pub fn remaining(&self) -> u64 {
        self.bit_len - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    fn pack(s: &str) -> PackedBits {
        let mut writer = BitWriter::new();
        writer.write_bits(bits_of(s)).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_exact_byte() {
        let packed = pack("10101010");
        assert_eq!(packed.as_bytes(), &[0xAA]);
        assert_eq!(packed.padding_bits(), 0);
        let mut reader = BitReader::from_packed(&packed);
        assert_eq!(reader.read_bits(8).unwrap(), bits_of("10101010"));
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let packed = pack("101");
        assert_eq!(packed.as_bytes(), &[0b1010_0000]);
        assert_eq!(packed.bit_len(), 3);
        assert_eq!(packed.padding_bits(), 5);
    }

    #[test]
    fn test_multiple_bytes() {
        let packed = pack("1010101011110000");
        assert_eq!(packed.as_bytes(), &[0xAA, 0xF0]);
        assert_eq!(packed.padding_bits(), 0);
    }

    #[test]
    fn test_empty() {
        let packed = pack("");
        assert!(packed.as_bytes().is_empty());
        assert_eq!(packed.bit_len(), 0);
        assert_eq!(packed.padding_bits(), 0);
        let mut reader = BitReader::from_packed(&packed);
        assert!(matches!(reader.read_bit(), Err(CompressError::BitOutOfRange { .. })));
    }

    #[test]
    fn test_symmetry_for_odd_lengths() {
        for len in [1usize, 7, 9, 63, 64, 65, 1001, 4099] {
            let bits: Vec<bool> = (0..len).map(|i| (i * 7 + i / 3) % 5 < 2).collect();
            let mut writer = BitWriter::new();
            writer.write_bits(bits.iter().copied()).unwrap();
            let packed = writer.finish().unwrap();
            assert_eq!(packed.as_bytes().len(), len.div_ceil(8));

            let mut reader = BitReader::new(packed.as_bytes(), packed.bit_len()).unwrap();
            assert_eq!(reader.read_bits(len as u64).unwrap(), bits, "length {}", len);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_read_past_valid_bits_fails() {
        let packed = pack("11");
        let mut reader = BitReader::from_packed(&packed);
        reader.read_bits(2).unwrap();
        match reader.read_bit() {
            Err(CompressError::BitOutOfRange { position, bit_len }) => {
                assert_eq!(position, 2);
                assert_eq!(bit_len, 2);
            }
            other => panic!("expected BitOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_write_code_matches_bit_string() {
        let code = crate::code_table::CodeTable::canonical(&[(b'a', 3), (b'b', 3), (b'c', 2), (b'd', 1)])
            .unwrap()
            .get(b'b')
            .unwrap();
        assert_eq!(code.to_bit_string(), "111");

        let mut writer = BitWriter::new();
        writer.write_bit(false).unwrap();
        writer.write_code(code).unwrap();
        assert_eq!(writer.bit_len(), 4);
        let packed = writer.finish().unwrap();
        assert_eq!(packed.as_bytes(), &[0b0111_0000]);
    }

    #[test]
    fn test_reader_rejects_overlong_bit_count() {
        assert!(BitReader::new(&[0xFF], 9).is_err());
    }

    #[test]
    fn test_from_parts_validates_length() {
        assert!(PackedBits::from_parts(vec![0, 0], 9).is_ok());
        assert!(PackedBits::from_parts(vec![0, 0], 8).is_err());
        assert!(PackedBits::from_parts(vec![0], 9).is_err());
    }
}
