//! Container format
//!
//! ```text
//! "HUFP" | version u8 | N u16 | N x (symbol u8, length u8) | original length u64 | valid bits u64 | payload
//! ```
//!
//! Integers are little-endian. Symbols are strictly ascending. The payload is
//! exactly `ceil(valid bits / 8)` bytes and ends the container.

use crate::bitio::PackedBits;
use crate::code_table::MAX_CODE_LENGTH;
use crate::error::CompressError;

pub const MAGIC: [u8; 4] = *b"HUFP";
pub const FORMAT_VERSION: u8 = 1;

/// Size of the header fields that do not depend on the alphabet.
const FIXED_HEADER_LEN: usize = 4 + 1 + 2 + 8 + 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// `(symbol, code length)` in ascending symbol order.
    pub alphabet: Vec<(u8, u8)>,
    /// Number of bytes the payload decodes to.
    pub original_len: u64,
    pub payload: PackedBits,
}

impl Container {
    pub fn header_len(&self) -> usize {
        FIXED_HEADER_LEN + 2 * self.alphabet.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.header_len() + self.payload.as_bytes().len());
        output.extend_from_slice(&MAGIC);
        output.push(FORMAT_VERSION);
        output.extend_from_slice(&(self.alphabet.len() as u16).to_le_bytes());
        for &(symbol, length) in &self.alphabet {
            output.push(symbol);
            output.push(length);
        }
        output.extend_from_slice(&self.original_len.to_le_bytes());
        output.extend_from_slice(&self.payload.bit_len().to_le_bytes());
        output.extend_from_slice(self.payload.as_bytes());
        output
    }

    /// Parse and validate a serialized container.
    ///
    /// Checks everything that can be checked without decoding the payload;
    /// code lengths are validated further when the decode table is built.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CompressError> {
        let mut cursor = ByteCursor::new(data);

        if cursor.take(MAGIC.len())? != MAGIC {
            return Err(malformed("format marker mismatch"));
        }
        let version = cursor.u8()?;
        if version != FORMAT_VERSION {
            return Err(malformed(format!("unsupported format version {}", version)));
        }

        let count = cursor.u16_le()? as usize;
        if count > 256 {
            return Err(malformed(format!("alphabet of {} symbols", count)));
        }
        let mut alphabet: Vec<(u8, u8)> = Vec::with_capacity(count);
        for _ in 0..count {
            let symbol = cursor.u8()?;
            let length = cursor.u8()?;
            if let Some(&(prev, _)) = alphabet.last() {
                if symbol <= prev {
                    return Err(malformed("alphabet is not in ascending symbol order"));
                }
            }
            if length == 0 || length > MAX_CODE_LENGTH {
                return Err(malformed(format!(
                    "symbol {:#04x} has code length {}",
                    symbol, length
                )));
            }
            alphabet.push((symbol, length));
        }

        let original_len = cursor.u64_le()?;
        let bit_len = cursor.u64_le()?;
        if alphabet.is_empty() != (original_len == 0) {
            return Err(malformed(format!(
                "{} symbols declared for {} bytes",
                alphabet.len(),
                original_len
            )));
        }
        if alphabet.is_empty() && bit_len != 0 {
            return Err(malformed(format!(
                "{} payload bits declared without any symbols",
                bit_len
            )));
        }
        if original_len > bit_len {
            return Err(malformed(format!(
                "{} bytes cannot fit in {} payload bits",
                original_len, bit_len
            )));
        }

        let payload_len = usize::try_from(bit_len.div_ceil(8))
            .map_err(|_| malformed(format!("{} payload bits", bit_len)))?;
        let payload = cursor.take(payload_len)?.to_vec();
        if cursor.remaining() > 0 {
            return Err(malformed(format!(
                "{} trailing bytes after payload",
                cursor.remaining()
            )));
        }

        Ok(Self {
            alphabet,
            original_len,
            payload: PackedBits::from_parts(payload, bit_len)?,
        })
    }
}

fn malformed(msg: impl Into<String>) -> CompressError {
    CompressError::MalformedContainer(msg.into())
}

struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CompressError> {
        if self.remaining() < n {
            return Err(CompressError::TruncatedInput {
                needed: self.pos.saturating_add(n),
                available: self.data.len(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, CompressError> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16, CompressError> {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(self.take(2)?);
        Ok(u16::from_le_bytes(buf))
    }

    fn u64_le(&mut self) -> Result<u64, CompressError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }
}
