//! Prefix code tables
//!
//! [`CodeTable::from_tree`] walks a [`HuffmanTree`] (left = `0`, right = `1`)
//! and gives every leaf its path as a code. Only the resulting code *lengths*
//! go into a container; [`CodeTable::canonical`] and [`DecodeTable`] turn a
//! list of `(symbol, length)` pairs back into the same codes on both sides.
//!
//! Canonical assignment: sort by `(length, symbol)`, hand out consecutive
//! codes within a length, and shift left by one whenever the length grows.

use crate::bitio::BitReader;
use crate::error::CompressError;
use crate::tree::{HuffmanTree, Node};

/// Longest code the container format can carry.
pub const MAX_CODE_LENGTH: u8 = 64;

const LEN_SLOTS: usize = MAX_CODE_LENGTH as usize + 1;

/// A single codeword, stored right-aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    bits: u64,
    length: u8,
}

impl Code {
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of bits, always at least 1.
    pub fn length(&self) -> u8 {
        self.length
    }

    /// The code as a string of `'0'` and `'1'`, most significant bit first.
    pub fn to_bit_string(&self) -> String {
        (0..self.length)
            .rev()
            .map(|i| if (self.bits >> i) & 1 == 1 { '1' } else { '0' })
            .collect()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.length <= other.length && other.bits >> (other.length - self.length) == self.bits
    }
}

/// Symbol to code mapping for every symbol of one alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    /// Derive codes from the tree shape.
    ///
    /// A tree that is a lone leaf gets the one-bit code `0`. Fails with
    /// [`CompressError::OversizedCode`] when a leaf sits deeper than `limit`
    /// (itself capped at [`MAX_CODE_LENGTH`]); the lowest such symbol is
    /// reported.
    pub fn from_tree(tree: &HuffmanTree, limit: u8) -> Result<Self, CompressError> {
        let limit = limit.min(MAX_CODE_LENGTH);
        let depths = leaf_depths(tree);
        if let Some((symbol, &length)) = depths
            .iter()
            .enumerate()
            .find(|(_, &depth)| depth > limit as usize)
        {
            return Err(CompressError::OversizedCode {
                symbol: symbol as u8,
                length,
                limit,
            });
        }

        let mut codes = [None; 256];
        if let Node::Leaf { symbol, .. } = *tree.node(tree.root()) {
            codes[symbol as usize] = Some(Code { bits: 0, length: 1 });
            return Ok(Self { codes });
        }

        let mut stack = vec![(tree.root(), 0u64, 0u8)];
        while let Some((idx, bits, length)) = stack.pop() {
            match *tree.node(idx) {
                Node::Leaf { symbol, .. } => {
                    codes[symbol as usize] = Some(Code { bits, length });
                }
                Node::Internal { left, right, .. } => {
                    stack.push((right, (bits << 1) | 1, length + 1));
                    stack.push((left, bits << 1, length + 1));
                }
            }
        }
        Ok(Self { codes })
    }

    /// Assign canonical codes to `(symbol, length)` pairs.
    pub fn canonical(lengths: &[(u8, u8)]) -> Result<Self, CompressError> {
        let layout = CanonicalLayout::new(lengths)?;
        let mut codes = [None; 256];
        for length in 1..=layout.max_length as usize {
            let start = layout.first_index[length];
            let group = &layout.symbols[start..start + layout.counts[length]];
            for (rank, &symbol) in group.iter().enumerate() {
                codes[symbol as usize] = Some(Code {
                    bits: (layout.first_code[length] + rank as u128) as u64,
                    length: length as u8,
                });
            }
        }
        Ok(Self { codes })
    }

    /// Same lengths, canonical codes.
    pub fn to_canonical(&self) -> Result<Self, CompressError> {
        Self::canonical(&self.lengths())
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(i, code)| code.map(|c| (i as u8, c)))
    }

    /// `(symbol, code length)` pairs in ascending symbol order.
    pub fn lengths(&self) -> Vec<(u8, u8)> {
        self.iter().map(|(symbol, code)| (symbol, code.length)).collect()
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoder for canonical codes, rebuilt from `(symbol, length)` pairs alone.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    layout: CanonicalLayout,
}

impl DecodeTable {
    pub fn from_lengths(lengths: &[(u8, u8)]) -> Result<Self, CompressError> {
        Ok(Self {
            layout: CanonicalLayout::new(lengths)?,
        })
    }

    /// Read bits until they form a complete code and return its symbol.
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u8, CompressError> {
        let layout = &self.layout;
        let mut code: u128 = 0;
        for length in 1..=layout.max_length as usize {
            code = (code << 1) | reader.read_bit()? as u128;
            let first = layout.first_code[length];
            if code >= first && code - first < layout.counts[length] as u128 {
                return Ok(layout.symbols[layout.first_index[length] + (code - first) as usize]);
            }
        }
        Err(CompressError::MalformedContainer(
            "payload bits match no code".into(),
        ))
    }
}

/// Per-length bookkeeping shared by encoder and decoder.
#[derive(Debug, Clone)]
struct CanonicalLayout {
    max_length: u8,
    counts: [usize; LEN_SLOTS],
    first_code: [u128; LEN_SLOTS],
    first_index: [usize; LEN_SLOTS],
    /// Symbols sorted by `(length, symbol)`.
    symbols: Vec<u8>,
}

impl CanonicalLayout {
    fn new(lengths: &[(u8, u8)]) -> Result<Self, CompressError> {
        let mut seen = [false; 256];
        let mut counts = [0usize; LEN_SLOTS];
        for &(symbol, length) in lengths {
            if length == 0 || length > MAX_CODE_LENGTH {
                return Err(CompressError::MalformedContainer(format!(
                    "symbol {:#04x} has code length {}",
                    symbol, length
                )));
            }
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(CompressError::MalformedContainer(format!(
                    "symbol {:#04x} listed twice",
                    symbol
                )));
            }
            counts[length as usize] += 1;
        }

        let mut sorted = lengths.to_vec();
        sorted.sort_by_key(|&(symbol, length)| (length, symbol));
        let max_length = sorted.last().map_or(0, |&(_, length)| length);

        let mut first_code = [0u128; LEN_SLOTS];
        let mut first_index = [0usize; LEN_SLOTS];
        let mut next: u128 = 0;
        let mut index = 0;
        for length in 1..=max_length as usize {
            first_code[length] = next;
            first_index[length] = index;
            let end = next + counts[length] as u128;
            // Kraft: at most 2^length codes of this length remain available.
            if end > 1u128 << length {
                return Err(CompressError::MalformedContainer(
                    "code lengths are over-subscribed".into(),
                ));
            }
            next = end << 1;
            index += counts[length];
        }

        Ok(Self {
            max_length,
            counts,
            first_code,
            first_index,
            symbols: sorted.into_iter().map(|(symbol, _)| symbol).collect(),
        })
    }
}

/// Depth of every leaf, indexed by symbol; 0 for absent symbols. A root leaf
/// counts as depth 1.
fn leaf_depths(tree: &HuffmanTree) -> [usize; 256] {
    let mut depths = [0usize; 256];
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((idx, depth)) = stack.pop() {
        match *tree.node(idx) {
            Node::Leaf { symbol, .. } => depths[symbol as usize] = depth.max(1),
            Node::Internal { left, right, .. } => {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
    }
    depths
}
