//! huffpack: deterministic Huffman compression into a self-describing container.
//!
//! - Frequency analysis over the 256 byte values
//! - Huffman tree built with an explicit `(weight, insertion order)` tie-break
//! - Canonical codes, so the container only carries `(symbol, code length)` pairs
//! - MSB-first bit packing with an exact valid-bit count
//!
//! The same input always produces the same container bytes, and every byte
//! sequence (including the empty one) round-trips exactly.

pub mod bitio;
pub mod code_table;
pub mod config;
pub mod container;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod tree;

use std::fs;
use std::path::Path;

use crate::config::CompressionConfig;
use crate::container::Container;
use crate::error::CompressError;
use crate::frequency::FrequencyTable;

/// Report produced by [`Compressor::analyze`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    /// `compressed_size / original_size`, 1.0 for empty input.
    pub ratio: f64,
    /// Shannon entropy in bits per byte.
    pub entropy_bits: f64,
    pub distinct_symbols: usize,
    /// Mean code length in bits per input byte.
    pub average_code_length: f64,
}

impl CompressionStats {
    pub fn to_json(&self) -> Result<String, CompressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sizes reported by the file helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    pub input_size: usize,
    pub output_size: usize,
}

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress `data` into container bytes.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        Ok(huffman::compress(data, &self.config)?.to_bytes())
    }

    /// Restore the original bytes from container bytes.
    pub fn decompress(&self, container: &[u8]) -> Result<Vec<u8>, CompressError> {
        huffman::decompress_bytes(container, &self.config)
    }

    /// Compress `data` and report how well it went.
    pub fn analyze(&self, data: &[u8]) -> Result<CompressionStats, CompressError> {
        let container = huffman::compress(data, &self.config)?;
        let freq = FrequencyTable::from_bytes(data);
        Ok(stats_for(data, &freq, &container))
    }

    /// Compress the file at `input` into `output`. `output` is only written
    /// once the whole container has been built.
    pub fn compress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<FileSummary, CompressError> {
        let data = fs::read(input)?;
        let container = self.compress(&data)?;
        fs::write(output, &container)?;
        Ok(FileSummary {
            input_size: data.len(),
            output_size: container.len(),
        })
    }

    /// Decompress the container file at `input` into `output`. `output` is
    /// only written once the whole payload has been decoded.
    pub fn decompress_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<FileSummary, CompressError> {
        let container = fs::read(input)?;
        let data = self.decompress(&container)?;
        fs::write(output, &data)?;
        Ok(FileSummary {
            input_size: container.len(),
            output_size: data.len(),
        })
    }
}

/// Compress with the default configuration.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressError> {
    Compressor::default().compress(data)
}

/// Decompress with the default configuration.
pub fn decompress(container: &[u8]) -> Result<Vec<u8>, CompressError> {
    Compressor::default().decompress(container)
}

fn stats_for(data: &[u8], freq: &FrequencyTable, container: &Container) -> CompressionStats {
    let compressed_size = container.header_len() + container.payload.as_bytes().len();
    let (ratio, average_code_length) = if data.is_empty() {
        (1.0, 0.0)
    } else {
        let len = data.len() as f64;
        (
            compressed_size as f64 / len,
            container.payload.bit_len() as f64 / len,
        )
    };
    CompressionStats {
        original_size: data.len(),
        compressed_size,
        ratio,
        entropy_bits: freq.entropy(),
        distinct_symbols: freq.distinct(),
        average_code_length,
    }
}
