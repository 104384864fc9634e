//! Huffman compression and decompression
//!
//! compress:   frequencies -> tree -> tree-walk code lengths -> canonical codes -> bit packing -> container
//! decompress: container -> canonical decode table -> bit reader -> symbols

use tracing::{debug, trace, warn};

use crate::bitio::{BitReader, BitWriter, PackedBits};
use crate::code_table::{CodeTable, DecodeTable};
use crate::config::CompressionConfig;
use crate::container::Container;
use crate::error::CompressError;
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Canonical code table for `freq`, or `None` when nothing was counted.
pub fn build_codes(freq: &FrequencyTable, max_code_length: u8) -> Result<Option<CodeTable>, CompressError> {
    let Some(tree) = HuffmanTree::build(freq) else {
        return Ok(None);
    };
    let codes = CodeTable::from_tree(&tree, max_code_length)?.to_canonical()?;
    Ok(Some(codes))
}

/// Pack the code of every byte of `data`.
pub fn encode(data: &[u8], codes: &CodeTable) -> Result<PackedBits, CompressError> {
    let mut writer = BitWriter::new();
    for &b in data {
        let code = codes.get(b).ok_or(CompressError::MissingCode { symbol: b })?;
        writer.write_code(code)?;
    }
    writer.finish()
}

/// Encode `data` into a container.
pub fn compress(data: &[u8], config: &CompressionConfig) -> Result<Container, CompressError> {
    config.validate()?;
    if data.len() > config.max_input_size {
        return Err(CompressError::InputTooLarge {
            size: data.len() as u64,
            limit: config.max_input_size,
        });
    }

    let freq = FrequencyTable::from_bytes(data);
    let Some(codes) = build_codes(&freq, config.max_code_length)? else {
        debug!("empty input, writing empty container");
        return Ok(Container {
            alphabet: Vec::new(),
            original_len: 0,
            payload: Default::default(),
        });
    };
    for (symbol, code) in codes.iter() {
        trace!(symbol, code = %code.to_bit_string(), "code assigned");
    }

    let payload = encode(data, &codes)?;

    debug!(
        original = data.len(),
        symbols = codes.len(),
        payload_bits = payload.bit_len(),
        "compressed"
    );
    Ok(Container {
        alphabet: codes.lengths(),
        original_len: data.len() as u64,
        payload,
    })
}

/// Decode a container back into the original bytes.
pub fn decompress(container: &Container, config: &CompressionConfig) -> Result<Vec<u8>, CompressError> {
    let original_len = usize::try_from(container.original_len)
        .ok()
        .filter(|&len| len <= config.max_input_size)
        .ok_or(CompressError::InputTooLarge {
            size: container.original_len,
            limit: config.max_input_size,
        })?;

    match container.alphabet.as_slice() {
        [] => return Ok(Vec::new()),
        // One symbol: the only code is the single bit 0, nothing to walk.
        &[(symbol, length)] => {
            if length != 1 || container.payload.bit_len() != container.original_len {
                return Err(CompressError::MalformedContainer(format!(
                    "single-symbol payload of {} bits for {} bytes",
                    container.payload.bit_len(),
                    original_len
                )));
            }
            let mut reader = BitReader::from_packed(&container.payload);
            while reader.remaining() > 0 {
                if reader.read_bit()? {
                    return Err(CompressError::MalformedContainer(
                        "payload bits match no code".into(),
                    ));
                }
            }
            return Ok(vec![symbol; original_len]);
        }
        _ => {}
    }

    let decoder = DecodeTable::from_lengths(&container.alphabet)?;
    let mut reader = BitReader::from_packed(&container.payload);
    let mut output = Vec::with_capacity(original_len);
    for _ in 0..original_len {
        let symbol = decoder.decode_symbol(&mut reader).map_err(|e| match e {
            CompressError::BitOutOfRange { .. } => {
                CompressError::MalformedContainer("payload ends in the middle of a code".into())
            }
            other => other,
        })?;
        output.push(symbol);
    }
    if reader.remaining() > 0 {
        return Err(CompressError::MalformedContainer(format!(
            "{} payload bits left after {} symbols",
            reader.remaining(),
            original_len
        )));
    }

    debug!(
        original = original_len,
        symbols = container.alphabet.len(),
        payload_bits = container.payload.bit_len(),
        "decompressed"
    );
    Ok(output)
}

/// Parse and decode a serialized container.
pub fn decompress_bytes(data: &[u8], config: &CompressionConfig) -> Result<Vec<u8>, CompressError> {
    let result = Container::from_bytes(data).and_then(|container| decompress(&container, config));
    if let Err(ref e) = result {
        warn!(error = %e, container_len = data.len(), "rejected container");
    }
    result
}
