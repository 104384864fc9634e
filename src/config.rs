//! Configuration for huffpack

use serde::{Deserialize, Serialize};

use crate::code_table::MAX_CODE_LENGTH;
use crate::error::CompressError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Largest input accepted by `compress`, and largest original length a
    /// container may declare to `decompress`.
    pub max_input_size: usize,
    /// Longest code the compressor may emit. Capped at [`MAX_CODE_LENGTH`].
    pub max_code_length: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            max_code_length: MAX_CODE_LENGTH,
        }
    }
}

impl CompressionConfig {
    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, CompressError> {
        let config: CompressionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_code_length == 0 || self.max_code_length > MAX_CODE_LENGTH {
            return Err(CompressError::InvalidConfig(format!(
                "max_code_length must be in 1..={}, got {}",
                MAX_CODE_LENGTH, self.max_code_length
            )));
        }
        if self.max_input_size == 0 {
            return Err(CompressError::InvalidConfig(
                "max_input_size must be positive".into(),
            ));
        }
        Ok(())
    }
}
