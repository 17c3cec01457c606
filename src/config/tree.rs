//! Tree configuration module.
//!
//! Limits applied to keys inserted into a Lanai Tree.

use super::{ConfigResult, Validate};
use crate::data_structures::lanai_tree::DEFAULT_MAX_KEY_LENGTH;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Tree configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Longest key accepted, in characters
    pub max_key_length: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_key_length: DEFAULT_MAX_KEY_LENGTH,
        }
    }
}

impl Validate for TreeConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_key_length == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "tree.max_key_length".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
