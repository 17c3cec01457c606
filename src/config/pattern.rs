//! Pattern configuration module.
//!
//! Defaults for pattern compilation and matching.

use super::{ConfigResult, Validate};
use crate::data_structures::lanai_tree::{MatchMode, DEFAULT_MAX_PATTERN_LENGTH};
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Pattern configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Mode used by `match_pattern` (`anchored` or `contains`)
    pub default_mode: MatchMode,

    /// Longest pattern accepted, in characters
    pub max_pattern_length: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            default_mode: MatchMode::Anchored,
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
        }
    }
}

impl Validate for PatternConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_pattern_length == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "pattern.max_pattern_length".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_config_validation() {
        let config = PatternConfig::default();
        assert_eq!(config.default_mode, MatchMode::Anchored);
        assert!(config.validate().is_ok());

        let config = PatternConfig {
            max_pattern_length: 0,
            ..PatternConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
