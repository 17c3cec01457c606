//! Configuration module for Lanai.
//!
//! Settings are layered: built-in defaults, then an optional file (TOML, YAML,
//! JSON), then `LANAI__SECTION__KEY` environment variables. The merged result
//! is validated before use.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError as ExternalConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::data_structures::lanai_tree::LanaiTreeConfig;
use crate::error::config::ConfigError;

pub mod pattern;
pub mod tree;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration file picked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config/lanai.toml";

/// Default environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "LANAI";

/// A trait for types that can be validated.
pub trait Validate {
    /// Validates that the configuration is correct.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the configuration is valid
    /// * `Err(ConfigError)` if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Main configuration for Lanai.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LanaiConfig {
    /// Tree limits
    pub tree: tree::TreeConfig,

    /// Pattern defaults
    pub pattern: pattern::PatternConfig,

    /// Log configuration
    pub log: LogConfig,
}

impl LanaiConfig {
    /// Tree settings derived from the `tree` and `pattern` sections.
    pub fn tree_config(&self) -> LanaiTreeConfig {
        LanaiTreeConfig::new()
            .with_max_key_length(self.tree.max_key_length)
            .with_max_pattern_length(self.pattern.max_pattern_length)
            .with_default_mode(self.pattern.default_mode)
    }
}

impl Validate for LanaiConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.tree.validate()?;
        self.pattern.validate()?;
        self.log.validate()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to log in JSON format
    pub json: bool,

    /// Whether to include source code locations in logs
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            source_location: true,
        }
    }
}

impl Validate for LogConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}",
                self.level
            ))),
        }
    }
}

/// Configuration loader for Lanai.
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional path to the configuration file
    /// * `env_prefix` - Prefix for environment variables that override configuration values
    pub fn new<P: AsRef<Path>>(config_path: Option<P>, env_prefix: &str) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            env_prefix: env_prefix.to_string(),
        }
    }

    /// Uses `config_path` when given, otherwise `default_path` if that file
    /// exists, otherwise defaults and environment only.
    pub fn discover(config_path: Option<&Path>, default_path: &Path, env_prefix: &str) -> Self {
        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None if default_path.is_file() => {
                tracing::debug!(path = %default_path.display(), "Using default configuration file");
                Some(default_path.to_path_buf())
            }
            None => None,
        };
        Self::new(path, env_prefix)
    }

    /// The file this loader reads, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Loads the configuration from a file and environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(LanaiConfig)` if the configuration was loaded successfully
    /// * `Err(ConfigError)` if there was an error loading the configuration
    pub fn load(&self) -> ConfigResult<LanaiConfig> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&LanaiConfig::default())
                .map_err(|e| ConfigError::ParseError(e.to_string()))?,
        );

        if let Some(path) = &self.config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }

            let format = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("json") => FileFormat::Json,
                Some("yaml" | "yml") => FileFormat::Yaml,
                _ => {
                    return Err(ConfigError::ParseError(format!(
                        "Unsupported file extension for: {path:?}"
                    )))
                }
            };
            builder = builder.add_source(File::from(path.as_path()).format(format));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| match e {
            ExternalConfigError::NotFound(path) => ConfigError::FileNotFound(PathBuf::from(path)),
            ExternalConfigError::PathParse(kind) => {
                ConfigError::ParseError(format!("Invalid path: {kind:?}"))
            }
            ExternalConfigError::FileParse { uri, cause } => ConfigError::ParseError(format!(
                "Error parsing {}: {cause}",
                uri.unwrap_or_else(|| "config file".to_string())
            )),
            ExternalConfigError::Foreign(err) => ConfigError::ParseError(err.to_string()),
            ExternalConfigError::Frozen => {
                ConfigError::ParseError("Configuration is frozen".to_string())
            }
            ExternalConfigError::Message(msg) => ConfigError::ParseError(msg),
            err @ ExternalConfigError::Type { .. } => ConfigError::ParseError(err.to_string()),
        })?;

        let lanai_config: LanaiConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        lanai_config.validate()?;
        Ok(lanai_config)
    }
}
