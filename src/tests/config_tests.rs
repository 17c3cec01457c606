//! Tests for the configuration module.
//!
//! Covers loading from each supported file format, environment overrides and
//! validation.

use super::test_utils::TestFixture;
use crate::config::{ConfigLoader, LanaiConfig, Validate};
use crate::data_structures::lanai_tree::{LanaiTree, LanaiTreeError, MatchMode};
use crate::error::config::ConfigError;

/// Test that default configuration can be created and is valid.
#[test]
fn test_default_config_is_valid() {
    let config = LanaiConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.tree.max_key_length, 4096);
    assert_eq!(config.pattern.max_pattern_length, 1024);
    assert_eq!(config.pattern.default_mode, MatchMode::Anchored);
    assert_eq!(config.log.level, "info");
}

/// Test that configuration validation catches invalid values.
#[test]
fn test_config_validation() {
    let mut config = LanaiConfig::default();

    config.tree.max_key_length = 0;
    assert!(config.validate().is_err());

    config.tree.max_key_length = 16;
    config.pattern.max_pattern_length = 0;
    assert!(config.validate().is_err());

    config.pattern.max_pattern_length = 16;
    config.log.level = "verbose".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));

    config.log.level = "debug".to_string();
    assert!(config.validate().is_ok());
}

/// Test loading configuration from a TOML file.
#[test]
fn test_load_config_from_toml() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_file(
            r#"
            [tree]
            max_key_length = 64

            [pattern]
            default_mode = "contains"
            "#,
            ".toml",
        )
        .unwrap();

    let config = ConfigLoader::new(Some(&path), "TEST_TOML").load().unwrap();
    assert_eq!(config.tree.max_key_length, 64);
    assert_eq!(config.pattern.default_mode, MatchMode::Contains);

    // Unset values keep their defaults
    assert_eq!(config.pattern.max_pattern_length, 1024);
    assert!(!config.log.json);
}

/// Test loading configuration from JSON and YAML files.
#[test]
fn test_load_config_from_json_and_yaml() {
    let fixture = TestFixture::new().unwrap();

    let json = fixture
        .create_file(r#"{ "log": { "level": "debug", "json": true } }"#, ".json")
        .unwrap();
    let config = ConfigLoader::new(Some(&json), "TEST_JSON").load().unwrap();
    assert_eq!(config.log.level, "debug");
    assert!(config.log.json);

    let yaml = fixture
        .create_file("pattern:\n  max_pattern_length: 32\n", ".yaml")
        .unwrap();
    let config = ConfigLoader::new(Some(&yaml), "TEST_YAML").load().unwrap();
    assert_eq!(config.pattern.max_pattern_length, 32);
}

/// Test loading configuration with environment variable overrides.
#[test]
fn test_env_var_override() {
    let mut fixture = TestFixture::new().unwrap();
    let path = fixture
        .create_file("[tree]\nmax_key_length = 64\n", ".toml")
        .unwrap();

    fixture.set_env("TEST_ENV__TREE__MAX_KEY_LENGTH", "128");
    fixture.set_env("TEST_ENV__PATTERN__DEFAULT_MODE", "contains");

    let config = ConfigLoader::new(Some(&path), "TEST_ENV").load().unwrap();
    assert_eq!(config.tree.max_key_length, 128);
    assert_eq!(config.pattern.default_mode, MatchMode::Contains);
}

/// Test the failure modes of the loader.
#[test]
fn test_load_errors() {
    let fixture = TestFixture::new().unwrap();

    let missing = fixture.temp_dir.path().join("missing.toml");
    assert!(matches!(
        ConfigLoader::new(Some(&missing), "TEST_MISSING").load(),
        Err(ConfigError::FileNotFound(_))
    ));

    let malformed = fixture.create_file("[tree\nmax_key_length = ", ".toml").unwrap();
    assert!(matches!(
        ConfigLoader::new(Some(&malformed), "TEST_MALFORMED").load(),
        Err(ConfigError::ParseError(_))
    ));

    let unsupported = fixture.create_file("max_key_length=1", ".ini").unwrap();
    assert!(matches!(
        ConfigLoader::new(Some(&unsupported), "TEST_UNSUPPORTED").load(),
        Err(ConfigError::ParseError(_))
    ));

    let invalid = fixture
        .create_file("[tree]\nmax_key_length = 0\n", ".toml")
        .unwrap();
    assert!(matches!(
        ConfigLoader::new(Some(&invalid), "TEST_INVALID").load(),
        Err(ConfigError::ValueOutOfRange { .. })
    ));
}

/// Test that the loaded settings reach the tree.
#[test]
fn test_tree_config_applies_limits() {
    let mut config = LanaiConfig::default();
    config.tree.max_key_length = 3;
    config.pattern.max_pattern_length = 4;
    config.pattern.default_mode = MatchMode::Contains;

    let mut tree: LanaiTree<()> = LanaiTree::with_config(config.tree_config());
    tree.insert_key("abc").unwrap();
    assert!(matches!(
        tree.insert_key("abcd"),
        Err(LanaiTreeError::KeyTooLong { length: 4, max_length: 3 })
    ));

    // Contains mode by default
    assert_eq!(tree.match_pattern("b").unwrap().len(), 1);
    assert!(matches!(
        tree.match_pattern("a.b.c"),
        Err(LanaiTreeError::PatternTooLong { length: 5, max_length: 4 })
    ));
}

/// Test that a generated configuration file loads back unchanged.
#[test]
fn test_generated_config_round_trips() {
    let fixture = TestFixture::new().unwrap();
    let toml = toml::to_string_pretty(&LanaiConfig::default()).unwrap();
    let path = fixture.create_file(toml, ".toml").unwrap();

    let config = ConfigLoader::new(Some(&path), "TEST_GENERATED").load().unwrap();
    assert_eq!(config, LanaiConfig::default());
}

/// Test that the default file is used only when no path is given.
#[test]
fn test_discover_default_file() {
    let fixture = TestFixture::new().unwrap();
    let default = fixture
        .create_file("[pattern]\ndefault_mode = \"contains\"\n", ".toml")
        .unwrap();
    let explicit = fixture
        .create_file("[tree]\nmax_key_length = 8\n", ".toml")
        .unwrap();
    let absent = fixture.temp_dir.path().join("absent.toml");

    let loader = ConfigLoader::discover(None, &default, "TEST_DISCOVER");
    assert_eq!(loader.config_path(), Some(default.as_path()));
    let config = loader.load().unwrap();
    assert_eq!(config.pattern.default_mode, MatchMode::Contains);

    let loader = ConfigLoader::discover(Some(&explicit), &default, "TEST_DISCOVER");
    let config = loader.load().unwrap();
    assert_eq!(config.tree.max_key_length, 8);
    assert_eq!(config.pattern.default_mode, MatchMode::Anchored);

    let loader = ConfigLoader::discover(None, &absent, "TEST_DISCOVER");
    assert_eq!(loader.config_path(), None);
    assert_eq!(loader.load().unwrap(), LanaiConfig::default());
}
