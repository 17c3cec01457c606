//! Lanai - command line entrypoint.
//!
//! Loads a list of keys into a Lanai Tree and answers pattern and prefix
//! queries against it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lanai_lib::config::{ConfigLoader, LanaiConfig, LogConfig, DEFAULT_CONFIG_PATH, ENV_PREFIX};
use lanai_lib::data_structures::lanai_tree::{LanaiTree, LanaiTreeError, MatchMode, Pattern};
use lanai_lib::error::{
    get_error_reporting, set_error_reporter, ErrorContext, LanaiError, TracingErrorReporter,
};
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

/// Command line arguments for Lanai.
#[derive(Parser, Debug)]
#[clap(name = "lanai", version, author, about)]
struct Args {
    /// Path to configuration file, `config/lanai.toml` when present otherwise
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the keys matching a pattern
    Match {
        /// File with one key per line
        #[clap(short, long, value_parser)]
        keys: PathBuf,

        /// Match anywhere inside a key instead of the whole key
        #[clap(long)]
        contains: bool,

        /// Print the result as JSON
        #[clap(long)]
        json: bool,

        /// Pattern to match
        pattern: String,
    },

    /// Print the keys starting with a literal prefix
    Prefix {
        /// File with one key per line
        #[clap(short, long, value_parser)]
        keys: PathBuf,

        /// Print the result as JSON
        #[clap(long)]
        json: bool,

        /// Literal prefix
        prefix: String,
    },

    /// Compare a tree match against a full regex scan of the keys
    Compare {
        /// File with one key per line
        #[clap(short, long, value_parser)]
        keys: PathBuf,

        /// Match anywhere inside a key instead of the whole key
        #[clap(long)]
        contains: bool,

        /// Pattern to match
        pattern: String,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Query result as printed with `--json`.
#[derive(Debug, Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    mode: &'a str,
    count: usize,
    matches: &'a BTreeSet<String>,
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so query results on stdout stay machine readable.
fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_line_number(log.source_location)
        .with_file(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {e}"))
}

/// Reports an error through the global reporter and exits.
fn fail(error: LanaiError, component: &str, details: &str) -> ! {
    let code = error.exit_code();
    get_error_reporting().report(ErrorContext::new(error, component).with_details(details));
    process::exit(code)
}

/// Builds a tree from a keys file, skipping blank lines and duplicates.
fn load_keys(path: &Path, config: &LanaiConfig) -> anyhow::Result<LanaiTree<()>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keys file {}", path.display()))?;

    let mut tree = LanaiTree::with_config(config.tree_config());
    for (line, key) in contents.lines().enumerate() {
        if key.is_empty() {
            continue;
        }
        match tree.insert_key(key) {
            Ok(()) => {}
            Err(LanaiTreeError::DuplicateKey(key)) => {
                warn!(line = line + 1, key = %key, "Skipping duplicate key");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("{}:{}", path.display(), line + 1));
            }
        }
    }

    info!(
        keys = tree.len(),
        nodes = tree.node_count(),
        file = %path.display(),
        "Loaded keys"
    );
    Ok(tree)
}

fn print_matches(query: &str, mode: &str, matches: &BTreeSet<String>, json: bool) -> anyhow::Result<()> {
    if json {
        let output = QueryOutput {
            query,
            mode,
            count: matches.len(),
            matches,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for key in matches {
            println!("{key}");
        }
    }
    Ok(())
}

fn compile(pattern: &str, mode: MatchMode, config: &LanaiConfig) -> Pattern {
    Pattern::with_limit(pattern, mode, config.pattern.max_pattern_length)
        .unwrap_or_else(|e| fail(e.into(), "pattern", pattern))
}

fn compare(tree: &LanaiTree<()>, pattern: &Pattern) -> anyhow::Result<()> {
    let regex = Regex::new(pattern.to_regex())
        .map_err(|e| LanaiError::Custom(format!("Failed to build regex baseline: {e}")))?;

    let started = Instant::now();
    let from_tree = tree.match_compiled(pattern);
    let tree_elapsed = started.elapsed();

    let started = Instant::now();
    let from_scan: BTreeSet<String> = tree.keys().filter(|key| regex.is_match(key)).collect();
    let scan_elapsed = started.elapsed();

    println!(
        "tree: {} matches in {:?}\nscan: {} matches in {:?}",
        from_tree.len(),
        tree_elapsed,
        from_scan.len(),
        scan_elapsed
    );

    if from_tree != from_scan {
        for key in from_tree.symmetric_difference(&from_scan) {
            println!("differs: {key}");
        }
        fail(
            LanaiError::Custom("Tree match and regex scan disagree".to_string()),
            "compare",
            pattern.source(),
        );
    }
    info!(pattern = pattern.source(), "Tree match agrees with regex scan");
    Ok(())
}

fn gen_config(output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(LanaiError::Io)?;
    }

    let toml = toml::to_string_pretty(&LanaiConfig::default())
        .map_err(|e| LanaiError::Custom(format!("Failed to serialize config: {e}")))?;
    std::fs::write(output, toml).map_err(LanaiError::Io)?;

    info!("Default configuration written to {:?}", output);
    Ok(())
}

/// Main entry point for the application.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loader = ConfigLoader::discover(
        args.config.as_deref(),
        Path::new(DEFAULT_CONFIG_PATH),
        ENV_PREFIX,
    );
    let loaded = loader.load();
    let log = loaded
        .as_ref()
        .map(|config| config.log.clone())
        .unwrap_or_default();
    init_logging(&log)?;
    set_error_reporter(Arc::new(TracingErrorReporter::new()));

    if let Command::GenConfig { output } = &args.command {
        return gen_config(output);
    }

    let source = loader
        .config_path()
        .map_or_else(|| "defaults".to_string(), |path| path.display().to_string());
    let config = loaded.unwrap_or_else(|e| fail(e.into(), "config", &source));

    match args.command {
        Command::Match {
            keys,
            contains,
            json,
            pattern,
        } => {
            let tree = load_keys(&keys, &config)?;
            let mode = if contains {
                MatchMode::Contains
            } else {
                config.pattern.default_mode
            };
            let compiled = compile(&pattern, mode, &config);
            let matches = tree.match_compiled(&compiled);
            print_matches(&pattern, &mode.to_string(), &matches, json)
        }
        Command::Prefix { keys, json, prefix } => {
            let tree = load_keys(&keys, &config)?;
            let matches = tree.match_prefix(&prefix);
            print_matches(&prefix, "prefix", &matches, json)
        }
        Command::Compare {
            keys,
            contains,
            pattern,
        } => {
            let tree = load_keys(&keys, &config)?;
            let mode = if contains {
                MatchMode::Contains
            } else {
                MatchMode::Anchored
            };
            compare(&tree, &compile(&pattern, mode, &config))
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { .. } => Ok(()),
    }
}
