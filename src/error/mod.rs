//! Error module for Lanai.
//!
//! The data structures carry their own error types; this module layers the
//! application-level error on top of them, together with a small reporting
//! framework used by the command line tool.

use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::data_structures::lanai_tree::LanaiTreeError;

pub mod config;

/// Result type alias used throughout Lanai.
pub type LanaiResult<T> = Result<T, LanaiError>;

/// Core error enum for Lanai.
#[derive(Error, Debug)]
pub enum LanaiError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by the tree or the pattern compiler.
    #[error("Tree error: {0}")]
    Tree(#[from] LanaiTreeError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

impl LanaiError {
    /// Process exit status for the command line tool.
    ///
    /// `2` for configuration problems, `3` for rejected keys or patterns,
    /// `4` for IO failures and `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Tree(_) => 3,
            Self::Io(_) => 4,
            Self::Serialization(_) | Self::Custom(_) => 1,
        }
    }

    /// Character offset of a pattern syntax error, if that is what this is.
    pub fn pattern_position(&self) -> Option<usize> {
        match self {
            Self::Tree(error) => error.position(),
            _ => None,
        }
    }
}

/// An error together with where it happened and what was being processed.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: LanaiError,

    /// The component where the error occurred.
    pub component: String,

    /// The input being processed, e.g. a pattern or a file name.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    ///
    /// # Arguments
    ///
    /// * `error` - The error that occurred
    /// * `component` - The component where the error occurred
    pub fn new<S: Into<String>>(error: LanaiError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
        }
    }

    /// Records the input that was being processed.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\n  {details}")?;
            if let Some(position) = self.error.pattern_position() {
                let column: String = details.chars().take(position).map(|_| ' ').collect();
                write!(f, "\n  {column}^")?;
            }
        }
        Ok(())
    }
}

/// Sink for reported errors.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// Reporter that logs errors through `tracing`.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl TracingErrorReporter {
    /// Creates a new tracing reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or_default(),
            position = context.error.pattern_position(),
            exit_code = context.error.exit_code(),
            "Error reported"
        );
    }
}

/// Dispatches error contexts to the configured reporter.
#[derive(Debug, Default)]
pub struct ErrorReporting {
    reporter: RwLock<Option<Arc<dyn ErrorReporter>>>,
}

impl ErrorReporting {
    /// Replaces the reporter.
    ///
    /// # Arguments
    ///
    /// * `reporter` - The error reporter to use
    pub fn set_reporter(&self, reporter: Arc<dyn ErrorReporter>) {
        match self.reporter.write() {
            Ok(mut guard) => *guard = Some(reporter),
            Err(poisoned) => *poisoned.into_inner() = Some(reporter),
        }
    }

    /// Report an error with context.
    ///
    /// Falls back to standard error when no reporter is configured.
    pub fn report(&self, context: ErrorContext) {
        let reporter = match self.reporter.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        match reporter {
            Some(reporter) => reporter.report(context),
            None => eprintln!("Error: {context}"),
        }
    }
}

static ERROR_REPORTING: Lazy<ErrorReporting> = Lazy::new(ErrorReporting::default);

/// Get the global error reporting instance.
pub fn get_error_reporting() -> &'static ErrorReporting {
    &ERROR_REPORTING
}

/// Set the global error reporter.
///
/// # Arguments
///
/// * `reporter` - The error reporter to use
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
    ERROR_REPORTING.set_reporter(reporter);
}
