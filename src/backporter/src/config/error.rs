//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while validating backport inputs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required input was empty.
    #[error("input '{field}' is required")]
    Missing { field: &'static str },

    /// A pattern input is not a valid regular expression.
    #[error("failed to compile '{field}' regex: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Conflict handling is neither `abort` nor `draft`.
    #[error("expected input 'conflict_handling' to be either 'abort' or 'draft', got: '{value}'")]
    InvalidConflictHandling { value: String },
}
