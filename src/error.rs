//! Error types for the ngram-synonym library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`NgramSynonymError`] enum.
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::error::{NgramSynonymError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NgramSynonymError::invalid_config("n must be at least 1"))
//! }
//!
//! assert!(example_operation().is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for tokenizer and dictionary operations.
#[derive(Error, Debug)]
pub enum NgramSynonymError {
    /// I/O errors (reading the input stream or a dictionary file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid tokenizer or loader configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Malformed synonym rules
    #[error("Parse error: {0}")]
    Parse(String),

    /// Dictionary construction or loading errors
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors raised while building the synonym FST
    #[error("FST error: {0}")]
    Fst(#[from] fst::Error),
}

/// Result type alias for operations that may fail with NgramSynonymError.
pub type Result<T> = std::result::Result<T, NgramSynonymError>;

impl NgramSynonymError {
    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        NgramSynonymError::Config(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        NgramSynonymError::Parse(msg.into())
    }

    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        NgramSynonymError::Dictionary(msg.into())
    }
}
