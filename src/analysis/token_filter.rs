//! Token filter implementations for token transformation.
//!
//! Filters transform the token stream produced by a tokenizer. Here they are
//! used to canonicalize synonym dictionary terms before the dictionary
//! automaton is built, and [`SynonymFilter`] applies a reloadable
//! dictionary to whole tokens.
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::token_filter::Filter;
//! use ngram_synonym::analysis::token_filter::lowercase::LowercaseFilter;
//! use ngram_synonym::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Hello", 0), Token::new("WORLD", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "hello");
//! assert_eq!(filtered[1].text, "world");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform a token stream.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod synonym;

pub use lowercase::LowercaseFilter;
pub use synonym::{SynonymFilter, SynonymFilterConfig};
