//! # ngram-synonym
//!
//! A character n-gram tokenizer that splices dictionary synonyms into the
//! gram stream.
//!
//! ## Features
//!
//! - Fixed-size character n-grams over delimiter separated blocks
//! - Longest-match synonym lookup backed by an FST
//! - Short boundary grams so queries that straddle a synonym still match
//! - Solr and WordNet rule formats
//! - Dictionaries reloaded from disk while tokenizers keep running
//!
//! ## Example
//!
//! ```
//! use ngram_synonym::analysis::tokenizer::ngram_synonym::{
//!     NGramSynonymConfig, NGramSynonymTokenizerFactory,
//! };
//!
//! let config = NGramSynonymConfig::default()
//!     .with_n(2)
//!     .with_synonyms(vec!["a,aa".to_string()]);
//! let factory = NGramSynonymTokenizerFactory::new(config).unwrap();
//!
//! let words: Vec<String> = factory
//!     .create("ab".as_bytes())
//!     .map(|token| token.unwrap().text)
//!     .collect();
//! assert_eq!(words, vec!["a", "aa", "b"]);
//! ```

pub mod analysis;
pub mod cli;
pub mod error;

pub mod prelude {
    pub use crate::analysis::synonym::{SynonymFormat, SynonymLoader, SynonymMap};
    pub use crate::analysis::token::{Token, TokenType};
    pub use crate::analysis::token_filter::{Filter, SynonymFilter, SynonymFilterConfig};
    pub use crate::analysis::tokenizer::ngram_synonym::{
        NGramSynonymConfig, NGramSynonymTokenizer, NGramSynonymTokenizerFactory,
    };
    pub use crate::error::{NgramSynonymError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
