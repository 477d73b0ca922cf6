//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step in the analysis pipeline: they break input
//! text into tokens.
//!
//! # Available Tokenizers
//!
//! - [`ngram_synonym::NGramSynonymTokenizerFactory`] - Character n-grams with
//!   dictionary synonyms spliced in at their offsets
//! - [`whitespace::WhitespaceTokenizer`] - Splits on Unicode whitespace
//! - [`keyword::KeywordTokenizer`] - Treats the entire text as a single token
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::tokenizer::Tokenizer;
//! use ngram_synonym::analysis::tokenizer::keyword::KeywordTokenizer;
//!
//! let tokenizer = KeywordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 1);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so a configured tokenizer can be shared
/// between analysis threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod keyword;
pub mod ngram_synonym;
pub mod whitespace;

pub use ngram_synonym::{NGramSynonymTokenizer, NGramSynonymTokenizerFactory};
pub use keyword::KeywordTokenizer;
pub use whitespace::WhitespaceTokenizer;
