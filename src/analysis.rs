//! Text analysis module.
//!
//! Tokenizers break text into tokens, filters transform token streams and
//! analyzers chain the two. The synonym module holds the dictionary that the
//! n-gram synonym tokenizer consults while it tokenizes.

pub mod analyzer;
pub mod synonym;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
