//! Keyword tokenizer: the whole input is one token.
//!
//! Synonym rule terms are canonicalized with it, so a multi-word term such
//! as `"new york"` stays a single dictionary key.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Emits the entire input as one [`TokenType::Word`](crate::analysis::token::TokenType::Word)
/// token spanning every code point. Empty input yields no token.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordTokenizer;

impl KeywordTokenizer {
    pub fn new() -> Self {
        KeywordTokenizer
    }
}

impl Tokenizer for KeywordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let token = (!text.is_empty())
            .then(|| Token::with_offsets(text, 0, 0, text.chars().count()));
        Ok(Box::new(token.into_iter()))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
