//! Token types and utilities for text analysis.
//!
//! This module defines the data structures for the tokens that flow out of
//! the tokenizers and through the filters.
//!
//! # Token Graphs
//!
//! Several tokens may occupy the same position. A `position_increment` of 0
//! places a token on the position of the previous one, which is how synonym
//! alternates and boundary grams are stacked:
//!
//! ```text
//! Input: "ab" with synonym group a,aa (n = 1)
//!
//!   a   (0..1, pos_inc=1)
//!   aa  (0..1, pos_inc=0)  ← same position as "a"
//!   b   (1..2, pos_inc=1)
//! ```
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::token::{Token, TokenType};
//!
//! let token = Token::with_offsets("world", 1, 6, 11).with_token_type(TokenType::Synonym);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 11);
//! assert_eq!(token.position_increment, 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
///
/// Offsets are counted in Unicode scalar values (code points) from the start
/// of the analyzed stream, not in bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The code point offset where this token starts
    pub start_offset: usize,

    /// The code point offset where this token ends (exclusive)
    pub end_offset: usize,

    /// Position increment from the previous token (default: 1).
    ///
    /// - 1: next position
    /// - 0: same position as the previous token (synonym alternates,
    ///   boundary grams)
    pub position_increment: usize,

    /// How many positions this token spans (default: 1).
    pub position_length: usize,

    /// What produced this token
    pub token_type: TokenType,
}

/// Token type classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Whole-word token (keyword style tokenizers)
    #[default]
    Word,
    /// Character n-gram, including the short boundary grams next to a synonym
    Gram,
    /// Dictionary match or one of its expansions
    Synonym,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token::with_offsets(text, position, 0, 0)
    }

    /// Create a new token with text, position, and character offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            position_increment: 1,
            position_length: 1,
            token_type: TokenType::default(),
        }
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    /// Set the position increment.
    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    /// Set the token type.
    pub fn with_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello", 0);
        assert_eq!(token.text, "hello");
        assert_eq!(token.position, 0);
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 0);
        assert_eq!(token.position_increment, 1);
        assert_eq!(token.token_type, TokenType::Word);
    }

    #[test]
    fn test_token_builders() {
        let token = Token::with_offsets("ロン", 3, 0, 2)
            .with_position_increment(0)
            .with_token_type(TokenType::Gram);

        assert_eq!(token.position, 3);
        assert_eq!(token.position_increment, 0);
        assert_eq!(token.token_type, TokenType::Gram);
        assert_eq!(token.with_text("ンウ").text, "ンウ");
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("hello", 0);
        assert_eq!(format!("{token}"), "hello");
    }

    #[test]
    fn test_token_type_serialization() {
        let json = serde_json::to_string(&TokenType::Synonym).unwrap();
        assert_eq!(json, "\"synonym\"");
    }
}
