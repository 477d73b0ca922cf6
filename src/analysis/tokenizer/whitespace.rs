//! Whitespace tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode whitespace.
///
/// Offsets are code points, matching the n-gram synonym tokenizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut word = String::new();
        let mut start = 0;

        for (offset, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    let position = tokens.len();
                    tokens.push(Token::with_offsets(
                        std::mem::take(&mut word),
                        position,
                        start,
                        offset,
                    ));
                }
            } else {
                if word.is_empty() {
                    start = offset;
                }
                word.push(c);
            }
        }
        if !word.is_empty() {
            let end = start + word.chars().count();
            let position = tokens.len();
            tokens.push(Token::with_offsets(word, position, start, end));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<Token> {
        WhitespaceTokenizer::new().tokenize(text).unwrap().collect()
    }

    #[test]
    fn test_whitespace_tokenizer() {
        let tokens = tokenize("  new york\tcity ");

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "york", "city"]);
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (6, 10));
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_ideographic_space_splits() {
        let tokens = tokenize("東京\u{3000}タワー");

        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (3, 6));
    }

    #[test]
    fn test_blank_input() {
        assert!(tokenize(" \t\n").is_empty());
    }
}
