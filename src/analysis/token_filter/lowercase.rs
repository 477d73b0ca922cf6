//! Lowercase filter implementation.
//!
//! Case folding here is done one code point at a time with
//! [`char::to_lowercase`], so folding a string and folding its characters
//! one by one always agree. The synonym automaton relies on that: keys are
//! folded as whole strings when the dictionary is built, input is folded
//! character by character while matching.
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::token_filter::lowercase::fold_case;
//!
//! assert_eq!(fold_case("ＡBc"), "ａbc");
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Lowercase `text` code point by code point.
pub fn fold_case(text: &str) -> String {
    if text.is_ascii() {
        return text.to_ascii_lowercase();
    }
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Lowercase a slice of code points into `out`.
pub fn fold_chars_into(chars: &[char], out: &mut String) {
    out.clear();
    out.extend(chars.iter().flat_map(|c| c.to_lowercase()));
}

/// A filter that converts tokens to lowercase.
///
/// Positions and offsets are left untouched.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|token| {
            let folded = fold_case(&token.text);
            token.with_text(folded)
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
