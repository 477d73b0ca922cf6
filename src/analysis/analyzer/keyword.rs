//! Keyword analyzer that treats the entire input as a single token.
//!
//! Synonym rule terms go through this analyzer before they become
//! dictionary keys, so a phrase such as `machine learning` stays one key and
//! `ignore_case` dictionaries store lowercased keys.
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::analyzer::Analyzer;
//! use ngram_synonym::analysis::analyzer::keyword::KeywordAnalyzer;
//!
//! let analyzer = KeywordAnalyzer::with_ignore_case(true);
//! let tokens: Vec<_> = analyzer.analyze("User-123-ABC").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].text, "user-123-abc");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::keyword::KeywordTokenizer;
use crate::error::Result;

/// A keyword analyzer, optionally lowercasing its single token.
pub struct KeywordAnalyzer {
    inner: PipelineAnalyzer,
    ignore_case: bool,
}

impl KeywordAnalyzer {
    /// Create a new case preserving keyword analyzer.
    pub fn new() -> Self {
        Self::with_ignore_case(false)
    }

    /// Create a keyword analyzer that lowercases when `ignore_case` is set.
    pub fn with_ignore_case(ignore_case: bool) -> Self {
        let mut inner = PipelineAnalyzer::new(Arc::new(KeywordTokenizer::new()));
        if ignore_case {
            inner = inner.add_filter(Arc::new(LowercaseFilter::new()));
        }

        KeywordAnalyzer { inner, ignore_case }
    }

    /// Whether this analyzer lowercases its input.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

impl std::fmt::Debug for KeywordAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordAnalyzer")
            .field("inner", &self.inner)
            .field("ignore_case", &self.ignore_case)
            .finish()
    }
}
