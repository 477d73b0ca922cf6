//! Pipeline analyzer that combines a tokenizer and filters.
//!
//! Processing order:
//! 1. Tokenizer: splits text into tokens
//! 2. Token Filters: applied sequentially in the order they were added
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use ngram_synonym::analysis::analyzer::Analyzer;
//! use ngram_synonym::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use ngram_synonym::analysis::token_filter::lowercase::LowercaseFilter;
//! use ngram_synonym::analysis::tokenizer::keyword::KeywordTokenizer;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(KeywordTokenizer::new()))
//!     .add_filter(Arc::new(LowercaseFilter::new()));
//!
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//! assert_eq!(tokens[0].text, "hello world");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Get the configured name of this analyzer.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;
    use crate::analysis::token_filter::lowercase::LowercaseFilter;
    use crate::analysis::tokenizer::ngram_synonym::{
        NGramSynonymConfig, NGramSynonymTokenizerFactory,
    };

    #[test]
    fn test_pipeline_with_ngram_synonym_tokenizer() {
        let config = NGramSynonymConfig::default().with_synonyms(vec!["abc,xyz".to_string()]);
        let factory = NGramSynonymTokenizerFactory::new(config).unwrap();
        let analyzer = PipelineAnalyzer::new(Arc::new(factory))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("ngram_synonym_lowercase");

        let tokens: Vec<Token> = analyzer.analyze("ABC").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[1].text, "xyz");
        assert_eq!(tokens[1].position_increment, 0);
        assert_eq!(analyzer.pipeline_name(), "ngram_synonym_lowercase");
    }

    #[test]
    fn test_pipeline_debug_lists_filters() {
        let analyzer = PipelineAnalyzer::new(Arc::new(
            crate::analysis::tokenizer::keyword::KeywordTokenizer::new(),
        ))
        .add_filter(Arc::new(LowercaseFilter::new()));

        let debug = format!("{analyzer:?}");
        assert!(debug.contains("keyword"));
        assert!(debug.contains("lowercase"));
    }
}
