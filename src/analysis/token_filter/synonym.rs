//! Synonym filter over an existing token stream.
//!
//! Where the n-gram synonym tokenizer matches dictionary entries inside raw
//! text, this filter matches them against whole tokens produced by an
//! upstream tokenizer. A match of one or more tokens is replaced by the
//! terms of its group: the first term takes the position of the first
//! matched token, the others are stacked on it with increment 0.
//!
//! ```text
//! "the big cat" with group big,large
//!
//!   the    +1
//!   big    +1
//!   large  +0
//!   cat    +1
//! ```
//!
//! The dictionary comes from a shared [`SynonymLoader`], so a reloadable
//! rule file is picked up at the start of the next stream.
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::token::Token;
//! use ngram_synonym::analysis::token_filter::Filter;
//! use ngram_synonym::analysis::token_filter::synonym::{SynonymFilter, SynonymFilterConfig};
//!
//! let config = SynonymFilterConfig::default().with_synonyms(vec!["big,large".to_string()]);
//! let filter = SynonymFilter::new(config).unwrap();
//!
//! let tokens = vec![Token::new("big", 0), Token::new("cat", 1)];
//! let words: Vec<String> = filter
//!     .filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(words, vec!["big", "large", "cat"]);
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::synonym::loader::{SynonymLoader, SynonymLoaderConfig};
use crate::analysis::synonym::map::SynonymMap;
use crate::analysis::synonym::parser::SynonymFormat;
use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::keyword::KeywordTokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::{NgramSynonymError, Result};

/// Tokenizer used to split rule terms into dictionary keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermTokenizer {
    /// Multi-word terms become space joined keys
    #[default]
    Whitespace,
    /// Each term is one key as written
    Keyword,
}

impl TermTokenizer {
    pub fn tokenizer(&self) -> Arc<dyn Tokenizer> {
        match self {
            TermTokenizer::Whitespace => Arc::new(WhitespaceTokenizer::new()),
            TermTokenizer::Keyword => Arc::new(KeywordTokenizer::new()),
        }
    }
}

/// Settings for [`SynonymFilter`].
///
/// Unlike the tokenizer, `ignore_case` defaults to false and a dictionary
/// source is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymFilterConfig {
    /// Emit every term of a matched group instead of its first term only.
    pub expand: bool,

    /// Case fold dictionary keys and tokens while matching.
    pub ignore_case: bool,

    /// How rule terms are split.
    pub tokenizer: TermTokenizer,

    /// Dictionary source.
    #[serde(flatten)]
    pub loader: SynonymLoaderConfig,
}

impl Default for SynonymFilterConfig {
    fn default() -> Self {
        SynonymFilterConfig {
            expand: true,
            ignore_case: false,
            tokenizer: TermTokenizer::default(),
            loader: SynonymLoaderConfig::default(),
        }
    }
}

impl SynonymFilterConfig {
    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TermTokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Use inline rule lines as the dictionary source.
    pub fn with_synonyms(mut self, rules: Vec<String>) -> Self {
        self.loader.synonyms = Some(rules);
        self
    }

    /// Use a rule file as the dictionary source.
    pub fn with_synonyms_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.loader.synonyms_path = Some(path.into());
        self
    }

    pub fn with_format(mut self, format: SynonymFormat) -> Self {
        self.loader.format = format;
        self
    }

    pub fn with_dynamic_reload(mut self, dynamic_reload: bool) -> Self {
        self.loader.dynamic_reload = dynamic_reload;
        self
    }

    pub fn with_reload_interval(mut self, interval: Duration) -> Self {
        self.loader.reload_interval = interval;
        self
    }

    /// A filter without any configured source is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.loader.synonyms.is_none() && self.loader.synonyms_path.is_none() {
            return Err(NgramSynonymError::invalid_config(
                "synonym filter requires either `synonyms` or `synonyms_path` to be configured",
            ));
        }
        Ok(())
    }

    /// The analyzer that canonicalizes rule terms.
    pub fn term_analyzer(&self) -> Arc<dyn Analyzer> {
        let mut analyzer = PipelineAnalyzer::new(self.tokenizer.tokenizer());
        if self.ignore_case {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        Arc::new(analyzer.with_name("synonym_terms"))
    }
}

/// Replaces dictionary matches in a token stream with their synonym groups.
pub struct SynonymFilter {
    loader: Arc<SynonymLoader>,
}

impl SynonymFilter {
    /// Validate `config` and load its dictionary.
    pub fn new(config: SynonymFilterConfig) -> Result<Self> {
        config.validate()?;

        let loader = SynonymLoader::with_analyzer(
            config.loader.clone(),
            config.expand,
            config.ignore_case,
            config.term_analyzer(),
        )?;
        if loader.snapshot().is_empty() {
            if config.loader.synonyms.is_some() {
                warn!("synonyms values are empty.");
            } else if let Some(path) = &config.loader.synonyms_path {
                warn!("synonyms_path[{}] is empty.", path.display());
            }
        }

        Ok(Self::with_loader(Arc::new(loader)))
    }

    /// Create a filter over an existing loader.
    pub fn with_loader(loader: Arc<SynonymLoader>) -> Self {
        SynonymFilter { loader }
    }

    pub fn loader(&self) -> &Arc<SynonymLoader> {
        &self.loader
    }

    /// The dictionary for the next stream, reloading it first when due.
    fn current_map(&self) -> Option<Arc<SynonymMap>> {
        if self.loader.is_reloadable() {
            let known = self.loader.last_modified();
            if self.loader.check_reload(known) {
                debug!("synonym filter switched to {}", self.loader.describe_source());
            }
        }
        self.loader.synonym_map()
    }
}

/// Replace the longest matches in `input` by their groups.
fn splice(map: &SynonymMap, input: Vec<Token>) -> Vec<Token> {
    let texts: Vec<&str> = input.iter().map(|t| t.text.as_str()).collect();
    let mut output = Vec::with_capacity(input.len());
    // Positions swallowed by the last multi-token match.
    let mut carry = 0;
    let mut i = 0;

    while i < input.len() {
        let Some((count, group)) = map.longest_phrase_match(&texts[i..]) else {
            let token = input[i].clone();
            let increment = token.position_increment + carry;
            output.push(token.with_position_increment(increment));
            carry = 0;
            i += 1;
            continue;
        };

        let first = &input[i];
        let last = &input[i + count - 1];
        let span = last.position.saturating_sub(first.position);

        for (k, term) in group.iter().enumerate() {
            let increment = if k == 0 {
                first.position_increment + carry
            } else {
                0
            };
            let mut token = Token::with_offsets(
                term.clone(),
                first.position,
                first.start_offset,
                last.end_offset,
            )
            .with_position_increment(increment)
            .with_token_type(TokenType::Synonym);
            token.position_length = span + 1;
            output.push(token);
        }

        carry = span;
        i += count;
    }

    output
}

impl Filter for SynonymFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let Some(map) = self.current_map() else {
            return Ok(tokens);
        };

        let output = splice(&map, tokens.collect());
        Ok(Box::new(output.into_iter()))
    }

    fn name(&self) -> &'static str {
        "synonym"
    }
}

impl std::fmt::Debug for SynonymFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynonymFilter")
            .field("loader", &self.loader)
            .finish()
    }
}
