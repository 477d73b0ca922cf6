//! Synonym rule parsers.
//!
//! Rule text is turned into `input -> output` pairs on a
//! [`SynonymMapBuilder`]. Every term is canonicalized through an
//! [`Analyzer`] first, so dictionary keys are folded exactly the way the
//! tokenizer folds its input.
//!
//! # Supported Formats
//!
//! - [`SynonymFormat::Solr`] - `a,b,c` equivalence lines and `a,b => c`
//!   explicit mappings
//! - [`SynonymFormat::Wordnet`] - WordNet prolog `s(...)` facts
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::synonym::parser::{SynonymFormat, parse_rules};
//!
//! let map = parse_rules("Big,Large\nsmall => tiny", SynonymFormat::Solr, true, true)
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(map.get("big").unwrap(), ["big", "large"]);
//! assert_eq!(map.get("small").unwrap(), ["tiny"]);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::synonym::map::{SynonymMap, SynonymMapBuilder};
use crate::error::{NgramSynonymError, Result};

pub mod solr;
pub mod wordnet;

pub use solr::SolrSynonymParser;
pub use wordnet::WordnetSynonymParser;

/// Grammar of a synonym source.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SynonymFormat {
    #[default]
    Solr,
    Wordnet,
}

impl SynonymFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynonymFormat::Solr => "solr",
            SynonymFormat::Wordnet => "wordnet",
        }
    }

    /// Create the parser for this format.
    pub fn parser(&self, expand: bool, analyzer: Arc<dyn Analyzer>) -> Result<Box<dyn SynonymParser>> {
        Ok(match self {
            SynonymFormat::Solr => Box::new(SolrSynonymParser::new(expand, analyzer)),
            SynonymFormat::Wordnet => Box::new(WordnetSynonymParser::new(expand, analyzer)?),
        })
    }
}

impl FromStr for SynonymFormat {
    type Err = NgramSynonymError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "solr" => Ok(SynonymFormat::Solr),
            "wordnet" => Ok(SynonymFormat::Wordnet),
            other => Err(NgramSynonymError::invalid_config(format!(
                "unknown synonym format '{other}' (expected 'solr' or 'wordnet')"
            ))),
        }
    }
}

impl fmt::Display for SynonymFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for parsers that feed rule text into a map builder.
pub trait SynonymParser: Send + Sync {
    /// Parse `rules` and add every mapping they describe to `builder`.
    fn parse(&self, rules: &str, builder: &mut SynonymMapBuilder) -> Result<()>;

    /// Get the name of this parser (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Canonicalize one rule term.
///
/// The analyzed tokens are joined with a single space. A term the analyzer
/// reduces to nothing cannot be matched and is rejected.
pub fn analyze_term(analyzer: &dyn Analyzer, term: &str) -> Result<String> {
    let mut analyzed = String::new();
    for token in analyzer.analyze(term)? {
        if token.text.is_empty() {
            continue;
        }
        if !analyzed.is_empty() {
            analyzed.push(' ');
        }
        analyzed.push_str(&token.text);
    }

    if analyzed.is_empty() {
        return Err(NgramSynonymError::parse(format!(
            "term '{term}' was completely eliminated by analyzer"
        )));
    }
    Ok(analyzed)
}

/// Parse rule text into a synonym map using a keyword analyzer.
///
/// Returns `Ok(None)` when the rules contain no mappings.
pub fn parse_rules(
    rules: &str,
    format: SynonymFormat,
    expand: bool,
    ignore_case: bool,
) -> Result<Option<SynonymMap>> {
    let analyzer: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::with_ignore_case(ignore_case));
    parse_rules_with(rules, format, expand, ignore_case, analyzer)
}

/// Parse rule text, canonicalizing terms with `analyzer`.
pub fn parse_rules_with(
    rules: &str,
    format: SynonymFormat,
    expand: bool,
    ignore_case: bool,
    analyzer: Arc<dyn Analyzer>,
) -> Result<Option<SynonymMap>> {
    let parser = format.parser(expand, analyzer)?;

    let mut builder = SynonymMapBuilder::new(ignore_case);
    parser.parse(rules, &mut builder)?;
    builder.build()
}
