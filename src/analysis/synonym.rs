//! Synonym dictionary support for the n-gram synonym tokenizer.
//!
//! # Components
//!
//! - [`map`] - FST-backed dictionary with longest-match lookup
//! - [`parser`] - Solr and WordNet rule grammars
//! - [`loader`] - Dictionary ownership and polled hot reload
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::synonym::{SynonymLoader, SynonymLoaderConfig};
//!
//! let config = SynonymLoaderConfig {
//!     synonyms: Some(vec!["quick,fast,rapid".to_string()]),
//!     ..Default::default()
//! };
//! let loader = SynonymLoader::new(config, true, true).unwrap();
//!
//! let map = loader.synonym_map().unwrap();
//! assert_eq!(map.get("Fast").unwrap(), ["quick", "fast", "rapid"]);
//! ```

pub mod loader;
pub mod map;
pub mod parser;

pub use loader::{SynonymLoader, SynonymLoaderConfig, SynonymSnapshot};
pub use map::{SynonymMap, SynonymMapBuilder, SynonymMatch};
pub use parser::{SynonymFormat, SynonymParser, parse_rules, parse_rules_with};
