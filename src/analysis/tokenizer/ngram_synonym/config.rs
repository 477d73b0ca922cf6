//! Configuration for the n-gram synonym tokenizer.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::synonym::loader::SynonymLoaderConfig;
use crate::analysis::synonym::parser::SynonymFormat;
use crate::analysis::tokenizer::ngram_synonym::segmenter::Delimiters;
use crate::error::{NgramSynonymError, Result};

/// Default n-gram size.
pub const DEFAULT_N: usize = 2;

/// Default block delimiters: space, ideographic space, tab, LF, CR.
pub const DEFAULT_DELIMITERS: &str = " \u{3000}\t\n\r";

/// Settings for [`NGramSynonymTokenizerFactory`](super::NGramSynonymTokenizerFactory).
///
/// Dictionary source options are flattened in, so a JSON config reads:
///
/// ```json
/// { "n": 2, "expand": true, "synonyms_path": "synonyms.txt", "dynamic_reload": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NGramSynonymConfig {
    /// N-gram size.
    pub n: usize,

    /// Characters that terminate a block.
    pub delimiters: String,

    /// Emit every term of a matched group instead of the matched text only.
    pub expand: bool,

    /// Case fold dictionary keys and input while matching.
    pub ignore_case: bool,

    /// Dictionary source.
    #[serde(flatten)]
    pub loader: SynonymLoaderConfig,
}

impl Default for NGramSynonymConfig {
    fn default() -> Self {
        NGramSynonymConfig {
            n: DEFAULT_N,
            delimiters: DEFAULT_DELIMITERS.to_string(),
            expand: true,
            ignore_case: true,
            loader: SynonymLoaderConfig::default(),
        }
    }
}

impl NGramSynonymConfig {
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_delimiters<S: Into<String>>(mut self, delimiters: S) -> Self {
        self.delimiters = delimiters.into();
        self
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
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

    pub fn with_config_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.loader.config_dir = Some(dir.into());
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

    /// Check the settings that cannot be fixed up at tokenization time.
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(NgramSynonymError::invalid_config("n must be at least 1"));
        }
        if self.delimiters.is_empty() {
            return Err(NgramSynonymError::invalid_config(
                "delimiters must contain at least one character",
            ));
        }
        Ok(())
    }

    /// The delimiter set used by the block segmenter.
    pub fn delimiter_set(&self) -> Delimiters {
        Delimiters::new(&self.delimiters)
    }

    /// Parse a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file. A relative `synonyms_path` without an
    /// explicit `config_dir` resolves against the config file's directory.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            NgramSynonymError::invalid_config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_json_str(&content)?;
        if config.loader.config_dir.is_none() {
            config.loader.config_dir = path.parent().map(Path::to_path_buf);
        }
        Ok(config)
    }
}
