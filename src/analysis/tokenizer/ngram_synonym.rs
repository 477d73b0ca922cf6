//! N-gram tokenizer with synonym splicing.
//!
//! Plain character n-grams make substring search work but break exact
//! synonym matching; a synonym filter does the opposite. This tokenizer does
//! both in one pass: it splits the input into delimiter separated blocks,
//! finds dictionary phrases in each block by longest match, and interleaves
//! n-grams with the matched phrases (and their synonyms) at the right
//! offsets and position increments.
//!
//! ```text
//! "abcd" with synonym group b,bb (n = 2)
//!
//!   a    0..1  +1
//!   b    1..2  +1
//!   bb   1..2  +0
//!   c    2..3  +1   boundary gram after the match
//!   cd   2..4  +0
//! ```
//!
//! # Examples
//!
//! ```
//! use ngram_synonym::analysis::tokenizer::ngram_synonym::{
//!     NGramSynonymConfig, NGramSynonymTokenizerFactory,
//! };
//!
//! let config = NGramSynonymConfig::default().with_synonyms(vec!["b,bb".to_string()]);
//! let factory = NGramSynonymTokenizerFactory::new(config).unwrap();
//!
//! let tokens: Vec<String> = factory
//!     .create("abcd".as_bytes())
//!     .map(|token| {
//!         let token = token.unwrap();
//!         format!("{},{},{},{}", token.text, token.start_offset, token.end_offset, token.position_increment)
//!     })
//!     .collect();
//!
//! assert_eq!(tokens, vec!["a,0,1,1", "b,1,2,1", "bb,1,2,0", "c,2,3,1", "cd,2,4,0"]);
//! ```

use std::io::Read;
use std::sync::Arc;
use std::time::SystemTime;

use log::{debug, warn};

use crate::analysis::synonym::loader::SynonymLoader;
use crate::analysis::synonym::map::SynonymMap;
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

pub mod config;
pub mod scheduler;
pub mod segmenter;

pub use config::NGramSynonymConfig;
pub use scheduler::{Candidate, TokenScheduler};
pub use segmenter::{BUFFER_SIZE, Block, BlockSegmenter, Delimiters};

/// Streaming n-gram synonym tokenizer over a byte reader.
///
/// Created by [`NGramSynonymTokenizerFactory::create`]. Tokens are pulled
/// with [`next_token`](Self::next_token) or through the `Iterator` impl.
pub struct NGramSynonymTokenizer<R> {
    segmenter: BlockSegmenter<R>,
    scheduler: TokenScheduler,
    loader: Option<Arc<SynonymLoader>>,
    synonym_map: Option<Arc<SynonymMap>>,
    last_modified: SystemTime,
    /// Position of the last emitted token
    position: Option<usize>,
    final_offset: usize,
}

impl<R: Read> NGramSynonymTokenizer<R> {
    /// Create a tokenizer bound to a fixed dictionary.
    pub fn new(
        reader: R,
        n: usize,
        delimiters: Delimiters,
        expand: bool,
        synonym_map: Option<Arc<SynonymMap>>,
    ) -> Self {
        NGramSynonymTokenizer {
            segmenter: BlockSegmenter::new(reader, delimiters),
            scheduler: TokenScheduler::new(n, expand),
            loader: None,
            synonym_map,
            last_modified: SystemTime::now(),
            position: None,
            final_offset: 0,
        }
    }

    /// Create a tokenizer that follows the dictionary published by `loader`.
    pub fn with_loader(
        reader: R,
        n: usize,
        delimiters: Delimiters,
        expand: bool,
        loader: Arc<SynonymLoader>,
    ) -> Self {
        let snapshot = loader.snapshot();
        let mut tokenizer = Self::new(
            reader,
            n,
            delimiters,
            expand,
            snapshot.synonym_map().cloned(),
        );
        tokenizer.last_modified = snapshot.last_modified();
        tokenizer.loader = Some(loader);
        tokenizer
    }

    /// Replace the internal character buffer size (mostly useful for tests).
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        let delimiters = self.segmenter.delimiters().clone();
        let reader = self.segmenter.into_reader();
        self.segmenter = BlockSegmenter::with_buffer_size(reader, delimiters, buffer_size);
        self
    }

    /// The next token, or `None` at end of stream.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            if let Some(candidate) = self.scheduler.next_unique() {
                // The first token sits at position 0 whatever its increment.
                let position = self
                    .position
                    .map_or(0, |previous| previous + candidate.position_increment);
                self.position = Some(position);
                self.final_offset = candidate.end;

                let token = Token::with_offsets(
                    candidate.word,
                    position,
                    candidate.start,
                    candidate.end,
                )
                .with_position_increment(candidate.position_increment)
                .with_token_type(candidate.token_type);
                return Ok(Some(token));
            }

            let Some(block) = self.segmenter.next_block()? else {
                return Ok(None);
            };

            let matches = match &self.synonym_map {
                Some(map) => map.find_matches(&block.text),
                None => Vec::new(),
            };
            debug!(
                "block at {}: {} chars, {} synonym matches",
                block.start_offset,
                block.len(),
                matches.len()
            );
            self.scheduler.schedule(&block, &matches);
        }
    }

    /// Final offset: end of the last emitted token, clamped to the number of
    /// characters read.
    pub fn end(&self) -> usize {
        self.final_offset.min(self.segmenter.consumed())
    }

    /// Start tokenizing a new stream.
    ///
    /// A reloadable dictionary is checked here and the tokenizer rebinds to
    /// the new snapshot when it changed.
    pub fn reset(&mut self, reader: R) {
        self.segmenter.reset(reader);
        self.scheduler.clear();
        self.position = None;
        self.final_offset = 0;
        self.refresh_synonyms();
    }

    /// Rebind to the loader's snapshot if the dictionary was reloaded.
    fn refresh_synonyms(&mut self) {
        let Some(loader) = &self.loader else {
            return;
        };

        if loader.is_reloadable() && loader.check_reload(self.last_modified) {
            let snapshot = loader.snapshot();
            self.synonym_map = snapshot.synonym_map().cloned();
            self.last_modified = snapshot.last_modified();
            debug!("tokenizer rebound to synonyms modified at {:?}", self.last_modified);
        }
    }

    /// The dictionary this tokenizer currently matches against.
    pub fn synonym_map(&self) -> Option<&Arc<SynonymMap>> {
        self.synonym_map.as_ref()
    }
}

impl<R: Read> Iterator for NGramSynonymTokenizer<R> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Builds [`NGramSynonymTokenizer`]s that share one dictionary loader.
#[derive(Debug, Clone)]
pub struct NGramSynonymTokenizerFactory {
    config: NGramSynonymConfig,
    delimiters: Delimiters,
    loader: Arc<SynonymLoader>,
}

impl NGramSynonymTokenizerFactory {
    /// Validate `config` and load the dictionary.
    pub fn new(config: NGramSynonymConfig) -> Result<Self> {
        config.validate()?;

        let loader = SynonymLoader::new(config.loader.clone(), config.expand, config.ignore_case)?;
        if loader.snapshot().is_empty() {
            if config.loader.synonyms.is_some() {
                warn!("synonyms values are empty.");
            } else if let Some(path) = &config.loader.synonyms_path {
                warn!("synonyms_path[{}] is empty.", path.display());
            } else {
                debug!("No synonym data.");
            }
        }

        Ok(NGramSynonymTokenizerFactory {
            delimiters: config.delimiter_set(),
            config,
            loader: Arc::new(loader),
        })
    }

    /// Create a tokenizer over `reader`.
    pub fn create<R: Read>(&self, reader: R) -> NGramSynonymTokenizer<R> {
        let mut tokenizer = NGramSynonymTokenizer::with_loader(
            reader,
            self.config.n,
            self.delimiters.clone(),
            self.config.expand,
            Arc::clone(&self.loader),
        );
        tokenizer.refresh_synonyms();
        tokenizer
    }

    pub fn config(&self) -> &NGramSynonymConfig {
        &self.config
    }

    /// The dictionary loader shared by every tokenizer of this factory.
    pub fn loader(&self) -> &Arc<SynonymLoader> {
        &self.loader
    }
}

impl Tokenizer for NGramSynonymTokenizerFactory {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens = self
            .create(text.as_bytes())
            .collect::<Result<Vec<Token>>>()?;
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram_synonym"
    }
}
