//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::synonym::parser::SynonymFormat;
use crate::analysis::tokenizer::ngram_synonym::NGramSynonymConfig;
use crate::error::Result;

/// ngram-synonym - character n-gram tokenizer with synonym splicing
#[derive(Parser, Debug, Clone)]
#[command(name = "ngram-synonym")]
#[command(about = "Character n-gram tokenizer that splices dictionary synonyms into the gram stream")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct NgramSynonymArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl NgramSynonymArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Tokenize text and print the token stream
    Analyze(AnalyzeArgs),

    /// Load a synonym dictionary and report on it
    Inspect(InspectArgs),
}

/// Tokenizer and dictionary options shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TokenizerOptions {
    /// JSON tokenizer config; the flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// N-gram size
    #[arg(short = 'n', long = "ngram")]
    pub n: Option<usize>,

    /// Block delimiter characters
    #[arg(long)]
    pub delimiters: Option<String>,

    /// Emit only the matched text instead of the whole synonym group
    #[arg(long)]
    pub no_expand: bool,

    /// Match synonyms case sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Inline synonym rule (repeatable)
    #[arg(short = 's', long = "synonym")]
    pub synonyms: Vec<String>,

    /// Synonym rule file
    #[arg(long)]
    pub synonyms_path: Option<PathBuf>,

    /// Grammar of the synonym rules
    #[arg(long)]
    pub synonym_format: Option<SynonymFormat>,
}

impl TokenizerOptions {
    /// Build the tokenizer config from the config file and flags.
    pub fn to_config(&self) -> Result<NGramSynonymConfig> {
        let mut config = match &self.config {
            Some(path) => NGramSynonymConfig::from_json_file(path)?,
            None => NGramSynonymConfig::default(),
        };

        if let Some(n) = self.n {
            config = config.with_n(n);
        }
        if let Some(delimiters) = &self.delimiters {
            config = config.with_delimiters(delimiters.clone());
        }
        if self.no_expand {
            config = config.with_expand(false);
        }
        if self.case_sensitive {
            config = config.with_ignore_case(false);
        }
        if !self.synonyms.is_empty() {
            config = config.with_synonyms(self.synonyms.clone());
        }
        if let Some(path) = &self.synonyms_path {
            config = config.with_synonyms_path(path.clone());
        }
        if let Some(format) = self.synonym_format {
            config = config.with_format(format);
        }

        Ok(config)
    }
}

/// Arguments for tokenizing text
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Text to tokenize (reads --input or stdin when omitted)
    pub text: Option<String>,

    /// File to tokenize
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub options: TokenizerOptions,
}

/// Arguments for inspecting a dictionary
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub options: TokenizerOptions,

    /// Look up a term in the dictionary (repeatable)
    #[arg(short, long)]
    pub lookup: Vec<String>,

    /// List every dictionary entry
    #[arg(long)]
    pub list: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
