//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::cli::args::{NgramSynonymArgs, OutputFormat};
use crate::error::Result;

/// Result structure for the analyze command.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tokens: Vec<Token>,
    pub final_offset: usize,
    pub synonym_entries: usize,
}

/// Result structure for the inspect command.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryInfo {
    pub source: String,
    pub format: String,
    pub expand: bool,
    pub ignore_case: bool,
    pub reloadable: bool,
    pub entries: usize,
    pub last_modified: String,
    pub lookups: Vec<LookupResult>,
    pub listing: Option<Vec<DictionaryEntry>>,
}

/// One `--lookup` answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub term: String,
    pub group: Option<Vec<String>>,
}

/// One dictionary key and its group.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub key: String,
    pub group: Vec<String>,
}

/// Results that know how to print themselves for humans.
pub trait HumanOutput {
    fn print_human(&self, args: &NgramSynonymArgs);
}

impl HumanOutput for AnalysisResult {
    fn print_human(&self, args: &NgramSynonymArgs) {
        for token in &self.tokens {
            if args.verbosity() > 1 {
                println!(
                    "{},{},{},{}\t[pos={} {:?}]",
                    token.text,
                    token.start_offset,
                    token.end_offset,
                    token.position_increment,
                    token.position,
                    token.token_type
                );
            } else {
                println!(
                    "{},{},{},{}",
                    token.text, token.start_offset, token.end_offset, token.position_increment
                );
            }
        }
        if args.verbosity() > 1 {
            println!();
            println!("tokens: {}", self.tokens.len());
            println!("final offset: {}", self.final_offset);
            println!("synonym entries: {}", self.synonym_entries);
        }
    }
}

impl HumanOutput for DictionaryInfo {
    fn print_human(&self, _args: &NgramSynonymArgs) {
        println!("Synonym Dictionary:");
        println!("═══════════════════");
        println!("source: {}", self.source);
        println!("format: {}", self.format);
        println!("expand: {}", self.expand);
        println!("ignore case: {}", self.ignore_case);
        println!("reloadable: {}", self.reloadable);
        println!("entries: {}", self.entries);
        println!("last modified: {}", self.last_modified);

        if !self.lookups.is_empty() {
            println!();
            for lookup in &self.lookups {
                match &lookup.group {
                    Some(group) => println!("{} => {}", lookup.term, group.join(", ")),
                    None => println!("{} => (no entry)", lookup.term),
                }
            }
        }

        if let Some(listing) = &self.listing {
            println!();
            for entry in listing {
                println!("{} => {}", entry.key, entry.group.join(", "));
            }
        }
    }
}

/// Output a result in the requested format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &NgramSynonymArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &NgramSynonymArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
