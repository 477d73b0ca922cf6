//! Command implementations for the ngram-synonym CLI.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::time::{Instant, SystemTime};

use chrono::{DateTime, SecondsFormat, Utc};
use log::info;

use crate::analysis::synonym::loader::SynonymLoader;
use crate::analysis::tokenizer::ngram_synonym::NGramSynonymTokenizerFactory;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: NgramSynonymArgs) -> Result<()> {
    match &args.command {
        Command::Analyze(analyze_args) => analyze(analyze_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

/// Tokenize text from an argument, a file, or stdin.
fn analyze(args: &AnalyzeArgs, cli_args: &NgramSynonymArgs) -> Result<()> {
    let config = args.options.to_config()?;
    let factory = NGramSynonymTokenizerFactory::new(config)?;

    let reader: Box<dyn Read> = match (&args.text, &args.input) {
        (Some(text), _) => Box::new(io::Cursor::new(text.clone().into_bytes())),
        (None, Some(path)) => Box::new(BufReader::new(File::open(path)?)),
        (None, None) => Box::new(io::stdin().lock()),
    };

    let start_time = Instant::now();
    let mut tokenizer = factory.create(reader);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    info!(
        "Tokenized into {} tokens in {:?}",
        tokens.len(),
        start_time.elapsed()
    );

    let synonym_entries = factory.loader().synonym_map().map_or(0, |map| map.len());
    output_result(
        "Token stream (text,start,end,position_increment):",
        &AnalysisResult {
            final_offset: tokenizer.end(),
            tokens,
            synonym_entries,
        },
        cli_args,
    )
}

/// Load a dictionary and report on it.
fn inspect(args: &InspectArgs, cli_args: &NgramSynonymArgs) -> Result<()> {
    let config = args.options.to_config()?;
    config.validate()?;

    let loader = SynonymLoader::new(config.loader.clone(), config.expand, config.ignore_case)?;
    let snapshot = loader.snapshot();
    let map = snapshot.synonym_map();

    let lookups: Vec<LookupResult> = args
        .lookup
        .iter()
        .map(|term| LookupResult {
            term: term.clone(),
            group: map.and_then(|map| map.get(term)).map(<[String]>::to_vec),
        })
        .collect();

    let listing = if args.list {
        Some(
            map.map(|map| {
                map.entries()
                    .into_iter()
                    .map(|(key, group)| DictionaryEntry {
                        key,
                        group: group.to_vec(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default(),
        )
    } else {
        None
    };

    output_result(
        "Synonym dictionary loaded",
        &DictionaryInfo {
            source: loader.describe_source(),
            format: config.loader.format.to_string(),
            expand: config.expand,
            ignore_case: config.ignore_case,
            reloadable: loader.is_reloadable(),
            entries: map.map_or(0, |map| map.len()),
            last_modified: format_time(snapshot.last_modified()),
            lookups,
            listing,
        },
        cli_args,
    )
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}
