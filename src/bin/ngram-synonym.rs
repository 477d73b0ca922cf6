//! ngram-synonym CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use ngram_synonym::cli::args::NgramSynonymArgs;
use ngram_synonym::cli::commands::execute_command;

fn main() {
    let args = NgramSynonymArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error, // --quiet
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
