//! nergen - synthetic Danish NER corpus builder.
//!
//! Pipeline: generate entity pools, compose example groups, reconcile
//! annotated sentences to char spans, split and serialize the corpus, and
//! bootstrap-evaluate a model on the held-out split.

use clap::Parser;
use nergen::cli::{self, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
