//! Split command: case-randomize, partition, and serialize the corpus.

use super::{ensure_dir, setup};
use crate::align::RuleTokenizer;
use crate::corpus::{case_randomize, distribution_report, split_corpus};
use crate::docpack::write_docpack;
use crate::io::read_labelled_dataset;
use crate::Result;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Split the labelled dataset and serialize each partition
#[derive(Parser, Debug)]
pub struct SplitArgs {
    /// Labelled dataset CSV (columns text,ents)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory for the three partitions and the report
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    /// Pipeline config file (JSON); defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the case-randomization pass
    #[arg(long)]
    pub no_case_transform: bool,
}

pub fn run(args: SplitArgs) -> Result<()> {
    let (config, mut rng) = setup(args.config.as_ref(), args.seed)?;
    ensure_dir(&args.out)?;

    let sentences = read_labelled_dataset(&args.input)?;
    let mut corpus = split_corpus(sentences, &config.split, &mut rng)?;

    // Case transform runs after splitting, right before serialization.
    if !args.no_case_transform {
        case_randomize(&mut corpus.train, &config.case, &mut rng)?;
        case_randomize(&mut corpus.dev, &config.case, &mut rng)?;
        case_randomize(&mut corpus.test, &config.case, &mut rng)?;
    }
    fs::write(
        args.out.join("label_distributions.txt"),
        distribution_report(&corpus),
    )?;

    let tokenizer = RuleTokenizer;
    for (name, split) in [
        ("train.ndpk", &corpus.train),
        ("dev.ndpk", &corpus.dev),
        ("test.ndpk", &corpus.test),
    ] {
        let summary = write_docpack(&args.out.join(name), split, &tokenizer)?;
        info!(
            file = name,
            documents = summary.documents,
            mentions = summary.mentions,
            align_failures = summary.align_failures.len(),
            "partition written"
        );
        if !summary.align_failures.is_empty() {
            println!(
                "{name}: {} mention(s) dropped at token alignment",
                summary.align_failures.len()
            );
        }
    }
    println!(
        "split {} sentences: {} train / {} dev / {} test",
        corpus.len(),
        corpus.train.len(),
        corpus.dev.len(),
        corpus.test.len()
    );
    Ok(())
}
