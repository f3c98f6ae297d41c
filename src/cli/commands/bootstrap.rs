//! Bootstrap command: confidence intervals for exported predictions.
//!
//! Gold and predictions both arrive as document-collection files; a
//! prediction set exported by an external toolkit is matched to gold
//! sentences by text.

use super::{ensure_dir, setup};
use crate::docpack::read_docpack;
use crate::entity::{AnnotatedSentence, EntityMention};
use crate::eval::{bootstrap, write_iteration_csv, write_summary, Model};
use crate::Result;
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

/// Bootstrap confidence intervals over the test split
#[derive(Parser, Debug)]
pub struct BootstrapArgs {
    /// Gold test partition (document-collection file)
    #[arg(short, long, value_name = "PATH")]
    pub gold: PathBuf,

    /// Model predictions over the same texts (document-collection file)
    #[arg(short, long, value_name = "PATH")]
    pub pred: PathBuf,

    /// Output directory for per-iteration scores and the CI summary
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    /// Pipeline config file (JSON); defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the config iteration count
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Override the config resample size
    #[arg(long)]
    pub sample_size: Option<usize>,
}

/// Looks predictions up by sentence text; unknown texts predict nothing.
struct PredictionLookup {
    by_text: HashMap<String, Vec<EntityMention>>,
}

impl Model for PredictionLookup {
    fn predict(&self, text: &str) -> Result<Vec<EntityMention>> {
        Ok(self.by_text.get(text).cloned().unwrap_or_default())
    }
}

pub fn run(args: BootstrapArgs) -> Result<()> {
    let (config, mut rng) = setup(args.config.as_ref(), args.seed)?;
    ensure_dir(&args.out)?;

    let gold: Vec<AnnotatedSentence> = read_docpack(&args.gold)?
        .into_iter()
        .map(|d| AnnotatedSentence::new(d.text, d.mentions))
        .collect();
    let model = PredictionLookup {
        by_text: read_docpack(&args.pred)?
            .into_iter()
            .map(|d| (d.text, d.mentions))
            .collect(),
    };

    let outcome = bootstrap(
        &model,
        &gold,
        args.iterations.unwrap_or(config.bootstrap_iterations),
        args.sample_size.unwrap_or(config.bootstrap_sample_size),
        &mut rng,
    )?;

    write_iteration_csv(&args.out.join("bootstrap_scores.csv"), &outcome)?;
    write_summary(&args.out.join("bootstrap_summary.txt"), &outcome)?;
    println!(
        "f1 {:.4} (95% CI {:.4}..{:.4}) over {} iterations",
        outcome.point.f1,
        outcome.f1_ci.lower,
        outcome.f1_ci.upper,
        outcome.iterations.len()
    );
    Ok(())
}
