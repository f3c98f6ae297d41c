//! Reconcile command: turn annotated sentences into a char-span dataset.

use super::ensure_dir;
use crate::io::{read_sentence_table, write_csv, write_labelled_dataset};
use crate::reconcile::reconcile_batch;
use crate::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Reconcile annotated entities to char spans
#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// Annotated sentence table (columns sentences,entities,changed?)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory for the labelled dataset and failure report
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,
}

pub fn run(args: ReconcileArgs) -> Result<()> {
    ensure_dir(&args.out)?;

    let rows = read_sentence_table(&args.input)?;
    let batch: Vec<(String, Vec<_>)> = rows
        .into_iter()
        .map(|r| (r.sentence, r.intents))
        .collect();
    let (reconciled, summary) = reconcile_batch(batch);

    let sentences: Vec<(String, Vec<_>)> = reconciled
        .iter()
        .map(|r| (r.text.clone(), r.mentions.clone()))
        .collect();
    write_labelled_dataset(&args.out.join("LABELLED_DATASET.csv"), &sentences)?;

    let failure_rows: Vec<Vec<String>> = reconciled
        .iter()
        .flat_map(|r| &r.failures)
        .map(|f| {
            vec![
                f.row.to_string(),
                f.label.as_label().to_string(),
                f.text.clone(),
                f.sentence.clone(),
            ]
        })
        .collect();
    write_csv(
        &args.out.join("span_failures.csv"),
        &["row", "label", "text", "sentence"],
        &failure_rows,
    )?;

    info!(%summary, "reconciliation complete");
    println!("{summary}");
    Ok(())
}
