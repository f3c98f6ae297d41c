//! CLI argument parsing and structure definitions.

use clap::{Parser, Subcommand};

/// Synthetic Danish NER corpus builder.
#[derive(Parser)]
#[command(name = "nergen")]
#[command(
    author,
    version,
    about = "Synthetic Danish NER corpus builder",
    long_about = r#"
nergen - build a Danish NER training corpus from entity lists

PIPELINE:
  generate   - sample entity surface forms (dates, money, persons, ...)
  compose    - assemble weight-expanded pools into example groups
  reconcile  - locate annotated entities as char spans in sentences
  split      - case-randomize, partition, and serialize train/dev/test
  stats      - entity overview and annotation audit reports
  bootstrap  - confidence intervals for a model over the test split

EXAMPLES:
  nergen generate --input lists/ --out generated/
  nergen compose --input generated/ --out composed/
  nergen reconcile --input sentences.csv --out dataset/
  nergen split --input dataset/LABELLED_DATASET.csv --out corpus/
  nergen bootstrap --gold corpus/test.ndpk --pred predictions.ndpk --out eval/
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate entity value pools
    #[command(visible_alias = "g")]
    Generate(super::commands::GenerateArgs),

    /// Compose weight-expanded pools into example groups
    #[command(visible_alias = "c")]
    Compose(super::commands::ComposeArgs),

    /// Reconcile annotated entities to char spans
    #[command(visible_alias = "r")]
    Reconcile(super::commands::ReconcileArgs),

    /// Split the labelled dataset and serialize each partition
    #[command(visible_alias = "s")]
    Split(super::commands::SplitArgs),

    /// Entity overview and annotation audit reports
    Stats(super::commands::StatsArgs),

    /// Bootstrap confidence intervals over the test split
    #[command(visible_alias = "b")]
    Bootstrap(super::commands::BootstrapArgs),
}
