//! Compose command: weight-expand entity pools and assemble example groups.

use super::{ensure_dir, setup};
use crate::compose::{compose_examples, PoolItem};
use crate::entity::{expand_by_weight, EntityLabel, EntityRecord};
use crate::io::{read_entity_list, read_multiple_list, write_overview_csv};
use crate::{Error, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Compose weight-expanded pools into example groups
#[derive(Parser, Debug)]
pub struct ComposeArgs {
    /// Directory of per-type entity CSVs (e.g. gpe.csv, work_of_art.csv)
    /// plus an optional multiple.csv
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory for the overview table and example groups
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,

    /// Pipeline config file (JSON); defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the config seed
    #[arg(long)]
    pub seed: Option<u64>,
}

fn list_file(dir: &Path, label: EntityLabel) -> PathBuf {
    let name = label.as_label().to_lowercase().replace(' ', "_");
    dir.join(format!("{name}.csv"))
}

pub fn run(args: ComposeArgs) -> Result<()> {
    let (config, mut rng) = setup(args.config.as_ref(), args.seed)?;
    ensure_dir(&args.out)?;

    let mut singles: Vec<EntityRecord> = Vec::new();
    for label in EntityLabel::ALL {
        if label == EntityLabel::Multiple {
            continue;
        }
        let path = list_file(&args.input, label);
        if !path.exists() {
            warn!(label = %label, path = %path.display(), "no list for type, skipping");
            continue;
        }
        singles.extend(read_entity_list(&path, label)?);
    }
    if singles.is_empty() {
        return Err(Error::dataset(format!(
            "no entity lists found in {}",
            args.input.display()
        )));
    }

    let expanded = expand_by_weight(&singles);
    write_overview_csv(&args.out.join("NER_ENTS_OVERVIEW.csv"), &expanded)?;

    let mut pool: Vec<PoolItem> = expanded.into_iter().map(PoolItem::Single).collect();
    let multiple_path = args.input.join("multiple.csv");
    if multiple_path.exists() {
        for record in read_multiple_list(&multiple_path)? {
            for _ in 0..record.weight {
                pool.push(PoolItem::Composite(record.clone()));
            }
        }
    }

    let examples = compose_examples(pool, &config.group_sizes, &mut rng)?;
    let mut out = String::new();
    for example in &examples {
        for line in example.render() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    fs::write(args.out.join("examples.txt"), out)?;
    info!(groups = examples.len(), "example groups written");
    Ok(())
}
