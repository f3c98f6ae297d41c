//! Stats command: entity overview and annotation audit reports.

use crate::io::{read_overview_csv, read_sentence_table};
use crate::stats::{annotation_audit, audit_report, entity_overview, overview_report};
use crate::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// Entity overview and annotation audit reports
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Weight-expanded overview table (NER_ENTS_OVERVIEW.csv)
    #[arg(long, value_name = "PATH")]
    pub overview: Option<PathBuf>,

    /// Annotated sentence table to audit
    #[arg(long, value_name = "PATH")]
    pub sentences: Option<PathBuf>,
}

pub fn run(args: StatsArgs) -> Result<()> {
    if args.overview.is_none() && args.sentences.is_none() {
        return Err(Error::config(
            "nothing to report: pass --overview and/or --sentences",
        ));
    }
    if let Some(path) = &args.overview {
        let expanded = read_overview_csv(path)?;
        let overview = entity_overview(&expanded);
        print!("{}", overview_report(&overview, expanded.len()));
    }
    if let Some(path) = &args.sentences {
        let rows = read_sentence_table(path)?;
        let audit = annotation_audit(&rows);
        print!("{}", audit_report(&audit));
    }
    Ok(())
}
