//! # nergen
//!
//! Synthetic Danish NER corpus builder.
//!
//! Builds a weakly-controlled training corpus from curated entity lists:
//! generated surface forms (dates, money, percentages, quantities, person
//! names), composed example groups, char-span reconciliation of annotated
//! sentences, reproducible train/dev/test splitting, and bootstrap
//! confidence intervals over a held-out split.
//!
//! ## Pipeline
//!
//! ```text
//! lists/  ─ generate ─►  pools  ─ compose ─►  example groups
//!                                                  │ (sentence writing,
//!                                                  ▼  external)
//!                       annotated sentence tables
//!                                                  │
//!                  reconcile ─►  labelled dataset ─┤
//!                                                  ▼
//!                     split ─►  train/dev/test document collections
//!                                                  │
//!                                 bootstrap ─►  95% CIs
//! ```
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use nergen::reconcile::reconcile_batch;
//! use nergen::entity::{EntityLabel, Intent};
//!
//! let rows = vec![(
//!     "Han betalte 200 kr for billetten.".to_string(),
//!     vec![Intent::new(EntityLabel::Money, "200 kr")],
//! )];
//! let (sentences, summary) = reconcile_batch(rows);
//! assert_eq!(summary.mentions, 1);
//! ```
//!
//! All spans are char offsets, half-open. Every sampling call site draws
//! from one seeded generator, so a run is reproducible end to end.

pub mod align;
pub mod cli;
pub mod compose;
pub mod config;
pub mod corpus;
pub mod docpack;
pub mod entity;
mod error;
pub mod eval;
pub mod gen;
pub mod io;
pub mod reconcile;
pub mod stats;

pub use config::PipelineConfig;
pub use entity::{
    expand_by_weight, AnnotatedSentence, EntityLabel, EntityMention, EntityRecord, Intent,
    MultipleRecord,
};
pub use error::{Error, Result};
pub use reconcile::{reconcile_batch, reconcile_sentence, ReconcileSummary, SpanFailure};
