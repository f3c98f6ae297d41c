//! Evaluation layer: micro P/R/F1 over exact span+label matches, and a
//! bootstrap confidence-interval harness over a held-out test set.
//!
//! Model inference is a black-box seam: anything that can produce entity
//! mentions for a text can be scored.

pub mod bootstrap;

pub use bootstrap::{bootstrap, write_iteration_csv, write_summary, BootstrapOutcome};

use crate::entity::{AnnotatedSentence, EntityMention};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Inference seam for trained models.
pub trait Model {
    fn predict(&self, text: &str) -> Result<Vec<EntityMention>>;
}

/// Micro-averaged precision, recall, and F1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Scores {
    /// Derive scores from raw match counts. Empty denominators score 0.
    #[must_use]
    pub fn from_counts(true_positives: usize, predicted: usize, gold: usize) -> Self {
        let precision = ratio(true_positives, predicted);
        let recall = ratio(true_positives, gold);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Scores {
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Count a prediction as correct only on exact span and label agreement.
fn is_match(pred: &EntityMention, gold: &EntityMention) -> bool {
    pred.start == gold.start && pred.end == gold.end && pred.label == gold.label
}

/// Micro P/R/F1 over one batch of (predicted, gold) mention sets.
///
/// Each gold mention is consumed by at most one prediction, so duplicate
/// predictions of the same span are counted as false positives.
#[must_use]
pub fn score_mentions(batches: &[(Vec<EntityMention>, Vec<EntityMention>)]) -> Scores {
    let mut true_positives = 0;
    let mut predicted = 0;
    let mut gold_total = 0;
    for (preds, gold) in batches {
        predicted += preds.len();
        gold_total += gold.len();
        let mut used = vec![false; gold.len()];
        for pred in preds {
            if let Some(i) = gold
                .iter()
                .enumerate()
                .position(|(i, g)| !used[i] && is_match(pred, g))
            {
                used[i] = true;
                true_positives += 1;
            }
        }
    }
    Scores::from_counts(true_positives, predicted, gold_total)
}

/// Run a model over a test set and score it.
pub fn score_model(model: &dyn Model, test_set: &[AnnotatedSentence]) -> Result<Scores> {
    let mut batches = Vec::with_capacity(test_set.len());
    for sentence in test_set {
        let preds = model.predict(&sentence.text)?;
        batches.push((preds, sentence.mentions.clone()));
    }
    Ok(score_mentions(&batches))
}
