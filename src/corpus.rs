//! Corpus splitting, case randomization, and label-distribution reporting.

use crate::config::{CaseProbabilities, SplitRatios};
use crate::entity::{AnnotatedSentence, EntityLabel};
use crate::Result;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Three disjoint partitions of the annotated set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub train: Vec<AnnotatedSentence>,
    pub dev: Vec<AnnotatedSentence>,
    pub test: Vec<AnnotatedSentence>,
}

impl Corpus {
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len() + self.dev.len() + self.test.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition sentences into train/dev/test by ratio, shuffled with the
/// run-wide seeded generator. Same seed, same membership.
pub fn split_corpus(
    sentences: Vec<AnnotatedSentence>,
    ratios: &SplitRatios,
    rng: &mut impl Rng,
) -> Result<Corpus> {
    ratios.validate()?;
    let n = sentences.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let n_train = ((n as f64) * ratios.train).round() as usize;
    let n_dev = ((n as f64) * ratios.dev).round() as usize;
    let n_train = n_train.min(n);
    let n_dev = n_dev.min(n - n_train);

    let mut slots: Vec<Option<AnnotatedSentence>> = sentences.into_iter().map(Some).collect();
    let mut take = |idx: &[usize], slots: &mut Vec<Option<AnnotatedSentence>>| {
        idx.iter()
            .filter_map(|&i| slots[i].take())
            .collect::<Vec<_>>()
    };

    let train = take(&indices[..n_train], &mut slots);
    let dev = take(&indices[n_train..n_train + n_dev], &mut slots);
    let test = take(&indices[n_train + n_dev..], &mut slots);
    Ok(Corpus { train, dev, test })
}

/// Randomize sentence casing to simulate real-world variance: upper, lower,
/// or unchanged, drawn independently per sentence.
///
/// Mention offsets are char offsets; the transform is skipped for any
/// sentence whose case mapping would change its char count.
pub fn case_randomize(
    sentences: &mut [AnnotatedSentence],
    probs: &CaseProbabilities,
    rng: &mut impl Rng,
) -> Result<()> {
    probs.validate()?;
    for sentence in sentences.iter_mut() {
        let draw: f64 = rng.gen();
        let transformed = if draw < probs.upper {
            sentence.text.to_uppercase()
        } else if draw < probs.upper + probs.lower {
            sentence.text.to_lowercase()
        } else {
            continue;
        };
        if transformed.chars().count() == sentence.text.chars().count() {
            sentence.text = transformed;
        }
    }
    Ok(())
}

/// Label frequencies sorted descending by count (ties broken by label name
/// for deterministic reports).
#[must_use]
pub fn label_distribution(sentences: &[AnnotatedSentence]) -> Vec<(EntityLabel, usize)> {
    let mut counts: HashMap<EntityLabel, usize> = HashMap::new();
    for sentence in sentences {
        for mention in &sentence.mentions {
            *counts.entry(mention.label).or_insert(0) += 1;
        }
    }
    let mut sorted: Vec<(EntityLabel, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_label().cmp(b.0.as_label())));
    sorted
}

fn render_distribution(title: &str, dist: &[(EntityLabel, usize)], out: &mut String) {
    out.push_str(title);
    out.push('\n');
    if dist.is_empty() {
        out.push_str("  (no mentions)\n");
    }
    for (label, count) in dist {
        out.push_str(&format!("  {label}: {count}\n"));
    }
    out.push('\n');
}

/// Human-readable label frequency report for the full set and each split.
///
/// A label missing from dev or test shows up here as an absent line; that is
/// an operator signal, not an engine error.
#[must_use]
pub fn distribution_report(corpus: &Corpus) -> String {
    let mut all: Vec<AnnotatedSentence> = Vec::with_capacity(corpus.len());
    all.extend(corpus.train.iter().cloned());
    all.extend(corpus.dev.iter().cloned());
    all.extend(corpus.test.iter().cloned());

    let mut out = String::new();
    render_distribution(
        &format!("TOTAL ({} sentences)", all.len()),
        &label_distribution(&all),
        &mut out,
    );
    render_distribution(
        &format!("TRAIN ({} sentences)", corpus.train.len()),
        &label_distribution(&corpus.train),
        &mut out,
    );
    render_distribution(
        &format!("DEV ({} sentences)", corpus.dev.len()),
        &label_distribution(&corpus.dev),
        &mut out,
    );
    render_distribution(
        &format!("TEST ({} sentences)", corpus.test.len()),
        &label_distribution(&corpus.test),
        &mut out,
    );
    out
}
