//! Bootstrap confidence intervals over a held-out test set.
//!
//! Resamples the test set with replacement, scores each resample, and reads
//! the 2.5th and 97.5th percentiles off the sorted per-iteration scores.

use super::{score_mentions, Model, Scores};
use crate::entity::{AnnotatedSentence, EntityMention};
use crate::io::write_csv;
use crate::{Error, Result};
use rand::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

/// Per-metric 95% interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// Full outcome of a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub point: Scores,
    pub iterations: Vec<Scores>,
    pub precision_ci: Interval,
    pub recall_ci: Interval,
    pub f1_ci: Interval,
}

/// Resample-and-score. Predictions are computed once per sentence and
/// reused across iterations, so the model runs `test_set.len()` times total.
pub fn bootstrap(
    model: &dyn Model,
    test_set: &[AnnotatedSentence],
    n_iterations: usize,
    sample_size: usize,
    rng: &mut impl Rng,
) -> Result<BootstrapOutcome> {
    if test_set.is_empty() {
        return Err(Error::evaluation("empty test set"));
    }
    if n_iterations == 0 || sample_size == 0 {
        return Err(Error::evaluation("bootstrap parameters must be positive"));
    }

    let mut batches: Vec<(Vec<EntityMention>, Vec<EntityMention>)> =
        Vec::with_capacity(test_set.len());
    for sentence in test_set {
        let preds = model.predict(&sentence.text)?;
        batches.push((preds, sentence.mentions.clone()));
    }
    let point = score_mentions(&batches);

    let mut iterations = Vec::with_capacity(n_iterations);
    for _ in 0..n_iterations {
        let resample: Vec<(Vec<EntityMention>, Vec<EntityMention>)> = (0..sample_size)
            .map(|_| batches[rng.gen_range(0..batches.len())].clone())
            .collect();
        iterations.push(score_mentions(&resample));
    }

    let outcome = BootstrapOutcome {
        point,
        precision_ci: percentile_interval(&iterations, |s| s.precision),
        recall_ci: percentile_interval(&iterations, |s| s.recall),
        f1_ci: percentile_interval(&iterations, |s| s.f1),
        iterations,
    };
    info!(
        f1 = outcome.point.f1,
        f1_lower = outcome.f1_ci.lower,
        f1_upper = outcome.f1_ci.upper,
        iterations = n_iterations,
        "bootstrap complete"
    );
    Ok(outcome)
}

/// 2.5/97.5 percentiles by nearest-rank over the sorted values.
fn percentile_interval(iterations: &[Scores], metric: impl Fn(&Scores) -> f64) -> Interval {
    let mut values: Vec<f64> = iterations.iter().map(&metric).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    Interval {
        lower: percentile(&values, 2.5),
        upper: percentile(&values, 97.5),
    }
}

fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let n = sorted.len();
    let rank = ((pct / 100.0) * n as f64).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

/// Write one row per iteration: `iteration,precision,recall,f1`.
pub fn write_iteration_csv(path: &Path, outcome: &BootstrapOutcome) -> Result<()> {
    let rows: Vec<Vec<String>> = outcome
        .iterations
        .iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                i.to_string(),
                format!("{:.6}", s.precision),
                format!("{:.6}", s.recall),
                format!("{:.6}", s.f1),
            ]
        })
        .collect();
    write_csv(path, &["iteration", "precision", "recall", "f1"], &rows)
}

/// Write the point estimates with their 95% intervals as text.
pub fn write_summary(path: &Path, outcome: &BootstrapOutcome) -> Result<()> {
    let line = |name: &str, value: f64, ci: Interval| {
        format!(
            "{name}: {value:.4} (95% CI {:.4}..{:.4})\n",
            ci.lower, ci.upper
        )
    };
    let mut out = String::new();
    out.push_str(&format!(
        "bootstrap over {} iterations\n",
        outcome.iterations.len()
    ));
    out.push_str(&line("precision", outcome.point.precision, outcome.precision_ci));
    out.push_str(&line("recall", outcome.point.recall, outcome.recall_ci));
    out.push_str(&line("f1", outcome.point.f1, outcome.f1_ci));
    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityLabel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Echoes the gold mentions for texts it has seen; silent otherwise.
    struct Oracle {
        known: Vec<AnnotatedSentence>,
    }

    impl Model for Oracle {
        fn predict(&self, text: &str) -> Result<Vec<EntityMention>> {
            Ok(self
                .known
                .iter()
                .find(|s| s.text == text)
                .map(|s| s.mentions.clone())
                .unwrap_or_default())
        }
    }

    fn test_set() -> Vec<AnnotatedSentence> {
        (0..20)
            .map(|i| {
                AnnotatedSentence::new(
                    format!("Sætning {i} om Aarhus."),
                    vec![EntityMention::new(0, 7, EntityLabel::Event)],
                )
            })
            .collect()
    }

    #[test]
    fn oracle_model_gets_tight_interval_at_one() {
        let set = test_set();
        let model = Oracle { known: set.clone() };
        let mut rng = StdRng::seed_from_u64(1209);
        let outcome = bootstrap(&model, &set, 50, 30, &mut rng).unwrap();
        assert!((outcome.point.f1 - 1.0).abs() < 1e-12);
        assert!((outcome.f1_ci.lower - 1.0).abs() < 1e-12);
        assert!((outcome.f1_ci.upper - 1.0).abs() < 1e-12);
        assert_eq!(outcome.iterations.len(), 50);
    }

    #[test]
    fn blind_model_scores_zero() {
        let set = test_set();
        let model = Oracle { known: vec![] };
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = bootstrap(&model, &set, 10, 10, &mut rng).unwrap();
        assert_eq!(outcome.point.f1, 0.0);
        assert_eq!(outcome.f1_ci.upper, 0.0);
    }

    #[test]
    fn reproducible_for_seed() {
        let set = test_set();
        let model = Oracle { known: set.clone() };
        let a = bootstrap(&model, &set, 20, 15, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = bootstrap(&model, &set, 20, 15, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn empty_test_set_rejected() {
        let model = Oracle { known: vec![] };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(bootstrap(&model, &[], 10, 10, &mut rng).is_err());
    }

    #[test]
    fn percentile_bounds_ordered() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let lower = percentile(&values, 2.5);
        let upper = percentile(&values, 97.5);
        assert!(lower < upper);
        assert!((lower - 0.02).abs() < 1e-12);
        assert!((upper - 0.97).abs() < 1e-12);
    }
}
