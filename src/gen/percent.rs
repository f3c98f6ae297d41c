//! Percent surface-string generation.
//!
//! Half the pool is word forms with a literal "procent" suffix (no `%`
//! glyph); the rest are digit forms with `%`, usually space-separated.

use crate::entity::{EntityLabel, EntityRecord};
use rand::prelude::*;

use super::numbers::number_words;

/// Probability of a space between a digit form and the `%` glyph.
const SPACE_BEFORE_GLYPH: f64 = 0.8;
/// Share of digit forms rendered as two-decimal floats.
const FLOAT_SHARE: f64 = 0.2;

/// Generate `count` PERCENT entity values.
pub fn generate_percent_pool(count: usize, rng: &mut impl Rng) -> Vec<EntityRecord> {
    let words = number_words(rng);
    let mut pool = Vec::with_capacity(count);

    for _ in 0..count {
        let text = if rng.gen_bool(0.5) {
            // Word form: "otte procent". Always space-separated.
            match words.choose(rng) {
                Some(word) => format!("{word} procent"),
                None => continue,
            }
        } else {
            let num = if rng.gen_bool(FLOAT_SHARE) {
                format!("{:.2}", rng.gen_range(0.0..100.0))
            } else {
                rng.gen_range(0..100).to_string()
            };
            if rng.gen_bool(SPACE_BEFORE_GLYPH) {
                format!("{num} %")
            } else {
                format!("{num}%")
            }
        };
        pool.push(EntityRecord::new(text, EntityLabel::Percent));
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn word_forms_use_procent_suffix() {
        let mut rng = StdRng::seed_from_u64(1209);
        let pool = generate_percent_pool(200, &mut rng);
        assert_eq!(pool.len(), 200);
        for record in &pool {
            if record.text.contains('%') {
                assert!(!record.text.contains("procent"));
            } else {
                assert!(record.text.ends_with(" procent"), "bad form: {}", record.text);
                assert!(!record.text.chars().any(|c| c.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn both_forms_present() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = generate_percent_pool(100, &mut rng);
        assert!(pool.iter().any(|r| r.text.contains('%')));
        assert!(pool.iter().any(|r| r.text.ends_with("procent")));
    }
}
