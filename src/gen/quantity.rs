//! Quantity surface-string generation.
//!
//! Numbers paired with measurement units ("200 gram", "syv kilometer").

use crate::entity::{EntityLabel, EntityRecord};
use crate::{Error, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::numbers::number_words;

/// One unit row from the QUANTITY list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub unit: String,
    pub weight: u32,
}

const SMALL_COUNT: usize = 150;
const BIG_COUNT: usize = 25;
const SPACE_PROBABILITY: f64 = 0.8;

/// Generate the QUANTITY entity pool: one value per weight-expanded unit row.
pub fn generate_quantity_pool(
    units: &[UnitSpec],
    rng: &mut impl Rng,
) -> Result<Vec<EntityRecord>> {
    if units.is_empty() {
        return Err(Error::dataset("empty unit list"));
    }

    let words = number_words(rng);
    let mut numbers: Vec<(String, bool)> = Vec::new();
    for _ in 0..SMALL_COUNT {
        numbers.push((rng.gen_range(1..350).to_string(), false));
    }
    for _ in 0..BIG_COUNT {
        numbers.push((rng.gen_range(1000..10000).to_string(), false));
    }
    numbers.extend(words.into_iter().map(|w| (w, true)));

    let mut pool = Vec::new();
    for row in units {
        for _ in 0..row.weight {
            let (num, is_word) = numbers
                .choose(rng)
                .ok_or_else(|| Error::dataset("empty number pool"))?;
            let spaced = *is_word || rng.gen_bool(SPACE_PROBABILITY);
            let text = if spaced {
                format!("{num} {}", row.unit)
            } else {
                format!("{num}{}", row.unit)
            };
            pool.push(EntityRecord::new(text, EntityLabel::Quantity));
        }
    }
    Ok(pool)
}
