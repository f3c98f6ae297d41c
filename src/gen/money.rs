//! Money surface-string generation.
//!
//! Combines sampled numbers (digits and words) with a curated currency list.
//! Each currency row carries formatting metadata: where the unit may stand
//! relative to the number, whether it only ever takes a quantity of one
//! ("en krone"), and whether it can grammatically follow a word-form number.

use crate::entity::{EntityLabel, EntityRecord};
use crate::{Error, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::numbers::number_words;

/// Where a currency/unit stands relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
    /// Resolved per instance by a fair coin flip.
    Both,
}

impl Placement {
    /// Parse from the table column value.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "before" => Ok(Placement::Before),
            "after" => Ok(Placement::After),
            "both" => Ok(Placement::Both),
            other => Err(Error::parse(format!("unknown placement: {other:?}"))),
        }
    }
}

/// One currency row from the MONEY list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySpec {
    /// The unit string, e.g. "kr", "DKK", "kroner".
    pub unit: String,
    pub placement: Placement,
    /// Unit only occurs with a quantity of one ("en formue").
    pub only_single_quantity: bool,
    /// Unit can follow a word-form number ("syv kroner" works,
    /// "syv DKK" does not).
    pub takes_number_word: bool,
    pub weight: u32,
}

const SMALL_COUNT: usize = 100;
const BIG_COUNT: usize = 50;

/// Generate the MONEY entity pool.
///
/// Each weight-expanded currency row yields one surface string. Word-form
/// numbers always take a separating space; digit forms flip a coin on the
/// space. When a word number lands on a unit that cannot take one, a
/// substitute unit is drawn from the word-capable subset.
pub fn generate_money_pool(
    currencies: &[CurrencySpec],
    rng: &mut impl Rng,
) -> Result<Vec<EntityRecord>> {
    if currencies.is_empty() {
        return Err(Error::dataset("empty currency list"));
    }
    let word_capable: Vec<&CurrencySpec> =
        currencies.iter().filter(|c| c.takes_number_word).collect();

    let words = number_words(rng);
    let mut numeric: Vec<String> = Vec::with_capacity(SMALL_COUNT + BIG_COUNT);
    for _ in 0..SMALL_COUNT {
        numeric.push(rng.gen_range(1..350).to_string());
    }
    for _ in 0..BIG_COUNT {
        numeric.push(rng.gen_range(1000..10000).to_string());
    }
    let mut all_numbers: Vec<(String, bool)> =
        numeric.iter().map(|n| (n.clone(), false)).collect();
    all_numbers.extend(words.iter().map(|w| (w.clone(), true)));

    let mut pool = Vec::new();
    for row in currencies {
        for _ in 0..row.weight {
            let text = format_one(row, &numeric, &all_numbers, &word_capable, rng)?;
            pool.push(EntityRecord::new(text, EntityLabel::Money));
        }
    }
    Ok(pool)
}

fn format_one(
    row: &CurrencySpec,
    numeric: &[String],
    all_numbers: &[(String, bool)],
    word_capable: &[&CurrencySpec],
    rng: &mut impl Rng,
) -> Result<String> {
    if row.only_single_quantity {
        let num = if rng.gen_bool(0.5) { "en" } else { "1" };
        return Ok(format!("{num} {}", row.unit));
    }

    let placement = match row.placement {
        Placement::Both => {
            if rng.gen_bool(0.5) {
                Placement::Before
            } else {
                Placement::After
            }
        }
        fixed => fixed,
    };

    match placement {
        // Unit-first forms are always digit-based ("kr 200").
        Placement::Before => {
            let num = numeric
                .choose(rng)
                .ok_or_else(|| Error::dataset("empty numeric pool"))?;
            Ok(if rng.gen_bool(0.5) {
                format!("{} {num}", row.unit)
            } else {
                format!("{}{num}", row.unit)
            })
        }
        Placement::After => {
            let (num, is_word) = all_numbers
                .choose(rng)
                .ok_or_else(|| Error::dataset("empty number pool"))?;
            if *is_word {
                let unit = if row.takes_number_word {
                    row.unit.as_str()
                } else {
                    // Grammar mismatch: swap in a word-capable unit.
                    word_capable
                        .choose(rng)
                        .map(|c| c.unit.as_str())
                        .ok_or_else(|| {
                            Error::dataset("no word-capable currency to substitute")
                        })?
                };
                Ok(format!("{num} {unit}"))
            } else if rng.gen_bool(0.5) {
                Ok(format!("{num} {}", row.unit))
            } else {
                Ok(format!("{num}{}", row.unit))
            }
        }
        Placement::Both => unreachable!("resolved above"),
    }
}
