//! Person-name generation from frequency-annotated name lists.
//!
//! Names come from three real-world frequency tables (female first names,
//! male first names, last names). Each list is partitioned into a "common"
//! and a "rare" band, sampled at a fixed ratio so top names do not dominate
//! and near-unique names do not leak in. Seven structural patterns are
//! composed from the sampled pools; a name is never reused across patterns.

use crate::config::NameBandConfig;
use crate::entity::{EntityLabel, EntityRecord};
use crate::{Error, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of a name-frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub name: String,
    /// Real-world occurrence count.
    pub amount: u32,
}

/// A drawn-without-replacement name sampler.
///
/// Draws are weighted by occurrence count; every draw removes the entry, so
/// no name can appear twice across the whole run.
#[derive(Debug, Clone, Default)]
pub struct NamePool {
    entries: Vec<NameEntry>,
}

impl NamePool {
    #[must_use]
    pub fn new(entries: Vec<NameEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }

    /// Draw one name, weighted by frequency, removing it from the pool.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Result<String> {
        if self.entries.is_empty() {
            return Err(Error::PoolExhausted {
                requested: 1,
                available: 0,
            });
        }
        let index = WeightedIndex::new(self.entries.iter().map(|e| e.amount as f64))
            .map_err(|e| Error::dataset(format!("name weights: {e}")))?;
        let picked = index.sample(rng);
        Ok(self.entries.swap_remove(picked).name)
    }

    /// Draw `n` distinct names. Rejects up front when the pool is too small.
    pub fn draw_many(&mut self, n: usize, rng: &mut impl Rng) -> Result<Vec<String>> {
        if n > self.entries.len() {
            return Err(Error::PoolExhausted {
                requested: n,
                available: self.entries.len(),
            });
        }
        (0..n).map(|_| self.draw(rng)).collect()
    }
}

/// Common/rare banded pool for one name list.
#[derive(Debug, Clone)]
pub struct BandedPool {
    common: NamePool,
    rare: NamePool,
    common_fraction: f64,
}

impl BandedPool {
    /// Partition entries into bands. Names at or below the low threshold are
    /// dropped as near-unique noise.
    #[must_use]
    pub fn new(entries: Vec<NameEntry>, bands: &NameBandConfig) -> Self {
        let mut common = Vec::new();
        let mut rare = Vec::new();
        for entry in entries {
            if entry.amount >= bands.high_threshold {
                common.push(entry);
            } else if entry.amount > bands.low_threshold {
                rare.push(entry);
            }
        }
        Self {
            common: NamePool::new(common),
            rare: NamePool::new(rare),
            common_fraction: bands.common_fraction,
        }
    }

    /// Draw `n` distinct names at the configured common/rare ratio.
    pub fn draw_many(&mut self, n: usize, rng: &mut impl Rng) -> Result<Vec<String>> {
        let n_common = ((n as f64) * self.common_fraction).round() as usize;
        let n_common = n_common.min(n);
        let mut names = self.common.draw_many(n_common, rng)?;
        names.extend(self.rare.draw_many(n - n_common, rng)?);
        Ok(names)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.common.remaining() + self.rare.remaining()
    }
}

/// Capitalize a raw table name ("METTE" or "mette" -> "Mette").
fn capitalize(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

/// Normalize table rows: trim, capitalize, drop empties.
#[must_use]
pub fn preprocess_names(entries: Vec<NameEntry>) -> Vec<NameEntry> {
    entries
        .into_iter()
        .filter(|e| !e.name.trim().is_empty())
        .map(|e| NameEntry {
            name: capitalize(&e.name),
            amount: e.amount,
        })
        .collect()
}

/// Generate the PERSON entity pool from the three name lists.
///
/// `pattern_counts` gives the target draw count for each of the seven
/// structural patterns, in order: bare first, bare last, first+last, double
/// first, double last, first+initial, first+initial+last.
pub fn generate_person_pool(
    female_first: Vec<NameEntry>,
    male_first: Vec<NameEntry>,
    last: Vec<NameEntry>,
    bands: &NameBandConfig,
    pattern_counts: &[usize; 7],
    rng: &mut impl Rng,
) -> Result<Vec<EntityRecord>> {
    let mut first_entries = preprocess_names(female_first);
    first_entries.extend(preprocess_names(male_first));
    let mut firsts = BandedPool::new(first_entries, bands);
    let mut lasts = BandedPool::new(preprocess_names(last), bands);

    let mut pool = Vec::new();
    let mut push = |name: String, pool: &mut Vec<EntityRecord>| {
        pool.push(EntityRecord::new(name, EntityLabel::Person));
    };

    // 1. Bare first name.
    for name in firsts.draw_many(pattern_counts[0], rng)? {
        push(name, &mut pool);
    }
    // 2. Bare last name.
    for name in lasts.draw_many(pattern_counts[1], rng)? {
        push(name, &mut pool);
    }
    // 3. First + last.
    {
        let f = firsts.draw_many(pattern_counts[2], rng)?;
        let l = lasts.draw_many(pattern_counts[2], rng)?;
        for (first, lastname) in f.into_iter().zip(l) {
            push(format!("{first} {lastname}"), &mut pool);
        }
    }
    // 4. Double first name.
    {
        let f = firsts.draw_many(pattern_counts[3] * 2, rng)?;
        for pair in f.chunks_exact(2) {
            push(format!("{} {}", pair[0], pair[1]), &mut pool);
        }
    }
    // 5. Double last name.
    {
        let l = lasts.draw_many(pattern_counts[4] * 2, rng)?;
        for pair in l.chunks_exact(2) {
            push(format!("{} {}", pair[0], pair[1]), &mut pool);
        }
    }
    // 6. First name + initial. The initial consumes a last name so initials
    //    follow the real-world first-letter distribution.
    {
        let f = firsts.draw_many(pattern_counts[5], rng)?;
        let l = lasts.draw_many(pattern_counts[5], rng)?;
        for (first, lastname) in f.into_iter().zip(l) {
            if let Some(initial) = lastname.chars().next() {
                push(format!("{first} {initial}."), &mut pool);
            }
        }
    }
    // 7. First name + initial + last name.
    {
        let f = firsts.draw_many(pattern_counts[6], rng)?;
        let initials = lasts.draw_many(pattern_counts[6], rng)?;
        let l = lasts.draw_many(pattern_counts[6], rng)?;
        for ((first, init_source), lastname) in f.into_iter().zip(initials).zip(l) {
            if let Some(initial) = init_source.chars().next() {
                push(format!("{first} {initial}. {lastname}"), &mut pool);
            }
        }
    }

    Ok(pool)
}
