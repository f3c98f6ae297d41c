//! Danish number words for the numeric generators.
//!
//! Numeric entity values mix digit forms ("200") with word forms ("to
//! hundrede"). The word pool combines curated small-number words with a
//! sampled set of "small word × magnitude word" combinations.

use rand::prelude::*;

/// Curated small-number words (2..19 and the tens).
pub const SMALL_NUMBER_WORDS: [&str; 26] = [
    "to",
    "tre",
    "fire",
    "fem",
    "seks",
    "syv",
    "otte",
    "ni",
    "ti",
    "tolv",
    "tretten",
    "fjorten",
    "femten",
    "seksten",
    "sytten",
    "atten",
    "nitten",
    "tyve",
    "tredive",
    "fyrre",
    "halvtreds",
    "tres",
    "halvfjerds",
    "firs",
    "halvfems",
    "hundrede",
];

/// Magnitude words combined with the small words.
pub const MAGNITUDE_WORDS: [&str; 3] = ["hundrede", "tusinde", "millioner"];

/// Number of magnitude combinations sampled into the pool.
const MAGNITUDE_SAMPLES: usize = 28;

/// Build the number-word pool: every small word plus a sampled subset of
/// multi-word magnitude combinations ("syv hundrede", "to millioner").
pub fn number_words(rng: &mut impl Rng) -> Vec<String> {
    let mut combined: Vec<String> = Vec::new();
    for small in SMALL_NUMBER_WORDS {
        for magnitude in MAGNITUDE_WORDS {
            combined.push(format!("{small} {magnitude}"));
        }
    }

    let mut pool: Vec<String> = SMALL_NUMBER_WORDS.iter().map(|s| s.to_string()).collect();
    for _ in 0..MAGNITUDE_SAMPLES {
        if let Some(pick) = combined.choose(rng) {
            pool.push(pick.clone());
        }
    }
    pool
}
