//! Date surface-string generation.
//!
//! Enumerates every calendar day in a configured year range, samples a
//! subset that favors recent years, and renders each sampled date in two of
//! twelve format patterns chosen to keep per-format usage counts balanced.
//! A weighted list of relative-date and duration expressions forms the long
//! tail of the pool.

use crate::config::DateConfig;
use crate::entity::{EntityLabel, EntityRecord};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// Danish month names, full form.
const MONTHS: [&str; 12] = [
    "januar",
    "februar",
    "marts",
    "april",
    "maj",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "december",
];

/// Danish month names, abbreviated.
const MONTHS_ABBREV: [&str; 12] = [
    "jan", "feb", "mar", "apr", "maj", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// Danish weekday names.
const WEEKDAYS: [&str; 7] = [
    "mandag", "tirsdag", "onsdag", "torsdag", "fredag", "lørdag", "søndag",
];

/// Relative-date expressions and their repeat weights.
const RELATIVE_DATES: [(&str, u32); 13] = [
    ("i morgen", 5),
    ("imorgen", 2),
    ("igår", 2),
    ("i går", 5),
    ("i dag", 5),
    ("idag", 2),
    ("næste uge", 2),
    ("næste måned", 2),
    ("næste år", 2),
    ("overmorgen", 3),
    ("sidste uge", 2),
    ("sidste måned", 2),
    ("sidste år", 2),
];

/// Duration expressions and their repeat weights.
const DURATIONS: [(&str, u32); 25] = [
    ("en måned", 5),
    ("to måneder", 2),
    ("9 måneder", 2),
    ("elleve måneder", 2),
    ("en uge", 2),
    ("fire uger", 2),
    ("fem-seks uger", 2),
    ("18 uger", 2),
    ("1910'erne", 2),
    ("firserne", 2),
    ("90'erne", 2),
    ("1950'erne", 2),
    ("et år", 5),
    ("15 år", 2),
    ("3 år", 2),
    ("syv år", 2),
    ("ni år", 2),
    ("10-årig", 2),
    ("tolvårig", 1),
    ("toårig", 1),
    ("femårig", 1),
    ("halvtredsårig", 1),
    ("8-11-årige", 1),
    ("+18 år", 1),
    ("+16 år", 1),
];

/// The twelve calendar-date format patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// "20. jul 21"
    DayAbbrevYear2,
    /// "20/07/21"
    SlashNumericYear2,
    /// "20. juli 2021"
    DayFullYear4,
    /// "juli 20 2021"
    MonthFirst,
    /// "2021-07-20"
    Iso,
    /// "20-07-2021"
    DashNumeric,
    /// "20 jul, 2021"
    DayAbbrevComma,
    /// "tirsdag, 20. juli 2021"
    WeekdayFull,
    /// "20/jul/2021"
    SlashAbbrev,
    /// "jul 20th, 2021"
    AbbrevOrdinal,
    /// "tirsdag, 20-jul-21"
    WeekdayDashed,
    /// "tirsdag, 20. juli '21"
    WeekdayApostrophe,
}

impl DateFormat {
    /// All formats, in a fixed order for usage-count bookkeeping.
    pub const ALL: [DateFormat; 12] = [
        DateFormat::DayAbbrevYear2,
        DateFormat::SlashNumericYear2,
        DateFormat::DayFullYear4,
        DateFormat::MonthFirst,
        DateFormat::Iso,
        DateFormat::DashNumeric,
        DateFormat::DayAbbrevComma,
        DateFormat::WeekdayFull,
        DateFormat::SlashAbbrev,
        DateFormat::AbbrevOrdinal,
        DateFormat::WeekdayDashed,
        DateFormat::WeekdayApostrophe,
    ];

    /// Render a date in this format with Danish names.
    #[must_use]
    pub fn render(&self, date: NaiveDate) -> String {
        let day = date.day();
        let month = date.month() as usize - 1;
        let year = date.year();
        let year2 = year % 100;
        let weekday = WEEKDAYS[weekday_index(date.weekday())];
        let full = MONTHS[month];
        let abbrev = MONTHS_ABBREV[month];

        match self {
            DateFormat::DayAbbrevYear2 => format!("{day}. {abbrev} {year2:02}"),
            DateFormat::SlashNumericYear2 => {
                format!("{day:02}/{:02}/{year2:02}", date.month())
            }
            DateFormat::DayFullYear4 => format!("{day}. {full} {year}"),
            DateFormat::MonthFirst => format!("{full} {day} {year}"),
            DateFormat::Iso => format!("{year}-{:02}-{day:02}", date.month()),
            DateFormat::DashNumeric => format!("{day:02}-{:02}-{year}", date.month()),
            DateFormat::DayAbbrevComma => format!("{day} {abbrev}, {year}"),
            DateFormat::WeekdayFull => format!("{weekday}, {day}. {full} {year}"),
            DateFormat::SlashAbbrev => format!("{day:02}/{abbrev}/{year}"),
            DateFormat::AbbrevOrdinal => format!("{abbrev} {day}th, {year}"),
            DateFormat::WeekdayDashed => format!("{weekday}, {day:02}-{abbrev}-{year2:02}"),
            DateFormat::WeekdayApostrophe => format!("{weekday}, {day}. {full} '{year2:02}"),
        }
    }
}

fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Enumerate every day in `[start_year, end_year]`.
fn calendar_days(config: &DateConfig) -> Result<Vec<NaiveDate>> {
    let start = NaiveDate::from_ymd_opt(config.start_year, 1, 1)
        .ok_or_else(|| Error::config("invalid start year"))?;
    let end = NaiveDate::from_ymd_opt(config.end_year, 12, 31)
        .ok_or_else(|| Error::config("invalid end year"))?;
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        current = current
            .succ_opt()
            .ok_or_else(|| Error::config("date range overflow"))?;
    }
    Ok(days)
}

/// Sample calendar dates, favoring years at or above the cutoff.
fn sample_dates(
    days: &[NaiveDate],
    config: &DateConfig,
    rng: &mut impl Rng,
) -> Result<Vec<NaiveDate>> {
    let weights: Vec<f64> = days
        .iter()
        .map(|d| {
            if d.year() >= config.cutoff_year {
                config.recent_weight
            } else {
                config.older_weight
            }
        })
        .collect();
    let index = WeightedIndex::new(&weights)
        .map_err(|e| Error::config(format!("date sampling weights: {e}")))?;
    Ok((0..config.sample_size)
        .map(|_| days[index.sample(rng)])
        .collect())
}

/// Pick two formats whose usage count sits at the current minimum.
fn pick_balanced_formats(counts: &mut [usize; 12], rng: &mut impl Rng) -> Vec<DateFormat> {
    let mut order: Vec<usize> = (0..DateFormat::ALL.len()).collect();
    order.shuffle(rng);

    let mut picked = Vec::with_capacity(2);
    for idx in order {
        if picked.len() == 2 {
            break;
        }
        let min = counts.iter().copied().min().unwrap_or(0);
        if counts[idx] == min {
            picked.push(DateFormat::ALL[idx]);
            counts[idx] += 1;
        }
    }
    picked
}

/// Generate the DATE entity pool: formatted calendar dates plus the weighted
/// relative/duration tail.
pub fn generate_date_pool(config: &DateConfig, rng: &mut impl Rng) -> Result<Vec<EntityRecord>> {
    let days = calendar_days(config)?;
    let sampled = sample_dates(&days, config, rng)?;

    let mut counts = [0usize; 12];
    let mut pool = Vec::new();
    for date in sampled {
        for format in pick_balanced_formats(&mut counts, rng) {
            pool.push(EntityRecord::new(format.render(date), EntityLabel::Date));
        }
    }

    for (text, weight) in RELATIVE_DATES.iter().chain(DURATIONS.iter()) {
        for _ in 0..*weight {
            pool.push(EntityRecord::new(*text, EntityLabel::Date));
        }
    }
    Ok(pool)
}
