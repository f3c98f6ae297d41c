//! Span reconciliation: recover exact character offsets for annotation
//! intents within a finalized sentence.
//!
//! Surface text may have drifted between annotation time and sentence time
//! (case changes, added punctuation, quotation marks), so this is a
//! best-effort approximate search with a prioritized fallback cascade:
//!
//! 1. Pick a search pattern from an ordered rule table keyed on entity type
//!    and surface content (first matching rule wins).
//! 2. Search case-sensitively, then case-insensitively.
//! 3. Retry both with the first word of the intent text capitalized.
//! 4. Widen the span by one char per side when flanked by matching quotes.
//!
//! Unmatched intents become [`SpanFailure`] records: logged, collected,
//! never fatal for the batch. Offsets are char offsets, half-open.

use crate::entity::{EntityLabel, EntityMention, Intent};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// `{...}` context remnants in intent text, including flanking whitespace.
static CONTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\{[^{}]*\}\s*").unwrap()
});

/// One reconciliation failure, with enough context to audit after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanFailure {
    /// Row index of the originating sentence.
    pub row: usize,
    pub label: EntityLabel,
    /// The intent text as supplied (not a normalized variant).
    pub text: String,
    pub sentence: String,
}

/// Reconciliation result for one sentence.
#[derive(Debug, Clone)]
pub struct ReconciledSentence {
    pub row: usize,
    pub text: String,
    /// Sorted by start offset, non-overlapping.
    pub mentions: Vec<EntityMention>,
    pub failures: Vec<SpanFailure>,
}

/// Batch-level failure tally, emitted at the end of a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileSummary {
    pub sentences: usize,
    pub mentions: usize,
    pub span_failures: usize,
    pub removed_cardinal_one: usize,
}

impl std::fmt::Display for ReconcileSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sentences, {} mentions, {} span failures, {} CARDINAL \"en\" intents removed",
            self.sentences, self.mentions, self.span_failures, self.removed_cardinal_one
        )
    }
}

// =============================================================================
// Rule table
// =============================================================================

/// One pattern-selection rule: a predicate over the intent plus a regex
/// builder for the search pattern. The entity span is always capture
/// group 1; anything outside the group is boundary context.
struct MatchRule {
    name: &'static str,
    applies: fn(&Intent) -> bool,
    pattern: fn(&str) -> String,
}

/// Non-whitespace symbol check for MONEY ("1.000,50 kr", "200,-").
fn has_symbol(text: &str) -> bool {
    text.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

/// The prioritized cascade. First matching rule wins.
static RULES: &[MatchRule] = &[
    MatchRule {
        name: "percent-literal",
        applies: |i| i.label == EntityLabel::Percent && i.text.contains('%'),
        // Exact: no trailing-boundary relaxation for '%' forms.
        pattern: |t| format!("({})", regex::escape(t)),
    },
    MatchRule {
        name: "ordinal-trailing-char",
        applies: |i| i.label == EntityLabel::Ordinal,
        // Absorb one trailing ordinal-marker character.
        pattern: |t| format!("({}[^\\s]?)", regex::escape(t)),
    },
    MatchRule {
        name: "money-trailing-period",
        applies: |i| i.label == EntityLabel::Money && i.text.ends_with('.'),
        pattern: |t| {
            let stripped = t.trim_end_matches('.');
            format!("({})(?:\\W|$)", regex::escape(stripped))
        },
    },
    MatchRule {
        name: "exact-bounded",
        applies: |i| {
            (i.label == EntityLabel::Money && has_symbol(&i.text))
                || (i.label == EntityLabel::Person && i.text.ends_with('.'))
                || i.text.starts_with('@')
                || i.text.contains('(')
                || i.text.contains(')')
                || i.text.contains('+')
                || i.text.contains('\'')
                || i.label == EntityLabel::Law
        },
        pattern: |t| format!("({})(?:\\W|$)", regex::escape(t)),
    },
    MatchRule {
        // CARDINAL and the general fallback: word-bounded on the left so a
        // numeral cannot match inside a larger numeral.
        name: "word-bounded",
        applies: |_| true,
        pattern: |t| format!("\\b({})(?:\\W|$)", regex::escape(t)),
    },
];

fn rule_for(intent: &Intent) -> &'static MatchRule {
    // The final rule always applies.
    RULES
        .iter()
        .find(|r| (r.applies)(intent))
        .unwrap_or(&RULES[RULES.len() - 1])
}

// =============================================================================
// Search
// =============================================================================

/// Byte offset to char offset within `text`.
fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Find the first match of `pattern` whose span does not overlap an already
/// reconciled mention, so duplicate intents land on distinct occurrences.
fn search(
    sentence: &str,
    pattern: &str,
    case_insensitive: bool,
    taken: &[EntityMention],
) -> Option<(usize, usize)> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .ok()?;
    for caps in re.captures_iter(sentence) {
        let m = caps.get(1)?;
        let start = char_offset(sentence, m.start());
        let end = char_offset(sentence, m.end());
        if start == end {
            continue;
        }
        let candidate = EntityMention::new(start, end, EntityLabel::Cardinal);
        if !taken.iter().any(|t| t.overlaps(&candidate)) {
            return Some((start, end));
        }
    }
    None
}

/// Capitalize the first word only; remaining words are left untouched.
fn capitalize_first_word(text: &str) -> String {
    let mut words = text.split_whitespace();
    let first = match words.next() {
        Some(w) => w,
        None => return String::new(),
    };
    let mut chars = first.chars();
    let capitalized = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    };
    let rest: Vec<&str> = words.collect();
    if rest.is_empty() {
        capitalized
    } else {
        format!("{capitalized} {}", rest.join(" "))
    }
}

/// Widen a span by one char per side when both neighbors are the same quote
/// character.
fn widen_quotes(chars: &[char], start: usize, end: usize) -> (usize, usize) {
    if start > 0 && end < chars.len() {
        let left = chars[start - 1];
        let right = chars[end];
        if left == right && (left == '"' || left == '\'') {
            return (start - 1, end + 1);
        }
    }
    (start, end)
}

/// Drop `{...}` context remnants from an intent text.
#[must_use]
pub fn clean_intent_text(text: &str) -> String {
    CONTEXT_RE.replace_all(text, "").trim().to_string()
}

/// Remove CARDINAL intents whose text is the word for "one". These are a
/// known systematic over-generation artifact; removing the intent (rather
/// than letting it fail) keeps the label distribution honest.
pub fn remove_cardinal_one(intents: Vec<Intent>) -> (Vec<Intent>, usize) {
    let before = intents.len();
    let kept: Vec<Intent> = intents
        .into_iter()
        .filter(|i| !(i.label == EntityLabel::Cardinal && i.text.trim() == "en"))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

// =============================================================================
// Per-sentence reconciliation
// =============================================================================

/// Reconcile one sentence against its ordered annotation intents.
pub fn reconcile_sentence(row: usize, text: &str, intents: &[Intent]) -> ReconciledSentence {
    let chars: Vec<char> = text.chars().collect();
    let mut mentions: Vec<EntityMention> = Vec::new();
    let mut failures = Vec::new();

    for intent in intents {
        let surface = clean_intent_text(&intent.text);
        if surface.is_empty() {
            continue;
        }
        let cleaned = Intent {
            label: intent.label,
            text: surface.clone(),
            context: intent.context.clone(),
        };
        let rule = rule_for(&cleaned);

        // Fallback order is fixed: case-sensitive, case-insensitive, then
        // both again with the first word capitalized.
        let normalized = capitalize_first_word(&surface);
        let attempts: [(&str, bool); 4] = [
            (&surface, false),
            (&surface, true),
            (&normalized, false),
            (&normalized, true),
        ];

        let mut found = None;
        for (variant, case_insensitive) in attempts {
            let pattern = (rule.pattern)(variant);
            if let Some(span) = search(text, &pattern, case_insensitive, &mentions) {
                found = Some(span);
                break;
            }
        }

        match found {
            Some((start, end)) => {
                // Widening may collide with a neighbor that already claimed
                // the shared quote char; keep the unwidened span then.
                let (wstart, wend) = widen_quotes(&chars, start, end);
                let widened = EntityMention::new(wstart, wend, intent.label);
                if (wstart, wend) == (start, end)
                    || !mentions.iter().any(|m| m.overlaps(&widened))
                {
                    mentions.push(widened);
                } else {
                    mentions.push(EntityMention::new(start, end, intent.label));
                }
            }
            None => {
                warn!(
                    row,
                    label = %intent.label,
                    entity = %surface,
                    sentence = %text,
                    rule = rule.name,
                    "no span found for annotation intent"
                );
                failures.push(SpanFailure {
                    row,
                    label: intent.label,
                    text: surface,
                    sentence: text.to_string(),
                });
            }
        }
    }

    mentions.sort_by_key(|m| (m.start, m.end));
    ReconciledSentence {
        row,
        text: text.to_string(),
        mentions,
        failures,
    }
}

/// Reconcile a batch of `(text, intents)` rows. CARDINAL "en" intents are
/// removed before search; per-record failures never abort the batch.
pub fn reconcile_batch(rows: Vec<(String, Vec<Intent>)>) -> (Vec<ReconciledSentence>, ReconcileSummary) {
    let mut summary = ReconcileSummary::default();
    let mut out = Vec::with_capacity(rows.len());
    for (row, (text, intents)) in rows.into_iter().enumerate() {
        let (intents, removed) = remove_cardinal_one(intents);
        summary.removed_cardinal_one += removed;
        let reconciled = reconcile_sentence(row, &text, &intents);
        summary.sentences += 1;
        summary.mentions += reconciled.mentions.len();
        summary.span_failures += reconciled.failures.len();
        out.push(reconciled);
    }
    (out, summary)
}
