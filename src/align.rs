//! Token-boundary alignment.
//!
//! Tokenization is an external collaborator; the pipeline only consumes
//! `tokenize(text) -> token spans` and aligns candidate entity spans to the
//! returned boundaries. [`RuleTokenizer`] is the in-repo reference
//! implementation used by tests and the serializer.
//!
//! All offsets are char offsets, half-open.

use crate::entity::EntityLabel;
use serde::{Deserialize, Serialize};

/// One token's span within a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

/// Black-box tokenization seam.
pub trait Tokenizer {
    /// Ordered, non-overlapping token spans covering the text.
    fn tokenize(&self, text: &str) -> Vec<TokenSpan>;
}

/// Policy for reconciling a char span against token boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// Both endpoints must sit exactly on token boundaries.
    Strict,
    /// Widen to cover every token the span partially overlaps.
    Expand,
}

/// Labels whose spans routinely disagree with token boundaries.
const LENIENT_LABELS: [EntityLabel; 4] = [
    EntityLabel::Money,
    EntityLabel::Quantity,
    EntityLabel::Ordinal,
    EntityLabel::Law,
];

/// Pick the alignment mode for a candidate span: lenient labels and spans
/// ending within two chars of the sentence end get `Expand`.
#[must_use]
pub fn alignment_mode_for(label: EntityLabel, end: usize, text_len: usize) -> AlignmentMode {
    if LENIENT_LABELS.contains(&label) || end + 2 >= text_len {
        AlignmentMode::Expand
    } else {
        AlignmentMode::Strict
    }
}

/// Align `[start, end)` to token boundaries.
///
/// Strict mode returns `None` unless some token starts at `start` and some
/// token ends at `end`. Expand mode widens to the enclosing boundaries of
/// every overlapped token; `None` when the span overlaps no token at all.
#[must_use]
pub fn char_span(
    tokens: &[TokenSpan],
    start: usize,
    end: usize,
    mode: AlignmentMode,
) -> Option<(usize, usize)> {
    if start >= end {
        return None;
    }
    match mode {
        AlignmentMode::Strict => {
            let starts_on_boundary = tokens.iter().any(|t| t.start == start);
            let ends_on_boundary = tokens.iter().any(|t| t.end == end);
            if starts_on_boundary && ends_on_boundary {
                Some((start, end))
            } else {
                None
            }
        }
        AlignmentMode::Expand => {
            let overlapping: Vec<&TokenSpan> = tokens
                .iter()
                .filter(|t| t.start < end && t.end > start)
                .collect();
            let first = overlapping.first()?;
            let last = overlapping.last()?;
            Some((first.start, last.end))
        }
    }
}

/// Reference tokenizer: whitespace-separated chunks with leading/trailing
/// punctuation split into their own tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer;

const PUNCTUATION: &[char] = &[
    '.', ',', ':', ';', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', '«', '»', '%',
];

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<TokenSpan> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i].is_whitespace() {
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            split_chunk(&chars, start, i, &mut tokens);
        }
        tokens
    }
}

/// Split a non-whitespace chunk into leading punctuation tokens, a core
/// token, and trailing punctuation tokens.
fn split_chunk(chars: &[char], start: usize, end: usize, tokens: &mut Vec<TokenSpan>) {
    let mut core_start = start;
    while core_start < end && PUNCTUATION.contains(&chars[core_start]) {
        tokens.push(TokenSpan {
            start: core_start,
            end: core_start + 1,
        });
        core_start += 1;
    }
    let mut core_end = end;
    let mut trailing = Vec::new();
    while core_end > core_start && PUNCTUATION.contains(&chars[core_end - 1]) {
        trailing.push(TokenSpan {
            start: core_end - 1,
            end: core_end,
        });
        core_end -= 1;
    }
    if core_start < core_end {
        tokens.push(TokenSpan {
            start: core_start,
            end: core_end,
        });
    }
    tokens.extend(trailing.into_iter().rev());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<TokenSpan> {
        RuleTokenizer.tokenize(text)
    }

    #[test]
    fn tokenizes_punctuation_separately() {
        let tokens = spans("Han betalte 200 kr.");
        // "Han" "betalte" "200" "kr" "."
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[3], TokenSpan { start: 16, end: 18 });
        assert_eq!(tokens[4], TokenSpan { start: 18, end: 19 });
    }

    #[test]
    fn quotes_become_tokens() {
        let tokens = spans("\"Ulysses\" er lang.");
        assert_eq!(tokens[0], TokenSpan { start: 0, end: 1 });
        assert_eq!(tokens[1], TokenSpan { start: 1, end: 8 });
        assert_eq!(tokens[2], TokenSpan { start: 8, end: 9 });
    }

    #[test]
    fn strict_requires_exact_boundaries() {
        let tokens = spans("Han betalte 200 kr");
        assert_eq!(
            char_span(&tokens, 12, 18, AlignmentMode::Strict),
            Some((12, 18))
        );
        // Mid-token start.
        assert_eq!(char_span(&tokens, 13, 18, AlignmentMode::Strict), None);
    }

    #[test]
    fn expand_widens_to_token_boundaries() {
        let tokens = spans("Han betalte 200 kr");
        assert_eq!(
            char_span(&tokens, 13, 17, AlignmentMode::Expand),
            Some((12, 18))
        );
    }

    #[test]
    fn expand_with_no_overlap_is_none() {
        let tokens = spans("ab cd");
        assert_eq!(char_span(&tokens, 2, 3, AlignmentMode::Expand), None);
    }

    #[test]
    fn lenient_labels_get_expand() {
        assert_eq!(
            alignment_mode_for(EntityLabel::Money, 10, 100),
            AlignmentMode::Expand
        );
        assert_eq!(
            alignment_mode_for(EntityLabel::Law, 10, 100),
            AlignmentMode::Expand
        );
        assert_eq!(
            alignment_mode_for(EntityLabel::Gpe, 10, 100),
            AlignmentMode::Strict
        );
        // Sentence-final spans are lenient regardless of label.
        assert_eq!(
            alignment_mode_for(EntityLabel::Gpe, 99, 100),
            AlignmentMode::Expand
        );
    }
}
