//! Descriptive statistics over generated pools and annotated tables.
//!
//! Two reports: the entity overview (how the generated pool distributes over
//! labels, and how much of it is unique) and the annotation audit (how many
//! rows a human edited, and which generation error categories occurred).

use crate::entity::{EntityLabel, EntityRecord};
use crate::io::SentenceRow;
use std::collections::{HashMap, HashSet};

/// Per-label slice of the entity overview.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOverview {
    pub label: EntityLabel,
    pub count: usize,
    pub share: f64,
    pub unique: usize,
    pub unique_share: f64,
}

/// Compute the per-label overview of a weight-expanded pool, sorted
/// descending by count (ties broken by label name).
#[must_use]
pub fn entity_overview(expanded: &[EntityRecord]) -> Vec<LabelOverview> {
    let total = expanded.len();
    let mut counts: HashMap<EntityLabel, usize> = HashMap::new();
    let mut uniques: HashMap<EntityLabel, HashSet<&str>> = HashMap::new();
    for record in expanded {
        *counts.entry(record.label).or_insert(0) += 1;
        uniques.entry(record.label).or_default().insert(&record.text);
    }

    let mut overview: Vec<LabelOverview> = counts
        .into_iter()
        .map(|(label, count)| {
            let unique = uniques.get(&label).map_or(0, HashSet::len);
            LabelOverview {
                label,
                count,
                share: percentage(count, total),
                unique,
                unique_share: percentage(unique, count),
            }
        })
        .collect();
    overview.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.label.as_label().cmp(b.label.as_label()))
    });
    overview
}

/// Render the overview as an aligned text table.
#[must_use]
pub fn overview_report(overview: &[LabelOverview], total: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("ENTITY OVERVIEW ({total} entities)\n"));
    out.push_str(&format!(
        "{:<14} {:>7} {:>7} {:>7} {:>9}\n",
        "label", "count", "pct", "unique", "uniq pct"
    ));
    for row in overview {
        out.push_str(&format!(
            "{:<14} {:>7} {:>6.1}% {:>7} {:>8.1}%\n",
            row.label.as_label(),
            row.count,
            row.share,
            row.unique,
            row.unique_share
        ));
    }
    out
}

/// Audit of the human-reviewed sentence table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationAudit {
    pub rows: usize,
    pub changed: usize,
    pub changed_share: f64,
    /// Error category counts; rows flagged with several `+`-joined
    /// categories are collapsed into `multiple`.
    pub error_types: Vec<(String, usize)>,
}

/// Compute the annotation audit over sentence rows.
#[must_use]
pub fn annotation_audit(rows: &[SentenceRow]) -> AnnotationAudit {
    let changed = rows.iter().filter(|r| r.changed.is_some()).count();
    let mut errors: HashMap<String, usize> = HashMap::new();
    for row in rows {
        if let Some(kind) = &row.error_type {
            let key = if kind.contains('+') {
                "multiple".to_string()
            } else {
                kind.trim().to_lowercase()
            };
            *errors.entry(key).or_insert(0) += 1;
        }
    }
    let mut error_types: Vec<(String, usize)> = errors.into_iter().collect();
    error_types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    AnnotationAudit {
        rows: rows.len(),
        changed,
        changed_share: percentage(changed, rows.len()),
        error_types,
    }
}

/// Render the audit as text.
#[must_use]
pub fn audit_report(audit: &AnnotationAudit) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "ANNOTATION AUDIT ({} rows)\nchanged: {} ({:.1}%)\n",
        audit.rows, audit.changed, audit.changed_share
    ));
    if !audit.error_types.is_empty() {
        out.push_str("error types:\n");
        for (kind, count) in &audit.error_types {
            out.push_str(&format!("  {kind}: {count}\n"));
        }
    }
    out
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
