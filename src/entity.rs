//! Entity types and annotation structures.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Entity label classification.
///
/// Closed set following the OntoNotes-style scheme the corpus is annotated
/// with. `Multiple` is a composite annotation-intent type that never survives
/// into serialized output (it decomposes into two constituents at
/// composition time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    Date,
    Money,
    Percent,
    Quantity,
    Person,
    Event,
    Facility,
    Gpe,
    Language,
    Law,
    Location,
    Norp,
    Ordinal,
    Organization,
    Product,
    Time,
    WorkOfArt,
    Cardinal,
    Multiple,
}

impl EntityLabel {
    /// All labels, in the order entity list tables are loaded.
    pub const ALL: [EntityLabel; 19] = [
        EntityLabel::Date,
        EntityLabel::Money,
        EntityLabel::Percent,
        EntityLabel::Quantity,
        EntityLabel::Person,
        EntityLabel::Event,
        EntityLabel::Facility,
        EntityLabel::Gpe,
        EntityLabel::Language,
        EntityLabel::Law,
        EntityLabel::Location,
        EntityLabel::Norp,
        EntityLabel::Ordinal,
        EntityLabel::Organization,
        EntityLabel::Product,
        EntityLabel::Time,
        EntityLabel::WorkOfArt,
        EntityLabel::Cardinal,
        EntityLabel::Multiple,
    ];

    /// Convert to the label string used in annotation files and reports.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            EntityLabel::Date => "DATE",
            EntityLabel::Money => "MONEY",
            EntityLabel::Percent => "PERCENT",
            EntityLabel::Quantity => "QUANTITY",
            EntityLabel::Person => "PERSON",
            EntityLabel::Event => "EVENT",
            EntityLabel::Facility => "FACILITY",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Language => "LANGUAGE",
            EntityLabel::Law => "LAW",
            EntityLabel::Location => "LOCATION",
            EntityLabel::Norp => "NORP",
            EntityLabel::Ordinal => "ORDINAL",
            EntityLabel::Organization => "ORGANIZATION",
            EntityLabel::Product => "PRODUCT",
            EntityLabel::Time => "TIME",
            EntityLabel::WorkOfArt => "WORK OF ART",
            EntityLabel::Cardinal => "CARDINAL",
            EntityLabel::Multiple => "MULTIPLE",
        }
    }

    /// Parse from a label string. Unknown labels are a parse error so that a
    /// typo in an input table cannot silently become its own category in the
    /// label-distribution report.
    pub fn from_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_uppercase().replace('_', " ");
        match normalized.as_str() {
            "DATE" => Ok(EntityLabel::Date),
            "MONEY" => Ok(EntityLabel::Money),
            "PERCENT" => Ok(EntityLabel::Percent),
            "QUANTITY" => Ok(EntityLabel::Quantity),
            "PERSON" => Ok(EntityLabel::Person),
            "EVENT" => Ok(EntityLabel::Event),
            "FACILITY" => Ok(EntityLabel::Facility),
            "GPE" => Ok(EntityLabel::Gpe),
            "LANGUAGE" => Ok(EntityLabel::Language),
            "LAW" => Ok(EntityLabel::Law),
            "LOCATION" => Ok(EntityLabel::Location),
            "NORP" => Ok(EntityLabel::Norp),
            "ORDINAL" => Ok(EntityLabel::Ordinal),
            "ORGANIZATION" => Ok(EntityLabel::Organization),
            "PRODUCT" => Ok(EntityLabel::Product),
            "TIME" => Ok(EntityLabel::Time),
            "WORK OF ART" => Ok(EntityLabel::WorkOfArt),
            "CARDINAL" => Ok(EntityLabel::Cardinal),
            "MULTIPLE" => Ok(EntityLabel::Multiple),
            other => Err(Error::parse(format!("unknown entity label: {other:?}"))),
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// One sampleable entity value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Literal surface string injected into a sentence.
    pub text: String,
    /// Entity label.
    pub label: EntityLabel,
    /// Relative sampling frequency. Expanding the pool by weight produces
    /// exactly `weight` duplicate rows.
    pub weight: u32,
    /// Disambiguating context hint, rendered as a `{...}` suffix in example
    /// lines; never part of sentence content.
    pub context: Option<String>,
}

impl EntityRecord {
    /// Create a record with weight 1 and no context (the shape every
    /// generated pool item takes).
    #[must_use]
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
            weight: 1,
            context: None,
        }
    }

    /// Attach a context hint.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the sampling weight.
    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

/// A composite record of two co-occurring entities.
///
/// Always decomposed into its constituents when sampled; a `MULTIPLE` label
/// must never reach serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleRecord {
    pub first: EntityRecord,
    pub second: EntityRecord,
    pub weight: u32,
    pub context: Option<String>,
}

impl MultipleRecord {
    /// Build a composite record, rejecting nested `Multiple` constituents.
    pub fn new(first: EntityRecord, second: EntityRecord) -> Result<Self> {
        if first.label == EntityLabel::Multiple || second.label == EntityLabel::Multiple {
            return Err(Error::parse(
                "MULTIPLE constituents must be concrete entity types",
            ));
        }
        Ok(Self {
            first,
            second,
            weight: 1,
            context: None,
        })
    }

    /// Decompose into the two constituent records.
    #[must_use]
    pub fn decompose(&self) -> (EntityRecord, EntityRecord) {
        (self.first.clone(), self.second.clone())
    }
}

/// One annotation intent: an entity expected to occur in a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub label: EntityLabel,
    pub text: String,
    pub context: Option<String>,
}

impl Intent {
    #[must_use]
    pub fn new(label: EntityLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
            context: None,
        }
    }
}

/// A labeled character span within a sentence. Half-open, char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub start: usize,
    pub end: usize,
    pub label: EntityLabel,
}

impl EntityMention {
    #[must_use]
    pub fn new(start: usize, end: usize, label: EntityLabel) -> Self {
        Self { start, end, label }
    }

    /// Check if this mention overlaps another.
    #[must_use]
    pub fn overlaps(&self, other: &EntityMention) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }
}

/// A sentence with its reconciled entity mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub text: String,
    /// Sorted by start offset, non-overlapping.
    pub mentions: Vec<EntityMention>,
}

impl AnnotatedSentence {
    #[must_use]
    pub fn new(text: impl Into<String>, mut mentions: Vec<EntityMention>) -> Self {
        mentions.sort_by_key(|m| (m.start, m.end));
        Self {
            text: text.into(),
            mentions,
        }
    }

    /// Validate the mention invariants: ordering, non-overlap, bounds.
    pub fn validate(&self) -> Result<()> {
        let len = self.text.chars().count();
        for pair in self.mentions.windows(2) {
            if pair[1].start < pair[0].start {
                return Err(Error::dataset("mentions not sorted by start offset"));
            }
            if pair[0].overlaps(&pair[1]) {
                return Err(Error::dataset(format!(
                    "overlapping mentions: {:?} and {:?}",
                    pair[0], pair[1]
                )));
            }
        }
        for m in &self.mentions {
            if m.start >= m.end || m.end > len {
                return Err(Error::dataset(format!(
                    "mention out of bounds: {m:?} in sentence of {len} chars"
                )));
            }
            if m.label == EntityLabel::Multiple {
                return Err(Error::dataset("MULTIPLE label in serialized mentions"));
            }
        }
        Ok(())
    }

    /// Surface text of a mention, by char offsets.
    #[must_use]
    pub fn mention_text(&self, m: &EntityMention) -> String {
        self.text
            .chars()
            .skip(m.start)
            .take(m.end - m.start)
            .collect()
    }
}

/// Expand a pool by weight: each record appears exactly `weight` times with
/// weight reset to 1.
#[must_use]
pub fn expand_by_weight(pool: &[EntityRecord]) -> Vec<EntityRecord> {
    let mut expanded = Vec::with_capacity(pool.iter().map(|r| r.weight as usize).sum());
    for record in pool {
        for _ in 0..record.weight {
            let mut copy = record.clone();
            copy.weight = 1;
            expanded.push(copy);
        }
    }
    expanded
}
