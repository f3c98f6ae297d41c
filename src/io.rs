//! Input/output for the tabular formats the pipeline consumes and produces.
//!
//! Inputs: per-type entity list CSVs, the MONEY and MULTIPLE lists with
//! their extra columns, whitespace-separated name-frequency tables, and the
//! annotated-sentence table. Outputs: generated entity CSVs, the expanded
//! overview, the labelled dataset, and report text files.
//!
//! The CSV layer implements the minimal quoted-field subset these formats
//! need (commas and quotes inside fields; no embedded newlines).

use crate::entity::{
    AnnotatedSentence, EntityLabel, EntityMention, EntityRecord, Intent, MultipleRecord,
};
use crate::gen::money::{CurrencySpec, Placement};
use crate::gen::person::NameEntry;
use crate::gen::quantity::UnitSpec;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// =============================================================================
// Minimal CSV
// =============================================================================

/// Parse one CSV line into fields, honoring double-quoted fields with
/// doubled-quote escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Quote a field when it contains a comma or quote.
fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Read a CSV file into header + rows. A missing file is fatal.
pub fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    if !path.exists() {
        return Err(Error::input_missing(path));
    }
    let raw = fs::read_to_string(path)?;
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .map(parse_csv_line)
        .ok_or_else(|| Error::parse(format!("empty CSV: {}", path.display())))?;
    let rows = lines.map(parse_csv_line).collect();
    Ok((header, rows))
}

/// Write header + rows as CSV.
pub fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

fn column<'a>(header: &[String], row: &'a [String], name: &str, path: &Path) -> Result<&'a str> {
    let idx = header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            Error::parse(format!("missing column {name:?} in {}", path.display()))
        })?;
    Ok(row.get(idx).map(|s| s.as_str()).unwrap_or(""))
}

fn parse_weight(raw: &str) -> Result<u32> {
    if raw.trim().is_empty() {
        return Ok(1);
    }
    let weight: u32 = raw
        .trim()
        .parse()
        .map_err(|_| Error::parse(format!("bad weight: {raw:?}")))?;
    if weight == 0 {
        return Err(Error::parse("weight must be positive"));
    }
    Ok(weight)
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn yes_no(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("yes")
}

// =============================================================================
// Entity list tables
// =============================================================================

/// Read one entity list file (`entity,weight,context`) for a given label.
pub fn read_entity_list(path: &Path, label: EntityLabel) -> Result<Vec<EntityRecord>> {
    let (header, rows) = read_csv(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let text = column(&header, row, "entity", path)?;
        if text.trim().is_empty() {
            continue;
        }
        records.push(EntityRecord {
            text: text.trim().to_string(),
            label,
            weight: parse_weight(column(&header, row, "weight", path)?)?,
            context: optional(column(&header, row, "context", path)?),
        });
    }
    Ok(records)
}

/// Read the MONEY currency list with its formatting metadata columns.
pub fn read_currency_list(path: &Path) -> Result<Vec<CurrencySpec>> {
    let (header, rows) = read_csv(path)?;
    let mut specs = Vec::with_capacity(rows.len());
    for row in &rows {
        let unit = column(&header, row, "entity", path)?;
        if unit.trim().is_empty() {
            continue;
        }
        specs.push(CurrencySpec {
            unit: unit.trim().to_string(),
            placement: Placement::parse(column(&header, row, "placement", path)?)?,
            only_single_quantity: yes_no(column(&header, row, "only_single_quantity", path)?),
            takes_number_word: yes_no(column(&header, row, "number_word", path)?),
            weight: parse_weight(column(&header, row, "weight", path)?)?,
        });
    }
    Ok(specs)
}

/// Read the QUANTITY unit list.
pub fn read_unit_list(path: &Path) -> Result<Vec<UnitSpec>> {
    let (header, rows) = read_csv(path)?;
    let mut units = Vec::with_capacity(rows.len());
    for row in &rows {
        let unit = column(&header, row, "entity", path)?;
        if unit.trim().is_empty() {
            continue;
        }
        units.push(UnitSpec {
            unit: unit.trim().to_string(),
            weight: parse_weight(column(&header, row, "weight", path)?)?,
        });
    }
    Ok(units)
}

/// Read the MULTIPLE composite list.
pub fn read_multiple_list(path: &Path) -> Result<Vec<MultipleRecord>> {
    let (header, rows) = read_csv(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let first_text = column(&header, row, "entity_1", path)?;
        if first_text.trim().is_empty() {
            continue;
        }
        let first = EntityRecord::new(
            first_text.trim(),
            EntityLabel::from_label(column(&header, row, "type_1", path)?)?,
        );
        let second = EntityRecord::new(
            column(&header, row, "entity_2", path)?.trim(),
            EntityLabel::from_label(column(&header, row, "type_2", path)?)?,
        );
        let mut record = MultipleRecord::new(first, second)?;
        record.context = optional(column(&header, row, "context", path)?);
        records.push(record);
    }
    Ok(records)
}

// =============================================================================
// Name-frequency tables
// =============================================================================

/// Read a whitespace-separated `name amount` table. First-name files carry
/// two leading metadata lines; pass `skip_lines = 2` for those.
pub fn read_name_table(path: &Path, skip_lines: usize) -> Result<Vec<NameEntry>> {
    if !path.exists() {
        return Err(Error::input_missing(path));
    }
    let raw = fs::read_to_string(path)?;
    let mut entries = Vec::new();
    for line in raw.lines().skip(skip_lines) {
        let mut parts = line.split_whitespace();
        let name = match parts.next() {
            Some(n) => n,
            None => continue,
        };
        let amount: u32 = parts
            .next()
            .ok_or_else(|| Error::parse(format!("name row without amount: {line:?}")))?
            .replace('.', "")
            .parse()
            .map_err(|_| Error::parse(format!("bad name amount in row: {line:?}")))?;
        entries.push(NameEntry {
            name: name.to_string(),
            amount,
        });
    }
    Ok(entries)
}

// =============================================================================
// Annotated-sentence tables
// =============================================================================

/// One row of the annotated-sentence table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRow {
    pub sentence: String,
    pub intents: Vec<Intent>,
    /// Audit flag: set when a human edited the generated sentence.
    pub changed: Option<String>,
    /// Generation error category, if the row was flagged.
    pub error_type: Option<String>,
}

static INTENT_CONTEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\{([^{}]*)\}\s*").unwrap());

/// Parse one `"TYPE: text {context}"` item into an intent.
fn parse_intent(raw: &str) -> Result<Intent> {
    let (label_part, rest) = raw
        .split_once(": ")
        .ok_or_else(|| Error::parse(format!("malformed entity item: {raw:?}")))?;
    let label = EntityLabel::from_label(label_part)?;
    let mut context = None;
    if let Some(caps) = INTENT_CONTEXT_RE.captures(rest) {
        if let Some(inner) = caps.get(1) {
            context = optional(inner.as_str());
        }
    }
    let text = INTENT_CONTEXT_RE.replace_all(rest, "").trim().to_string();
    if text.is_empty() {
        return Err(Error::parse(format!("entity item without text: {raw:?}")));
    }
    Ok(Intent {
        label,
        text,
        context,
    })
}

/// Read the sentence table (columns `sentences,entities,changed?` and
/// optional `type`). The `entities` cell holds a JSON string array of
/// `"TYPE: text {context}"` items; negative rows leave it empty.
pub fn read_sentence_table(path: &Path) -> Result<Vec<SentenceRow>> {
    let (header, rows) = read_csv(path)?;
    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        let sentence = column(&header, row, "sentences", path)?.trim().to_string();
        if sentence.is_empty() {
            continue;
        }
        let raw_entities = column(&header, row, "entities", path)?.trim().to_string();
        let intents = if raw_entities.is_empty() || raw_entities == "[]" {
            Vec::new()
        } else {
            let items: Vec<String> = serde_json::from_str(&raw_entities).map_err(|e| {
                Error::parse(format!("bad entities cell {raw_entities:?}: {e}"))
            })?;
            items
                .iter()
                .map(|item| parse_intent(item))
                .collect::<Result<Vec<Intent>>>()?
        };
        let changed = optional(column(&header, row, "changed?", path).unwrap_or(""));
        let error_type = optional(column(&header, row, "type", path).unwrap_or(""));
        out.push(SentenceRow {
            sentence,
            intents,
            changed,
            error_type,
        });
    }
    Ok(out)
}

// =============================================================================
// Output writers
// =============================================================================

/// Write a generated entity pool as `entity,weight,context`.
pub fn write_entity_csv(path: &Path, records: &[EntityRecord]) -> Result<()> {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.text.clone(),
                r.weight.to_string(),
                r.context.clone().unwrap_or_default(),
            ]
        })
        .collect();
    write_csv(path, &["entity", "weight", "context"], &rows)
}

/// Write the weight-expanded overview table (`entity,TYPE,context`).
pub fn write_overview_csv(path: &Path, expanded: &[EntityRecord]) -> Result<()> {
    let rows: Vec<Vec<String>> = expanded
        .iter()
        .map(|r| {
            vec![
                r.text.clone(),
                r.label.as_label().to_string(),
                r.context.clone().unwrap_or_default(),
            ]
        })
        .collect();
    write_csv(path, &["entity", "TYPE", "context"], &rows)
}

/// Read a weight-expanded overview table back (`entity,TYPE,context`).
pub fn read_overview_csv(path: &Path) -> Result<Vec<EntityRecord>> {
    let (header, rows) = read_csv(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let text = column(&header, row, "entity", path)?;
        if text.trim().is_empty() {
            continue;
        }
        records.push(EntityRecord {
            text: text.trim().to_string(),
            label: EntityLabel::from_label(column(&header, row, "TYPE", path)?)?,
            weight: 1,
            context: optional(column(&header, row, "context", path)?),
        });
    }
    Ok(records)
}

#[derive(Serialize)]
struct MentionCell<'a> {
    start: usize,
    end: usize,
    label: &'a str,
}

#[derive(Deserialize)]
struct MentionCellOwned {
    start: usize,
    end: usize,
    label: String,
}

/// Write the labelled dataset: one row per sentence, mentions JSON-encoded.
pub fn write_labelled_dataset(
    path: &Path,
    sentences: &[(String, Vec<EntityMention>)],
) -> Result<()> {
    let mut rows = Vec::with_capacity(sentences.len());
    for (text, mentions) in sentences {
        let cells: Vec<MentionCell<'_>> = mentions
            .iter()
            .map(|m| MentionCell {
                start: m.start,
                end: m.end,
                label: m.label.as_label(),
            })
            .collect();
        rows.push(vec![text.clone(), serde_json::to_string(&cells)?]);
    }
    write_csv(path, &["text", "ents"], &rows)
}

/// Read the labelled dataset back into annotated sentences.
pub fn read_labelled_dataset(path: &Path) -> Result<Vec<AnnotatedSentence>> {
    let (header, rows) = read_csv(path)?;
    let mut sentences = Vec::with_capacity(rows.len());
    for row in &rows {
        let text = column(&header, row, "text", path)?;
        if text.is_empty() {
            continue;
        }
        let raw = column(&header, row, "ents", path)?.trim();
        let cells: Vec<MentionCellOwned> = if raw.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(raw)
                .map_err(|e| Error::parse(format!("bad ents cell {raw:?}: {e}")))?
        };
        let mut mentions = Vec::with_capacity(cells.len());
        for cell in cells {
            mentions.push(EntityMention::new(
                cell.start,
                cell.end,
                EntityLabel::from_label(&cell.label)?,
            ));
        }
        let sentence = AnnotatedSentence::new(text, mentions);
        sentence.validate()?;
        sentences.push(sentence);
    }
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escaping_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let rows = vec![
            vec!["20 jul, 2021".to_string(), "1".to_string(), String::new()],
            vec!["han sagde \"nej\"".to_string(), "2".to_string(), "en, to".to_string()],
        ];
        write_csv(&path, &["entity", "weight", "context"], &rows).unwrap();
        let (header, parsed) = read_csv(&path).unwrap();
        assert_eq!(header, vec!["entity", "weight", "context"]);
        assert_eq!(parsed, rows);
    }

    #[test]
    fn entity_list_parses_weights_and_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpe.csv");
        std::fs::write(
            &path,
            "entity,weight,context\nAarhus,3,byen\nOdense,,\n",
        )
        .unwrap();
        let records = read_entity_list(&path, EntityLabel::Gpe).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].weight, 3);
        assert_eq!(records[0].context.as_deref(), Some("byen"));
        assert_eq!(records[1].weight, 1);
        assert_eq!(records[1].context, None);
    }

    #[test]
    fn missing_entity_file_is_fatal() {
        let err = read_entity_list(Path::new("/nonexistent/gpe.csv"), EntityLabel::Gpe)
            .unwrap_err();
        assert!(matches!(err, Error::InputMissing(_)));
    }

    #[test]
    fn zero_weight_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpe.csv");
        std::fs::write(&path, "entity,weight,context\nAarhus,0,\n").unwrap();
        assert!(read_entity_list(&path, EntityLabel::Gpe).is_err());
    }

    #[test]
    fn currency_list_parses_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("money.csv");
        std::fs::write(
            &path,
            "entity,weight,context,placement,only_single_quantity,number_word\n\
             kr,20,,after,NO,NO\nkroner,10,,both,NO,YES\n",
        )
        .unwrap();
        let specs = read_currency_list(&path).unwrap();
        assert_eq!(specs[0].placement, Placement::After);
        assert!(!specs[0].takes_number_word);
        assert_eq!(specs[1].placement, Placement::Both);
        assert!(specs[1].takes_number_word);
    }

    #[test]
    fn multiple_list_decomposes_to_constituents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multiple.csv");
        std::fs::write(
            &path,
            "entity_1,type_1,entity_2,type_2,context\n\
             Mette Frederiksen,PERSON,Folketinget,ORGANIZATION,politik\n",
        )
        .unwrap();
        let records = read_multiple_list(&path).unwrap();
        let (first, second) = records[0].decompose();
        assert_eq!(first.label, EntityLabel::Person);
        assert_eq!(second.text, "Folketinget");
        assert_eq!(records[0].context.as_deref(), Some("politik"));
    }

    #[test]
    fn name_table_skips_metadata_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("first_names.txt");
        std::fs::write(
            &path,
            "Danmarks Statistik 2023\nnavn antal\nANNE 45678\nMETTE 30123\n",
        )
        .unwrap();
        let entries = read_name_table(&path, 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ANNE");
        assert_eq!(entries[0].amount, 45678);
    }

    #[test]
    fn sentence_table_parses_intents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ents.csv");
        let entities = r#"["MONEY: 200 kr", "GPE: Aarhus {byen i Jylland}"]"#;
        let rows = vec![
            vec![
                "Han betalte 200 kr i Aarhus.".to_string(),
                entities.to_string(),
                String::new(),
            ],
            vec!["Ingen entiteter her.".to_string(), String::new(), "x".to_string()],
        ];
        write_csv(&path, &["sentences", "entities", "changed?"], &rows).unwrap();

        let parsed = read_sentence_table(&path).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].intents.len(), 2);
        assert_eq!(parsed[0].intents[0].label, EntityLabel::Money);
        assert_eq!(parsed[0].intents[1].text, "Aarhus");
        assert_eq!(
            parsed[0].intents[1].context.as_deref(),
            Some("byen i Jylland")
        );
        assert!(parsed[1].intents.is_empty());
        assert_eq!(parsed[1].changed.as_deref(), Some("x"));
    }

    #[test]
    fn labelled_dataset_encodes_mentions_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelled.csv");
        write_labelled_dataset(
            &path,
            &[(
                "Han betalte 200 kr.".to_string(),
                vec![EntityMention::new(12, 18, EntityLabel::Money)],
            )],
        )
        .unwrap();
        let (_, rows) = read_csv(&path).unwrap();
        assert!(rows[0][1].contains("\"start\":12"));
        assert!(rows[0][1].contains("\"label\":\"MONEY\""));
    }
}
