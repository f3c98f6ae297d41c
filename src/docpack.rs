//! Binary document-collection serialization.
//!
//! The training toolkit consumes corpora as a binary container of tokenized,
//! span-annotated documents. Layout: `NDPK` magic, a format version, a
//! document count, then one length-prefixed JSON document per sentence.
//! Bit-exactness across tool versions is not promised; offsets within one
//! run are internally consistent.

use crate::align::{alignment_mode_for, char_span, TokenSpan, Tokenizer};
use crate::entity::{AnnotatedSentence, EntityLabel, EntityMention};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::warn;

const MAGIC: &[u8; 4] = b"NDPK";
const VERSION: u16 = 1;

/// One serialized document: text, token spans, and token-aligned mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub tokens: Vec<TokenSpan>,
    pub mentions: Vec<EntityMention>,
}

/// A mention rejected by strict token alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignFailure {
    pub row: usize,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Outcome of serializing one split.
#[derive(Debug, Clone, Default)]
pub struct PackSummary {
    pub documents: usize,
    pub mentions: usize,
    pub align_failures: Vec<AlignFailure>,
}

/// Tokenize and align each sentence, then write the container.
///
/// Strict-mode alignment failures drop the mention (never the sentence) and
/// are reported in the summary.
pub fn write_docpack(
    path: &Path,
    sentences: &[AnnotatedSentence],
    tokenizer: &dyn Tokenizer,
) -> Result<PackSummary> {
    let mut summary = PackSummary::default();
    let mut documents = Vec::with_capacity(sentences.len());

    for (row, sentence) in sentences.iter().enumerate() {
        let tokens = tokenizer.tokenize(&sentence.text);
        let text_len = sentence.text.chars().count();
        let mut aligned = Vec::with_capacity(sentence.mentions.len());

        for mention in &sentence.mentions {
            let mode = alignment_mode_for(mention.label, mention.end, text_len);
            match char_span(&tokens, mention.start, mention.end, mode) {
                Some((start, end)) => {
                    aligned.push(EntityMention::new(start, end, mention.label));
                }
                None => {
                    warn!(
                        row,
                        label = %mention.label,
                        start = mention.start,
                        end = mention.end,
                        "span does not align to token boundaries"
                    );
                    summary.align_failures.push(AlignFailure {
                        row,
                        label: mention.label,
                        start: mention.start,
                        end: mention.end,
                    });
                }
            }
        }

        summary.mentions += aligned.len();
        documents.push(Document {
            text: sentence.text.clone(),
            tokens,
            mentions: aligned,
        });
    }
    summary.documents = documents.len();

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&(documents.len() as u32).to_le_bytes())?;
    for document in &documents {
        let payload = serde_json::to_vec(document)?;
        writer.write_all(&(payload.len() as u32).to_le_bytes())?;
        writer.write_all(&payload)?;
    }
    writer.flush()?;
    Ok(summary)
}

/// Read a container back into documents.
pub fn read_docpack(path: &Path) -> Result<Vec<Document>> {
    if !path.exists() {
        return Err(Error::input_missing(path));
    }
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::dataset("not a document-collection file"));
    }
    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    if u16::from_le_bytes(version) != VERSION {
        return Err(Error::dataset(format!(
            "unsupported document-collection version {}",
            u16::from_le_bytes(version)
        )));
    }
    let mut count = [0u8; 4];
    reader.read_exact(&mut count)?;
    let count = u32::from_le_bytes(count) as usize;

    let mut documents = Vec::with_capacity(count);
    for _ in 0..count {
        let mut len = [0u8; 4];
        reader.read_exact(&mut len)?;
        let mut payload = vec![0u8; u32::from_le_bytes(len) as usize];
        reader.read_exact(&mut payload)?;
        documents.push(serde_json::from_slice(&payload)?);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::RuleTokenizer;

    #[test]
    fn round_trip_preserves_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.ndpk");
        let sentences = vec![
            AnnotatedSentence::new(
                "Han betalte 200 kr for billetten.",
                vec![EntityMention::new(12, 18, EntityLabel::Money)],
            ),
            AnnotatedSentence::new("Ingen entiteter her.", vec![]),
        ];
        let summary = write_docpack(&path, &sentences, &RuleTokenizer).unwrap();
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.mentions, 1);
        assert!(summary.align_failures.is_empty());

        let documents = read_docpack(&path).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].mentions[0].start, 12);
        assert_eq!(documents[0].mentions[0].end, 18);
    }

    #[test]
    fn strict_misalignment_drops_mention_not_sentence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev.ndpk");
        // GPE is strict; a mid-token span cannot align.
        let sentences = vec![AnnotatedSentence::new(
            "Mødet holdes i København i næste uge.",
            vec![EntityMention::new(16, 20, EntityLabel::Gpe)],
        )];
        let summary = write_docpack(&path, &sentences, &RuleTokenizer).unwrap();
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.mentions, 0);
        assert_eq!(summary.align_failures.len(), 1);

        let documents = read_docpack(&path).unwrap();
        assert!(documents[0].mentions.is_empty());
    }

    #[test]
    fn expand_mode_snaps_money_spans() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.ndpk");
        let sentences = vec![AnnotatedSentence::new(
            "Prisen var 200 kr i går.",
            vec![EntityMention::new(11, 17, EntityLabel::Money)],
        )];
        let summary = write_docpack(&path, &sentences, &RuleTokenizer).unwrap();
        assert!(summary.align_failures.is_empty());
        let documents = read_docpack(&path).unwrap();
        assert_eq!(documents[0].mentions[0].start, 11);
        assert_eq!(documents[0].mentions[0].end, 17);
    }

    #[test]
    fn missing_file_is_input_missing() {
        let err = read_docpack(Path::new("/nonexistent/x.ndpk")).unwrap_err();
        assert!(matches!(err, Error::InputMissing(_)));
    }
}
