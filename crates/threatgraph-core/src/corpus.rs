use std::path::Path;

use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One input row: a threat-actor group with its free-text descriptions.
/// Immutable once loaded; `row_id` is the 1-indexed input row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub row_id: usize,
    pub group_name: String,
    pub source_url: String,
    pub description: String,
    pub usage_text: String,
}

impl DocumentRecord {
    /// Text every downstream stage operates on.
    #[must_use]
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.description, self.usage_text)
    }

    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        self.description.trim().is_empty() && self.usage_text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoaderStats {
    pub rows_read: usize,
    /// Rows whose description and usage text were both blank. Counted, not
    /// dropped: they simply yield zero mentions downstream.
    pub empty_documents: usize,
}

#[derive(Debug, Clone)]
pub struct Corpus {
    pub documents: Vec<DocumentRecord>,
    pub stats: LoaderStats,
}

/// Decode fallback order. UTF-8 and GBK reject invalid input; Windows-1252
/// accepts any byte sequence, so the chain always terminates.
const ENCODINGS: [&Encoding; 3] = [UTF_8, GBK, WINDOWS_1252];

const COL_GROUP: &str = "group_name";
const COL_URL: &str = "source_url";
const COL_DESCRIPTION: &str = "description";
const COL_USAGE: &str = "usage_text";

pub struct CorpusLoader;

impl CorpusLoader {
    /// Read a CSV corpus from disk, attempting each supported encoding in
    /// fixed order and accepting the first that decodes cleanly.
    pub fn load_path(path: &Path) -> Result<Corpus> {
        let bytes = std::fs::read(path)?;
        Self::load_bytes(&bytes)
    }

    pub fn load_bytes(bytes: &[u8]) -> Result<Corpus> {
        let text = decode(bytes)?;
        Self::load_str(&text)
    }

    pub fn load_str(text: &str) -> Result<Corpus> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::MissingHeader);
        }

        let group_idx = require_column(&headers, COL_GROUP)?;
        let url_idx = require_column(&headers, COL_URL)?;
        let description_idx = find_column(&headers, COL_DESCRIPTION);
        let usage_idx = find_column(&headers, COL_USAGE);

        let mut documents = Vec::new();
        let mut stats = LoaderStats::default();

        for (i, row) in reader.records().enumerate() {
            let row = row?;
            let record = DocumentRecord {
                row_id: i + 1,
                group_name: field(&row, Some(group_idx)),
                source_url: field(&row, Some(url_idx)),
                description: field(&row, description_idx),
                usage_text: field(&row, usage_idx),
            };

            stats.rows_read += 1;
            if record.is_empty_text() {
                stats.empty_documents += 1;
            }

            tracing::debug!(row_id = record.row_id, group = %record.group_name, "loaded record");
            documents.push(record);
        }

        Ok(Corpus { documents, stats })
    }
}

fn decode(bytes: &[u8]) -> Result<String> {
    for encoding in ENCODINGS {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            tracing::debug!(encoding = encoding.name(), "decoded corpus");
            return Ok(text.into_owned());
        }
    }

    let tried = ENCODINGS
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::UndecodableCorpus(tried))
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn require_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| Error::MissingColumn(name.to_string()))
}

/// Missing or absent cells become empty strings, never an error. Cell
/// content is taken verbatim; surrounding whitespace stays in place so
/// sentence offsets and evidence text match the raw input.
fn field(row: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i)).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "group_name,source_url,description,usage_text\n\
        APT29,https://attack.mitre.org/groups/G0016/,APT29 has used Mimikatz.,spearphishing campaigns\n\
        Lazarus Group,https://attack.mitre.org/groups/G0032/,,\n";

    #[test]
    fn loads_rows_in_order() {
        let corpus = CorpusLoader::load_str(SAMPLE).unwrap();
        assert_eq!(corpus.documents.len(), 2);
        assert_eq!(corpus.documents[0].row_id, 1);
        assert_eq!(corpus.documents[0].group_name, "APT29");
        assert_eq!(corpus.documents[1].row_id, 2);
        assert_eq!(corpus.documents[1].group_name, "Lazarus Group");
    }

    #[test]
    fn blank_text_fields_become_empty_strings() {
        let corpus = CorpusLoader::load_str(SAMPLE).unwrap();
        let lazarus = &corpus.documents[1];
        assert_eq!(lazarus.description, "");
        assert_eq!(lazarus.usage_text, "");
        assert!(lazarus.is_empty_text());
        assert_eq!(corpus.stats.rows_read, 2);
        assert_eq!(corpus.stats.empty_documents, 1);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let corpus =
            CorpusLoader::load_str("group_name,source_url\nAPT1,https://example.org/apt1\n")
                .unwrap();
        assert_eq!(corpus.documents[0].description, "");
        assert_eq!(corpus.documents[0].combined_text(), " ");
    }

    #[test]
    fn cell_whitespace_is_preserved() {
        let corpus = CorpusLoader::load_str(
            "group_name,source_url,description,usage_text\n\
             APT1,https://example.org/apt1,\"  padded description  \",tail\n",
        )
        .unwrap();
        assert_eq!(corpus.documents[0].description, "  padded description  ");
        assert_eq!(
            corpus.documents[0].combined_text(),
            "  padded description   tail"
        );
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let err = CorpusLoader::load_str("group_name,description\nAPT1,text\n").unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "source_url"));
    }

    #[test]
    fn decodes_gbk_fallback() {
        // "描述" encoded as GBK inside an otherwise ASCII CSV; invalid UTF-8.
        let mut bytes = b"group_name,source_url,description,usage_text\nAPT41,https://example.org,".to_vec();
        bytes.extend_from_slice(&[0xC3, 0xE8, 0xCA, 0xF6]);
        bytes.extend_from_slice(b",\n");

        let corpus = CorpusLoader::load_bytes(&bytes).unwrap();
        assert_eq!(corpus.documents[0].description, "\u{63cf}\u{8ff0}");
    }

    #[test]
    fn combined_text_joins_with_space() {
        let record = DocumentRecord {
            row_id: 1,
            group_name: "G".into(),
            source_url: "u".into(),
            description: "first part".into(),
            usage_text: "second part".into(),
        };
        assert_eq!(record.combined_text(), "first part second part");
    }
}
