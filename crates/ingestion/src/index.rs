//! Precomputed chunk index
//!
//! A JSON list of chunk records, typically produced by `build-index` or an
//! external indexer. When present and non-empty it replaces the
//! loader + chunker pipeline for the whole process lifetime.

use crate::errors::IngestionError;
use drishti_common::models::{lenient_score, lenient_string};
use drishti_common::Chunk;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One record of the precomputed index file
///
/// Text fields accept strings, numbers or booleans; anything else reads as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub doc_source: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub doc_cvss: Option<f64>,

    #[serde(default, deserialize_with = "lenient_score", skip_serializing)]
    pub cvss: Option<f64>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub doc_title: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing)]
    pub title: Option<String>,

    #[serde(
        default,
        rename = "publishedDate",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<String>,
}

impl IndexRecord {
    /// Map to a [`Chunk`]; `None` when the record has no text
    ///
    /// `position` and `index_path` stand in for a missing id and source.
    pub fn into_chunk(self, position: usize, index_path: &Path) -> Option<Chunk> {
        let text = non_empty(self.text).filter(|t| !t.trim().is_empty())?;

        let file_name = index_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(Chunk {
            id: non_empty(self.id).unwrap_or_else(|| format!("{}__{}", file_name, position)),
            doc_id: self.doc_id.unwrap_or_default(),
            source: non_empty(self.doc_source).unwrap_or_else(|| index_path.display().to_string()),
            text,
            doc_url: non_empty(self.doc_url).or(non_empty(self.url)).unwrap_or_default(),
            cvss: self.doc_cvss.or(self.cvss),
            title: non_empty(self.doc_title).or(non_empty(self.title)),
            published_date: non_empty(self.published_date),
        })
    }
}

impl From<&Chunk> for IndexRecord {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: Some(chunk.id.clone()),
            doc_id: Some(chunk.doc_id.clone()),
            doc_source: Some(chunk.source.clone()),
            text: Some(chunk.text.clone()),
            doc_url: chunk.url().map(str::to_string),
            doc_cvss: chunk.cvss,
            doc_title: chunk.title.clone(),
            published_date: chunk.published_date.clone(),
            ..Self::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Load precomputed chunks; never fails, returns empty on any problem
pub fn load_indexed_chunks(index_path: &Path) -> Vec<Chunk> {
    if !index_path.is_file() {
        debug!(path = %index_path.display(), "No precomputed index");
        return Vec::new();
    }

    match read_index(index_path) {
        Ok(chunks) => {
            info!(path = %index_path.display(), chunks = chunks.len(), "Precomputed index loaded");
            chunks
        }
        Err(e) => {
            warn!(path = %index_path.display(), error = %e, "Failed to load index file");
            Vec::new()
        }
    }
}

/// Strict variant of [`load_indexed_chunks`]
pub fn read_index(index_path: &Path) -> Result<Vec<Chunk>, IngestionError> {
    let bytes = fs::read(index_path).map_err(|source| IngestionError::Read {
        path: index_path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_slice(&bytes).map_err(|source| IngestionError::Parse {
        path: index_path.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(IngestionError::IndexShape {
            path: index_path.to_path_buf(),
        });
    };

    let total = items.len();
    let chunks: Vec<Chunk> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value::<IndexRecord>(item) {
            Ok(record) => record.into_chunk(position, index_path),
            Err(e) => {
                warn!(path = %index_path.display(), position, error = %e, "Skipping malformed index record");
                None
            }
        })
        .collect();

    if chunks.len() < total {
        warn!(
            path = %index_path.display(),
            dropped = total - chunks.len(),
            "Index records without usable text dropped"
        );
    }

    Ok(chunks)
}

/// Write chunks in the precomputed index format
pub fn write_index(chunks: &[Chunk], index_path: &Path) -> Result<(), IngestionError> {
    let records: Vec<IndexRecord> = chunks.iter().map(IndexRecord::from).collect();
    let json = serde_json::to_vec_pretty(&records)?;

    fs::write(index_path, json).map_err(|source| IngestionError::Write {
        path: index_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INDEX: &str = "vulnerability_index_metadata.json";

    #[test]
    fn test_missing_index_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_indexed_chunks(&dir.path().join(INDEX)).is_empty());
    }

    #[test]
    fn test_records_map_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX);
        fs::write(
            &path,
            r#"[
                {"id": "cve-1__0", "doc_id": "cve-1", "doc_source": "nvd/cve-1.json",
                 "text": "Stack overflow in login handler.", "doc_url": "https://nvd.example/cve-1",
                 "doc_cvss": 8.1, "doc_title": "CVE-1", "publishedDate": "2024-03-01"},
                {"text": "Second record with nothing else.", "url": "https://alt.example", "doc_cvss": "6.5"},
                {"id": "empty", "text": "   "}
            ]"#,
        )
        .unwrap();

        let chunks = load_indexed_chunks(&path);
        assert_eq!(chunks.len(), 2);

        assert_eq!(chunks[0].id, "cve-1__0");
        assert_eq!(chunks[0].source, "nvd/cve-1.json");
        assert_eq!(chunks[0].cvss, Some(8.1));
        assert_eq!(chunks[0].title.as_deref(), Some("CVE-1"));
        assert_eq!(chunks[0].published_date.as_deref(), Some("2024-03-01"));

        assert_eq!(chunks[1].id, format!("{}__1", INDEX));
        assert_eq!(chunks[1].doc_id, "");
        assert_eq!(chunks[1].source, path.display().to_string());
        assert_eq!(chunks[1].doc_url, "https://alt.example");
        assert_eq!(chunks[1].cvss, Some(6.5));
        assert!(chunks[1].title.is_none());
    }

    #[test]
    fn test_loosely_typed_records_keep_the_rest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX);
        fs::write(
            &path,
            r#"[
                {"id": "ok", "text": "Rotate signing keys."},
                {"id": 7, "doc_id": 42, "text": "Numeric ids are stringified.", "doc_title": null},
                {"id": "nulltext", "text": null},
                "not a record",
                {"id": "tail", "text": "Still loaded after a bad record.", "doc_url": ["x"]}
            ]"#,
        )
        .unwrap();

        let chunks = read_index(&path).unwrap();
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "7", "tail"]);
        assert_eq!(chunks[1].doc_id, "42");
        assert!(chunks[1].title.is_none());
        assert_eq!(chunks[2].doc_url, "");
    }

    #[test]
    fn test_parse_failure_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX);
        fs::write(&path, "[{\"text\": ").unwrap();
        assert!(load_indexed_chunks(&path).is_empty());

        fs::write(&path, r#"{"text": "not a list"}"#).unwrap();
        assert!(matches!(read_index(&path), Err(IngestionError::IndexShape { .. })));
        assert!(load_indexed_chunks(&path).is_empty());
    }

    #[test]
    fn test_written_index_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(INDEX);
        let chunk = Chunk {
            id: "notes.txt__0".into(),
            doc_id: "notes.txt".into(),
            source: "data/notes.txt".into(),
            text: "Rotate credentials quarterly.".into(),
            doc_url: String::new(),
            cvss: Some(4.3),
            title: None,
            published_date: None,
        };

        write_index(std::slice::from_ref(&chunk), &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"doc_source\""));
        assert!(!raw.contains("\"doc_url\""));

        assert_eq!(read_index(&path).unwrap(), vec![chunk]);
    }
}
