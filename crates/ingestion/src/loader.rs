//! Corpus loader
//!
//! Reads every regular file of a directory into a [`Document`]:
//! - `.json` files are parsed and every scalar is flattened into the text
//! - anything else is read as text, replacing invalid UTF-8
//!
//! Per-file failures are logged and skipped so one bad file never aborts a load.

use crate::errors::IngestionError;
use drishti_common::models::score_from_value;
use drishti_common::Document;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load all documents under `data_dir`, sorted by file name
pub fn load_documents(data_dir: &Path) -> Vec<Document> {
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %data_dir.display(), error = %e, "Corpus directory unreadable, loading nothing");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        match load_document(path) {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => debug!(path = %path.display(), "Skipping empty document"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to load document"),
        }
    }

    info!(
        path = %data_dir.display(),
        files = paths.len(),
        documents = documents.len(),
        "Corpus loaded"
    );

    documents
}

/// Load a single file; `Ok(None)` when it holds no text
pub fn load_document(path: &Path) -> Result<Option<Document>, IngestionError> {
    let bytes = fs::read(path).map_err(|source| IngestionError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, doc_url, cvss) = if is_structured(path) {
        let value: Value = serde_json::from_slice(&bytes).map_err(|source| IngestionError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let (doc_url, cvss) = top_level_metadata(&value);
        (extract_text(&value), doc_url, cvss)
    } else {
        (String::from_utf8_lossy(&bytes).into_owned(), String::new(), None)
    };

    if text.trim().is_empty() {
        return Ok(None);
    }

    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Some(Document {
        id,
        source: path.display().to_string(),
        text,
        doc_url,
        cvss,
    }))
}

fn is_structured(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// `doc_url`/`url` and `cvss`/`doc_cvss` from a top-level object
fn top_level_metadata(value: &Value) -> (String, Option<f64>) {
    let Some(object) = value.as_object() else {
        return (String::new(), None);
    };

    let doc_url = ["doc_url", "url"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .find(|url| !url.is_empty())
        .unwrap_or_default()
        .to_string();

    let cvss = ["cvss", "doc_cvss"]
        .iter()
        .find_map(|key| object.get(*key).and_then(score_from_value));

    (doc_url, cvss)
}

/// Flatten a JSON value into text, depth first, one line per scalar
///
/// Arrays and objects are traversed in their stored order; numbers and
/// booleans are rendered, nulls contribute an empty line.
pub fn extract_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(extract_text).collect::<Vec<_>>().join("\n"),
        Value::Object(map) => map.values().map(extract_text).collect::<Vec<_>>().join("\n"),
    }
}
