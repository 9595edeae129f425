//! Retrieval chunk

use crate::models::Document;
use serde::{Deserialize, Deserializer, Serialize};

/// A bounded span of document text, the unit of retrieval
///
/// Chunks built from freshly loaded documents never carry `title` or
/// `published_date`; only the precomputed index supplies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `<doc_id>__<index>` or the id supplied by the precomputed index
    pub id: String,

    /// Owning document id
    #[serde(default)]
    pub doc_id: String,

    /// Path of the source document
    #[serde(default)]
    pub source: String,

    /// Chunk text (never empty)
    pub text: String,

    /// Reference URL (empty when unknown)
    #[serde(default)]
    pub doc_url: String,

    /// CVSS score
    #[serde(default, deserialize_with = "lenient_score")]
    pub cvss: Option<f64>,

    /// Document title
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date as supplied by the index
    #[serde(default, rename = "publishedDate")]
    pub published_date: Option<String>,
}

impl Chunk {
    /// Build the `index`-th chunk of `doc`
    pub fn from_document(doc: &Document, index: usize, text: String) -> Self {
        Self {
            id: doc.chunk_id(index),
            doc_id: doc.id.clone(),
            source: doc.source.clone(),
            text,
            doc_url: doc.doc_url.clone(),
            cvss: doc.cvss,
            title: None,
            published_date: None,
        }
    }

    /// URL as reported to clients (`None` when empty)
    pub fn url(&self) -> Option<&str> {
        Some(self.doc_url.as_str()).filter(|u| !u.is_empty())
    }
}

/// Accept a score given as a JSON number or a numeric string
pub fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| score_from_value(&v)))
}

/// Accept a text field given as a JSON string, number or boolean
///
/// Nulls, arrays and objects read as absent.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}

/// Numeric value of a JSON number or numeric string
pub fn score_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
