//! Raw document record

use serde::{Deserialize, Serialize};

/// A loaded source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique id derived from the file name
    pub id: String,

    /// Path the document was read from
    pub source: String,

    /// Full text content
    pub text: String,

    /// Reference URL (empty when unknown)
    #[serde(default)]
    pub doc_url: String,

    /// CVSS score, when the structured record carries one
    #[serde(default)]
    pub cvss: Option<f64>,
}

impl Document {
    /// Chunk id for the `index`-th chunk of this document
    pub fn chunk_id(&self, index: usize) -> String {
        format!("{}__{}", self.id, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_format() {
        let doc = Document {
            id: "CVE-2024-0001.json".into(),
            source: "data/CVE-2024-0001.json".into(),
            text: "text".into(),
            doc_url: String::new(),
            cvss: None,
        };
        assert_eq!(doc.chunk_id(0), "CVE-2024-0001.json__0");
        assert_eq!(doc.chunk_id(12), "CVE-2024-0001.json__12");
    }
}
