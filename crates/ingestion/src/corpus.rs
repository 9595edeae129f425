//! Startup corpus context
//!
//! Built exactly once before serving and shared read-only afterwards.

use crate::chunker::{build_chunks, ChunkingConfig};
use crate::index::load_indexed_chunks;
use crate::loader::load_documents;
use drishti_common::config::CorpusConfig;
use drishti_common::Chunk;
use std::fmt;
use std::time::Instant;
use tracing::{info, warn};

/// Where the chunk set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSource {
    /// Precomputed chunk-metadata file
    PrecomputedIndex,
    /// Loader + chunker over the raw documents
    Documents,
}

impl fmt::Display for ChunkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkSource::PrecomputedIndex => write!(f, "precomputed_index"),
            ChunkSource::Documents => write!(f, "documents"),
        }
    }
}

/// Immutable chunk set plus the counts reported by the health check
#[derive(Debug, Clone)]
pub struct Corpus {
    document_count: usize,
    chunks: Vec<Chunk>,
    source: ChunkSource,
}

impl Corpus {
    /// Load documents and chunks from `config.data_dir`
    ///
    /// A non-empty precomputed index replaces chunking entirely; the raw
    /// documents are still counted. A missing directory yields an empty corpus.
    pub fn build(config: &CorpusConfig) -> Self {
        let start = Instant::now();
        let data_dir = config.data_dir.as_path();

        if !data_dir.is_dir() {
            warn!(path = %data_dir.display(), "Data directory missing, starting with an empty corpus");
            return Self::from_chunks(Vec::new(), 0);
        }

        let documents = load_documents(data_dir);
        let indexed = load_indexed_chunks(&data_dir.join(&config.index_file));

        let corpus = if indexed.is_empty() {
            let chunks = build_chunks(&documents, &ChunkingConfig::from(config));
            Self {
                document_count: documents.len(),
                chunks,
                source: ChunkSource::Documents,
            }
        } else {
            Self {
                document_count: documents.len(),
                chunks: indexed,
                source: ChunkSource::PrecomputedIndex,
            }
        };

        info!(
            documents = corpus.document_count,
            chunks = corpus.chunks.len(),
            source = %corpus.source,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Corpus ready"
        );

        corpus
    }

    /// Wrap an existing chunk set
    pub fn from_chunks(chunks: Vec<Chunk>, document_count: usize) -> Self {
        Self {
            document_count,
            chunks,
            source: ChunkSource::Documents,
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn source(&self) -> ChunkSource {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> CorpusConfig {
        CorpusConfig {
            data_dir: dir.path().to_path_buf(),
            chunk_words: 4,
            chunk_overlap: 0,
            ..CorpusConfig::default()
        }
    }

    #[test]
    fn test_builds_from_documents() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "One two three. Four five six.").unwrap();
        fs::write(dir.path().join("b.txt"), "Seven.").unwrap();

        let corpus = Corpus::build(&config_for(&dir));
        assert_eq!(corpus.source(), ChunkSource::Documents);
        assert_eq!(corpus.document_count(), 2);
        let ids: Vec<&str> = corpus.chunks().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt__0", "a.txt__1", "b.txt__0"]);
    }

    #[test]
    fn test_index_replaces_chunking() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "One two three. Four five six.").unwrap();
        fs::write(
            dir.path().join("vulnerability_index_metadata.json"),
            r#"[{"id": "idx-0", "text": "Indexed chunk text."}]"#,
        )
        .unwrap();

        let corpus = Corpus::build(&config_for(&dir));
        assert_eq!(corpus.source(), ChunkSource::PrecomputedIndex);
        assert_eq!(corpus.chunk_count(), 1);
        assert_eq!(corpus.chunks()[0].id, "idx-0");
        // The index file itself is also a loaded document
        assert_eq!(corpus.document_count(), 2);
    }

    #[test]
    fn test_empty_index_falls_back_to_documents() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "Alpha beta.").unwrap();
        fs::write(dir.path().join("vulnerability_index_metadata.json"), "[]").unwrap();

        let corpus = Corpus::build(&config_for(&dir));
        assert_eq!(corpus.source(), ChunkSource::Documents);
        assert_eq!(corpus.chunk_count(), 1);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = CorpusConfig {
            data_dir: dir.path().join("missing"),
            ..CorpusConfig::default()
        };

        let corpus = Corpus::build(&config);
        assert_eq!(corpus.document_count(), 0);
        assert_eq!(corpus.chunk_count(), 0);
    }
}
