//! Text chunking module
//!
//! Splits document text into sentence-respecting word windows, then extends
//! each window with the tail of its predecessor for word-level overlap.

use drishti_common::config::CorpusConfig;
use drishti_common::{Chunk, Document};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

/// Configuration for text chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Target chunk size in words
    pub chunk_words: usize,
    /// Words taken from the previous chunk
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_words: 200,
            overlap: 40,
        }
    }
}

impl From<&CorpusConfig> for ChunkingConfig {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            chunk_words: config.chunk_words,
            overlap: config.chunk_overlap,
        }
    }
}

/// Split text into chunk strings
///
/// Sentences are never split: a sentence longer than `chunk_words` becomes a
/// chunk of its own. Text without any sentence yields no chunks.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let base = sentence_windows(text, config.chunk_words);

    debug!(
        input_len = text.len(),
        chunk_count = base.len(),
        chunk_words = config.chunk_words,
        overlap = config.overlap,
        "Text chunked"
    );

    if config.overlap == 0 || base.len() < 2 {
        return base.iter().map(|words| words.join(" ")).collect();
    }

    base.iter()
        .enumerate()
        .map(|(i, words)| {
            if i == 0 {
                return words.join(" ");
            }
            // Overlap always comes from the pre-overlap predecessor
            let prev = &base[i - 1];
            let tail = &prev[prev.len().saturating_sub(config.overlap)..];
            tail.iter().chain(words.iter()).copied().collect::<Vec<_>>().join(" ")
        })
        .collect()
}

/// Greedily pack whole sentences into windows of at most `chunk_words` words
fn sentence_windows(text: &str, chunk_words: usize) -> Vec<Vec<&str>> {
    let mut windows = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for sentence in text.split_sentence_bounds() {
        let words: Vec<&str> = sentence.split_whitespace().collect();

        if current.len() + words.len() <= chunk_words {
            current.extend(words);
        } else {
            if !current.is_empty() {
                windows.push(std::mem::take(&mut current));
            }
            current = words;
        }
    }

    if !current.is_empty() {
        windows.push(current);
    }

    windows
}

/// Chunk every document, assigning `<doc_id>__<index>` ids in order
pub fn build_chunks(documents: &[Document], config: &ChunkingConfig) -> Vec<Chunk> {
    documents
        .iter()
        .flat_map(|doc| {
            chunk_text(&doc.text, config)
                .into_iter()
                .enumerate()
                .map(move |(index, text)| Chunk::from_document(doc, index, text))
        })
        .collect()
}
