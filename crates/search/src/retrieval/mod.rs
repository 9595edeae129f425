//! Lexical retrieval
//!
//! Every call builds its own vocabulary from the chunk tokens followed by the
//! query tokens; nothing is cached between queries.

mod tf;
mod tokenizer;

pub use tf::{TermVector, Vocabulary};
pub use tokenizer::Tokenizer;

use drishti_common::Chunk;
use std::time::Instant;
use tracing::debug;

/// Retrieved chunk with its cosine similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk<'a> {
    /// The chunk, borrowed from the corpus
    pub chunk: &'a Chunk,

    /// Cosine similarity in `[0, 1]`
    pub score: f64,
}

/// Term-frequency retriever ranking chunks by cosine similarity
#[derive(Debug, Clone, Default)]
pub struct TfRetriever {
    tokenizer: Tokenizer,
}

impl TfRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top `k` chunks for `query`, best first
    ///
    /// Ties keep corpus order. When the corpus is empty, the query has no
    /// tokens, or no chunk has any, the first `k` chunks are returned with a
    /// score of zero.
    pub fn retrieve<'a>(&self, chunks: &'a [Chunk], query: &str, k: usize) -> Vec<ScoredChunk<'a>> {
        let start = Instant::now();

        let chunk_tokens: Vec<Vec<String>> = chunks
            .iter()
            .map(|chunk| self.tokenizer.tokenize(&chunk.text))
            .collect();
        let query_tokens = self.tokenizer.tokenize(query);

        if query_tokens.is_empty() || chunk_tokens.iter().all(Vec::is_empty) {
            debug!(chunks = chunks.len(), k, "Degenerate retrieval, returning leading chunks");
            return chunks
                .iter()
                .take(k)
                .map(|chunk| ScoredChunk { chunk, score: 0.0 })
                .collect();
        }

        let mut vocabulary = Vocabulary::default();
        for token in chunk_tokens.iter().flatten().chain(&query_tokens) {
            vocabulary.insert(token);
        }

        let query_vector = TermVector::normalized(&query_tokens, &vocabulary);

        let mut scored: Vec<(usize, f64)> = chunk_tokens
            .iter()
            .map(|tokens| TermVector::normalized(tokens, &vocabulary).dot(&query_vector))
            .map(|score| score.clamp(0.0, 1.0))
            .enumerate()
            .collect();

        // sort_by is stable, so equal scores keep corpus order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        debug!(
            chunks = chunks.len(),
            vocabulary = vocabulary.len(),
            k,
            best = scored.first().map(|(_, s)| *s).unwrap_or_default(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Retrieval complete"
        );

        scored
            .into_iter()
            .map(|(index, score)| ScoredChunk {
                chunk: &chunks[index],
                score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, text: &str) -> Chunk {
        Chunk {
            id: id.into(),
            doc_id: "doc".into(),
            source: format!("data/{}", id),
            text: text.into(),
            doc_url: String::new(),
            cvss: None,
            title: None,
            published_date: None,
        }
    }

    fn corpus() -> Vec<Chunk> {
        vec![
            chunk("c0", "Patch management keeps servers current."),
            chunk("c1", "A buffer overflow exploit overwrites the return address."),
            chunk("c2", "Buffer sizes should be validated before copying."),
            chunk("c3", "Phishing emails target employees."),
        ]
    }

    #[test]
    fn test_best_match_ranked_first() {
        let chunks = corpus();
        let results = TfRetriever::new().retrieve(&chunks, "buffer overflow exploit", 3);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.id, "c1");
        assert!(results[0].score > 0.0);
        assert_eq!(results[1].chunk.id, "c2");
    }

    #[test]
    fn test_scores_bounded_and_non_increasing() {
        let chunks = corpus();
        let results = TfRetriever::new().retrieve(&chunks, "buffer validated servers emails", 4);

        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for r in &results {
            assert!((0.0..=1.0).contains(&r.score));
        }
    }

    #[test]
    fn test_identical_text_scores_one() {
        let chunks = vec![chunk("a", "Rotate keys often. Rotate keys!")];
        let results = TfRetriever::new().retrieve(&chunks, "rotate KEYS often rotate keys", 1);
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_query_subset_scores_positive() {
        let chunks = corpus();
        let results = TfRetriever::new().retrieve(&chunks, "phishing employees", 4);
        let c3 = results.iter().find(|r| r.chunk.id == "c3").unwrap();
        assert!(c3.score > 0.0);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let chunks = vec![
            chunk("x", "alpha"),
            chunk("y", "beta"),
            chunk("z", "alpha"),
        ];
        let results = TfRetriever::new().retrieve(&chunks, "alpha", 3);
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "z", "y"]);
        assert_eq!(results[2].score, 0.0);
    }

    #[test]
    fn test_unrelated_chunks_score_positive_zero() {
        let chunks = vec![chunk("a", "alpha"), chunk("b", "beta")];
        let results = TfRetriever::new().retrieve(&chunks, "alpha", 2);

        assert_eq!(results[1].chunk.id, "b");
        assert_eq!(results[1].score, 0.0);
        assert!(!results[1].score.is_sign_negative());
        assert_eq!(format!("{:?}", results[1].score), "0.0");
    }

    #[test]
    fn test_degenerate_inputs_fall_back() {
        let retriever = TfRetriever::new();
        let chunks = corpus();

        assert!(retriever.retrieve(&[], "buffer", 3).is_empty());

        let results = retriever.retrieve(&chunks, "", 2);
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "c1"]);
        assert!(results.iter().all(|r| r.score == 0.0));

        let results = retriever.retrieve(&chunks, "?! ...", 10);
        assert_eq!(results.len(), 4);

        let blank = vec![chunk("p", "... !!!"), chunk("q", "--")];
        let results = retriever.retrieve(&blank, "buffer", 5);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_k_limits_results() {
        let chunks = corpus();
        assert_eq!(TfRetriever::new().retrieve(&chunks, "buffer", 1).len(), 1);
        assert_eq!(TfRetriever::new().retrieve(&chunks, "buffer", 50).len(), 4);
    }
}
