//! Drishti Search
//!
//! Lexical retrieval over the in-memory chunk set:
//! - Word tokenization
//! - Per-query vocabulary and term-frequency vectors
//! - Cosine similarity ranking

pub mod retrieval;

pub use retrieval::{ScoredChunk, TfRetriever, Tokenizer};
