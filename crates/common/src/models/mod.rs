//! Corpus data model
//!
//! Documents are produced once by the corpus loader; chunks are the atomic
//! unit of retrieval and are read-only after startup.

mod chunk;
mod document;

pub use chunk::{lenient_score, lenient_string, score_from_value, Chunk};
pub use document::Document;
