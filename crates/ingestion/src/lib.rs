//! Drishti ingestion
//!
//! Turns a data directory into the read-only chunk set used for retrieval:
//! - Corpus loading (plain text and JSON records)
//! - Sentence-aware chunking with word overlap
//! - Precomputed chunk index reading and writing

pub mod chunker;
pub mod corpus;
pub mod errors;
pub mod index;
pub mod loader;

pub use chunker::{build_chunks, chunk_text, ChunkingConfig};
pub use corpus::{ChunkSource, Corpus};
pub use errors::IngestionError;
pub use index::{load_indexed_chunks, write_index};
pub use loader::load_documents;
