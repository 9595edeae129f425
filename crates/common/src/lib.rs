//! Drishti Common Library
//!
//! Shared code for all Drishti crates including:
//! - Document and chunk models
//! - Error types and handling
//! - Configuration management
//! - Logging initialization
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use self::config::AppConfig;
pub use models::{Chunk, Document};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default generative endpoint (public Gemini REST API)
pub const DEFAULT_GENERATIVE_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Default generative model identifier
pub const DEFAULT_GENERATIVE_MODEL: &str = "gemini-1.5-flash";

/// File name of the precomputed chunk-metadata index inside the data directory
pub const DEFAULT_INDEX_FILE: &str = "vulnerability_index_metadata.json";
