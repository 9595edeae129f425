//! Drishti Answer Engine
//!
//! Turns ranked chunks into an answer:
//! - Pattern-based safety filtering of queries and answers
//! - Local extractive summarization
//! - Generative service client tolerant of several response shapes
//! - Orchestration between generation and local fallback

pub mod generative;
pub mod orchestrator;
pub mod safety;
pub mod summarizer;

pub use generative::{GeminiClient, GenerationOutcome, Generator};
pub use orchestrator::{AnswerOrchestrator, QueryAnswer, RankedChunk, REDACTED_ANSWER};
pub use safety::{SafetyFilter, SafetyVerdict, DEFAULT_BLOCKED_PATTERNS};
pub use summarizer::{summarize, DEFAULT_SUMMARY_CHARS};
