//! Answer orchestration
//!
//! Query safety check, retrieval, then either local summarization or a
//! generative call with local fallback, and a final safety check on any
//! generated answer.

use crate::generative::{GenerationOutcome, Generator};
use crate::safety::SafetyFilter;
use crate::summarizer::{summarize, DEFAULT_SUMMARY_CHARS};
use drishti_common::config::GenerativeConfig;
use drishti_common::errors::{AppError, Result};
use drishti_common::metrics::{self, GenerationStatus};
use drishti_common::Chunk;
use drishti_search::{ScoredChunk, TfRetriever};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Replaces a generated answer that trips the safety filter
pub const REDACTED_ANSWER: &str = "[redacted due to safety policy]";

/// A retrieved chunk as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChunk {
    pub id: String,
    pub source: String,
    pub text: String,
    pub score: f64,
    pub cvss: Option<f64>,
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
}

impl From<ScoredChunk<'_>> for RankedChunk {
    fn from(scored: ScoredChunk<'_>) -> Self {
        let chunk = scored.chunk;
        Self {
            id: chunk.id.clone(),
            source: chunk.source.clone(),
            text: chunk.text.clone(),
            score: scored.score,
            cvss: chunk.cvss,
            url: chunk.url().map(str::to_string),
            title: chunk.title.clone(),
            published_date: chunk.published_date.clone(),
        }
    }
}

/// Response of one answered query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub query: String,
    pub top_chunks: Vec<RankedChunk>,
    pub use_gemini: bool,
    pub gemini_success: bool,
    pub answer: String,
    pub safety_query_matches: Vec<String>,
    pub safety_answer_matches: Vec<String>,
}

/// Drives one query from safety check to final answer
///
/// Holds no per-request state; a single instance is shared by all handlers.
pub struct AnswerOrchestrator {
    safety: SafetyFilter,
    retriever: TfRetriever,
    generator: Arc<dyn Generator>,
    settings: GenerativeConfig,
}

impl AnswerOrchestrator {
    pub fn new(safety: SafetyFilter, generator: Arc<dyn Generator>, settings: GenerativeConfig) -> Self {
        Self {
            safety,
            retriever: TfRetriever::new(),
            generator,
            settings,
        }
    }

    /// Answer `query` from `chunks`
    ///
    /// Fails only when the query itself is blocked; generative failures fall
    /// back to the local summary.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub async fn answer(&self, query: &str, chunks: &[Chunk], top_k: usize, use_gemini: bool) -> Result<QueryAnswer> {
        let start = Instant::now();

        let query_verdict = self.safety.check(query);
        if !query_verdict.is_safe {
            metrics::record_safety_block("query");
            warn!(matches = ?query_verdict.matches, "Query blocked by safety filter");
            return Err(AppError::QueryBlocked {
                matches: query_verdict.matches,
            });
        }

        let top_chunks: Vec<RankedChunk> = self
            .retriever
            .retrieve(chunks, query, top_k)
            .into_iter()
            .map(RankedChunk::from)
            .collect();

        let mut gemini_success = false;
        let mut safety_answer_matches = Vec::new();

        let answer = if use_gemini {
            let outcome = self.generate(query, &top_chunks).await;
            gemini_success = outcome.success;

            let answer = if outcome.success {
                outcome.text
            } else {
                debug!(raw = %outcome.raw, "Falling back to local summary");
                local_summary(&top_chunks)
            };

            let answer_verdict = self.safety.check(&answer);
            if answer_verdict.is_safe {
                answer
            } else {
                metrics::record_safety_block("answer");
                warn!(matches = ?answer_verdict.matches, "Answer redacted by safety filter");
                safety_answer_matches = answer_verdict.matches;
                REDACTED_ANSWER.to_string()
            }
        } else {
            local_summary(&top_chunks)
        };

        let duration = start.elapsed();
        metrics::record_query(duration.as_secs_f64(), use_gemini, top_chunks.len());
        info!(
            results = top_chunks.len(),
            use_gemini,
            gemini_success,
            duration_ms = duration.as_millis() as u64,
            "Query answered"
        );

        Ok(QueryAnswer {
            query: query.to_string(),
            top_chunks,
            use_gemini,
            gemini_success,
            answer,
            safety_query_matches: query_verdict.matches,
            safety_answer_matches,
        })
    }

    async fn generate(&self, query: &str, top_chunks: &[RankedChunk]) -> GenerationOutcome {
        if self.settings.api_key().is_none() && self.settings.is_public_endpoint() {
            metrics::record_generation(0.0, &self.settings.model, GenerationStatus::Skipped);
            debug!("No credential for the public endpoint, skipping generation");
            return GenerationOutcome {
                success: false,
                text: String::new(),
                raw: json!({ "error": "no_api_key" }),
            };
        }

        let start = Instant::now();
        let prompt = build_prompt(query, top_chunks);
        let outcome = self.generator.generate(&prompt, &self.settings).await;

        let status = if outcome.success {
            GenerationStatus::Success
        } else {
            warn!(model = %self.settings.model, error = %outcome.text, "Generative call failed");
            GenerationStatus::Error
        };
        metrics::record_generation(start.elapsed().as_secs_f64(), &self.settings.model, status);

        outcome
    }
}

fn local_summary(top_chunks: &[RankedChunk]) -> String {
    let texts: Vec<&str> = top_chunks.iter().map(|c| c.text.as_str()).collect();
    summarize(&texts, DEFAULT_SUMMARY_CHARS)
}

/// Prompt embedding the question and every retrieved chunk as `[source] text`
pub fn build_prompt(query: &str, top_chunks: &[RankedChunk]) -> String {
    let mut context = String::from("\n\n---\nContext chunks:\n");
    for chunk in top_chunks {
        context.push_str(&format!("[{}] {}\n\n", chunk.source, chunk.text));
    }

    format!(
        "You are an assistant. Use the following context to answer the user's question.\n\
         Question: {}\n\n{}\nAnswer concisely and cite sources in brackets.",
        query, context
    )
}
