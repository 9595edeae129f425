//! Metrics and observability utilities
//!
//! Prometheus-style metrics with standardized naming conventions.
//! Recording is a no-op until an exporter is installed.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};

/// Metrics prefix for all Drishti metrics
pub const METRICS_PREFIX: &str = "drishti";

/// Histogram buckets for query latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    20.00,  // 20s - generative timeout
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of answered queries"
    );

    describe_histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "End-to-end query latency in seconds"
    );

    describe_counter!(
        format!("{}_safety_blocks_total", METRICS_PREFIX),
        Unit::Count,
        "Queries blocked or answers redacted by the safety filter"
    );

    describe_counter!(
        format!("{}_generation_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Generative service requests by outcome"
    );

    describe_histogram!(
        format!("{}_generation_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Generative service latency in seconds"
    );

    describe_gauge!(
        format!("{}_corpus_documents", METRICS_PREFIX),
        Unit::Count,
        "Documents loaded at startup"
    );

    describe_gauge!(
        format!("{}_corpus_chunks", METRICS_PREFIX),
        Unit::Count,
        "Chunks available for retrieval"
    );

    tracing::info!("Metrics registered");
}

/// Outcome label for a generative request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Success,
    Error,
    Skipped,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Success => "success",
            GenerationStatus::Error => "error",
            GenerationStatus::Skipped => "skipped",
        }
    }
}

/// Helper to record query metrics
pub fn record_query(duration_secs: f64, use_gemini: bool, result_count: usize) {
    counter!(
        format!("{}_queries_total", METRICS_PREFIX),
        "use_gemini" => use_gemini.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_query_duration_seconds", METRICS_PREFIX),
        "use_gemini" => use_gemini.to_string()
    )
    .record(duration_secs);

    tracing::trace!(result_count, "Query metrics recorded");
}

/// Helper to record a safety filter hit (`stage` is "query" or "answer")
pub fn record_safety_block(stage: &'static str) {
    counter!(
        format!("{}_safety_blocks_total", METRICS_PREFIX),
        "stage" => stage
    )
    .increment(1);
}

/// Helper to record generative service metrics
pub fn record_generation(duration_secs: f64, model: &str, status: GenerationStatus) {
    counter!(
        format!("{}_generation_requests_total", METRICS_PREFIX),
        "model" => model.to_string(),
        "status" => status.as_str()
    )
    .increment(1);

    if status != GenerationStatus::Skipped {
        histogram!(
            format!("{}_generation_duration_seconds", METRICS_PREFIX),
            "model" => model.to_string()
        )
        .record(duration_secs);
    }
}

/// Helper to record corpus size at startup
pub fn record_corpus(documents: usize, chunks: usize) {
    gauge!(format!("{}_corpus_documents", METRICS_PREFIX)).set(documents as f64);
    gauge!(format!("{}_corpus_chunks", METRICS_PREFIX)).set(chunks as f64);
}
