//! Drishti HTTP Gateway
//!
//! Serves the answer engine over HTTP.
//! Handles:
//! - One-time corpus build at startup
//! - Query and health routing
//! - Observability (logging, metrics, request ids)

mod handlers;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use drishti_common::{config::AppConfig, logging, metrics, VERSION};
use drishti_context::{AnswerOrchestrator, GeminiClient, SafetyFilter};
use drishti_ingestion::Corpus;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "Run the Drishti query service")]
struct Args {
    /// Bind address (defaults to server.host)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (defaults to server.port)
    #[arg(long)]
    port: Option<u16>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

/// Application state shared across handlers
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub corpus: Arc<Corpus>,
    pub orchestrator: Arc<AnswerOrchestrator>,
}

impl AppState {
    /// Wire the answer engine from configuration and a built corpus
    pub fn new(config: AppConfig, corpus: Corpus) -> drishti_common::Result<Self> {
        let safety = SafetyFilter::new(&config.safety.extra_patterns)?;
        let generator = GeminiClient::new(config.generative.timeout())?;
        let orchestrator = AnswerOrchestrator::new(safety, Arc::new(generator), config.generative.clone());

        Ok(Self {
            config: Arc::new(config),
            corpus: Arc::new(corpus),
            orchestrator: Arc::new(orchestrator),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.debug {
        config.observability.log_level = "debug".to_string();
    }

    logging::init_tracing(&config.observability);
    info!("Starting Drishti gateway v{}", VERSION);

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .set_buckets(metrics::LATENCY_BUCKETS)?
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Metrics exporter listening on {}", metrics_addr);
    }
    metrics::register_metrics();

    // Build the corpus once; it is immutable from here on
    let corpus = Corpus::build(&config.corpus);
    metrics::record_corpus(corpus.document_count(), corpus.chunk_count());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, corpus).map_err(|e| {
        error!(error = %e, "Failed to initialize answer engine");
        e
    })?;

    info!(
        docs = state.corpus.document_count(),
        chunks = state.corpus.chunk_count(),
        "Corpus loaded, starting server"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Requests running past the configured limit get 408
    let timeout = TimeoutLayer::new(state.config.request_timeout());

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/query", post(handlers::query::query))
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
