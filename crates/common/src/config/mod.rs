//! Configuration management for Drishti services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Legacy deployment variables (GEMINI_API_URL, RAG_CHUNK_WORDS, ...)
//! - Configuration files (config/default.toml, config/{APP_ENV}.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Corpus location and chunking parameters
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Generative service configuration
    #[serde(default)]
    pub generative: GenerativeConfig,

    /// Safety filter configuration
    #[serde(default)]
    pub safety: SafetyConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Directory holding the raw documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the precomputed chunk-metadata file inside `data_dir`
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Target words per chunk
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,

    /// Words carried over from the previous chunk
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerativeConfig {
    /// Endpoint receiving the POST; `{model}` is replaced with `model`
    #[serde(default = "default_generative_url")]
    pub api_url: String,

    /// Bearer credential (optional)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_generative_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_generative_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SafetyConfig {
    /// Patterns appended to the built-in blocked-content set
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default)]
    pub metrics_port: u16,

    /// Service name reported in logs
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_request_timeout() -> u64 { 60 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_index_file() -> String { crate::DEFAULT_INDEX_FILE.to_string() }
fn default_chunk_words() -> usize { 200 }
fn default_chunk_overlap() -> usize { 40 }
fn default_generative_url() -> String { crate::DEFAULT_GENERATIVE_API_URL.to_string() }
fn default_generative_model() -> String { crate::DEFAULT_GENERATIVE_MODEL.to_string() }
fn default_generative_timeout() -> u64 { 20 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "drishti".to_string() }

/// Legacy environment variables and the config keys they override
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("RAG_CHUNK_WORDS", "corpus.chunk_words"),
    ("RAG_CHUNK_OVERLAP", "corpus.chunk_overlap"),
    ("RAG_DATA_DIR", "corpus.data_dir"),
    ("GEMINI_API_URL", "generative.api_url"),
    ("GEMINI_API_KEY", "generative.api_key"),
    ("GEMINI_MODEL", "generative.model"),
];

/// Resolve legacy variables through `lookup`, skipping unset and empty ones
pub fn legacy_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    LEGACY_ENV_KEYS
        .iter()
        .filter_map(|(var, key)| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (*key, v))
        })
        .collect()
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("safety.extra_patterns")
                    .try_parsing(true),
            );

        for (key, value) in legacy_overrides(|var| std::env::var(var).ok()) {
            builder = builder.set_override(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Full path of the precomputed chunk-metadata file
    pub fn index_path(&self) -> PathBuf {
        self.corpus.data_dir.join(&self.corpus.index_file)
    }

    /// Directory holding the raw documents
    pub fn data_dir(&self) -> &Path {
        &self.corpus.data_dir
    }
}

impl GenerativeConfig {
    /// Credential, treating an empty string as absent
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Endpoint with the model placeholder resolved
    pub fn resolved_url(&self) -> String {
        self.api_url.replace("{model}", &self.model)
    }

    /// Whether the endpoint is the public provider API rather than a wrapper
    pub fn is_public_endpoint(&self) -> bool {
        self.api_url.starts_with("https://generativelanguage.googleapis.com/")
    }

    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            index_file: default_index_file(),
            chunk_words: default_chunk_words(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            api_url: default_generative_url(),
            api_key: None,
            model: default_generative_model(),
            timeout_secs: default_generative_timeout(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: 0,
            service_name: default_service_name(),
        }
    }
}
