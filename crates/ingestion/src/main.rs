//! Drishti index builder
//!
//! Freezes a data directory into the precomputed chunk index:
//! 1. Loads every document in the directory
//! 2. Chunks them with the configured window and overlap
//! 3. Writes the chunk records as JSON

use anyhow::Context;
use clap::Parser;
use drishti_common::{config::AppConfig, logging, VERSION};
use drishti_ingestion::{build_chunks, load_documents, write_index, ChunkingConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "build-index", version, about = "Write the precomputed chunk index for a corpus")]
struct Args {
    /// Corpus directory (defaults to corpus.data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output file (defaults to <data_dir>/<corpus.index_file>)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Words per chunk (defaults to corpus.chunk_words)
    #[arg(long)]
    chunk_words: Option<usize>,

    /// Overlap words (defaults to corpus.chunk_overlap)
    #[arg(long)]
    overlap: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = AppConfig::load().context("Failed to load configuration")?;

    logging::init_tracing(&config.observability);
    info!("Starting Drishti index builder v{}", VERSION);

    if let Some(dir) = args.data_dir {
        config.corpus.data_dir = dir;
    }
    if let Some(words) = args.chunk_words {
        config.corpus.chunk_words = words;
    }
    if let Some(overlap) = args.overlap {
        config.corpus.chunk_overlap = overlap;
    }

    let output = args.output.unwrap_or_else(|| config.index_path());
    let mut documents = load_documents(config.data_dir());
    // A previous run's output must not be indexed again
    documents.retain(|doc| std::path::Path::new(&doc.source) != output);
    let chunks = build_chunks(&documents, &ChunkingConfig::from(&config.corpus));

    write_index(&chunks, &output).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        documents = documents.len(),
        chunks = chunks.len(),
        output = %output.display(),
        "Index written"
    );
    Ok(())
}
