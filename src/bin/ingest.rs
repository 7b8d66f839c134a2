//! Offline ingestion job: walk a corpus directory, chunk and embed every
//! document, and write the records to the vector index.
//!
//! ```bash
//! PINECONE_API_KEY=... cargo run --bin ingest -- ./knowledge
//! ```
//!
//! Re-running duplicates the corpus content in the index (record ids are
//! fresh on every run); clear the index first for a clean re-ingest.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use ragloom::{RagConfig, RagError, RagPipeline};

#[tokio::main]
async fn main() -> Result<(), RagError> {
    init_tracing();

    let corpus_root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var("KNOWLEDGE_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./knowledge"));

    let config = RagConfig::from_env()?;
    config.require_api_key()?;

    let pipeline = RagPipeline::connect(&config).await?;
    let ingestor = pipeline.ingestor();

    let started = Instant::now();
    let summary = ingestor.ingest(&corpus_root).await?;
    let elapsed = started.elapsed();

    if summary.documents_read == 0 {
        println!(
            "No .txt or .md files found under {}. Add files and rerun.",
            corpus_root.display()
        );
    } else {
        println!("Ingestion complete.");
        println!("  documents read : {}", summary.documents_read);
        println!("  chunks written : {}", summary.chunks_written);
        println!("  duration       : {:.1}s", elapsed.as_secs_f64());
        println!(
            "Note: re-running duplicates this content in index '{}'.",
            config.index_name
        );
    }

    pipeline.shutdown();
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
