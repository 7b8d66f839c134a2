//! Minimal query driver: ask one question against the indexed corpus.
//!
//! ```bash
//! PINECONE_API_KEY=... cargo run --bin ask -- "How do I rotate credentials?"
//! ```
//!
//! `TOP_K` overrides the number of retrieved passages (default 4).

use std::env;

use tracing_subscriber::EnvFilter;

use ragloom::{DEFAULT_TOP_K, RagConfig, RagError, RagPipeline};

#[tokio::main]
async fn main() -> Result<(), RagError> {
    init_tracing();

    let question = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        return Err(RagError::InvalidInput(
            "usage: ask <question>".to_string(),
        ));
    }

    let top_k = env::var("TOP_K")
        .ok()
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TOP_K);

    let config = RagConfig::from_env()?;
    config.require_api_key()?;

    let pipeline = RagPipeline::connect(&config).await?;
    let answer = pipeline.answer(&question, top_k).await?;

    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for source in &answer.sources {
            println!("  {} (score {:.3})", source.source, source.score);
        }
    }

    pipeline.shutdown();
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
