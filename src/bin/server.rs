//! Invoice analysis server binary
//!
//! Run with: cargo run --bin nf-rag-server

use nf_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nf_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = RagConfig::load("nf-rag.toml")?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - API base URL: {}", config.llm.base_url);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - CNAE table: {}", config.cnae.table_path.display());

    if config.llm.api_key.is_empty() {
        tracing::warn!("No API key configured, set OPENAI_API_KEY before analyzing invoices");
    }

    // Create and start server
    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  UI:     http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload_nf       - Upload an invoice PDF");
    println!("  POST /upload_nf_texto - Analyze pasted invoice text");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
