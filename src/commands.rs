use anyhow::{Context, Result};
use tracing::info;

use crate::chat::run_chat;
use crate::config::Config;
use crate::database::lancedb::VectorStore;
use crate::indexer::{Indexer, IngestReport, clear_collection};
use crate::query::QueryEngine;
use crate::server;

/// Ingest the PDF directory if needed, then serve the question-answering API
#[inline]
pub async fn serve() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let mut indexer = Indexer::new(config.clone()).await?;
    let report = indexer.ensure_indexed().await?;
    print_ingest_report(&report);

    let vector_store = indexer.into_vector_store();
    let engine = QueryEngine::new(&config, vector_store)?;

    server::serve(&config, engine).await
}

/// Run the interactive chat front-end against a running server
#[inline]
pub fn chat() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    run_chat(&config)
}

/// Ingest PDFs into the collection, optionally rebuilding it from scratch
#[inline]
pub async fn ingest(reset: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    if reset {
        info!("Resetting vector collection before ingestion");
        clear_collection(&config)?;
    }

    let mut indexer = Indexer::new(config).await?;
    let report = indexer.ensure_indexed().await?;
    print_ingest_report(&report);

    Ok(())
}

fn print_ingest_report(report: &IngestReport) {
    if report.skipped {
        println!("Collection already populated, ingestion skipped.");
        println!("Run 'pdf-rag ingest --reset' to rebuild from the PDF directory.");
    } else if report.chunks == 0 {
        println!("No content ingested (no PDF pages found).");
    } else {
        println!("Ingestion complete:");
        println!("  Files:  {}", report.files);
        println!("  Pages:  {}", report.pages);
        println!("  Chunks: {}", report.chunks);
    }
}

/// Show connectivity and collection status
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("📊 PDF RAG Status Report");
    println!("{}", "=".repeat(50));
    println!();

    // Ollama connectivity
    println!("🤖 Ollama Status:");
    match crate::embeddings::ollama::OllamaClient::new(&config) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama: Connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   📋 Embedding Model: {}", config.ollama.embedding_model);
                println!("   🧠 Generation Model: {}", config.ollama.llm_model);
                println!("   🔢 Batch Size: {}", config.ollama.batch_size);
            }
            Err(e) => {
                println!("   ⚠️  Ollama: Connected but unhealthy - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Ollama: Failed to connect - {}", e);
        }
    }

    // Vector collection status
    println!("🔍 Vector Collection Status:");
    match VectorStore::new(&config).await {
        Ok(store) => {
            println!("   ✅ LanceDB: Connected");
            match store.count_chunks().await {
                Ok(0) => {
                    println!("   📭 Collection is empty (next serve run will ingest)");
                }
                Ok(count) => {
                    println!("   📦 Chunks stored: {}", count);
                }
                Err(e) => {
                    println!("   ❌ Failed to count chunks - {}", e);
                }
            }
        }
        Err(e) => {
            println!("   ❌ LanceDB: Failed to connect - {}", e);
        }
    }

    // PDF directory status
    println!("📄 PDF Directory:");
    let pdf_dir = config.pdf_dir_path();
    if pdf_dir.is_dir() {
        let pdf_count = std::fs::read_dir(&pdf_dir)
            .map(|entries| {
                entries
                    .filter_map(std::result::Result::ok)
                    .filter(|entry| {
                        entry
                            .path()
                            .extension()
                            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
                    })
                    .count()
            })
            .unwrap_or(0);
        println!("   📁 {} ({} PDF files)", pdf_dir.display(), pdf_count);
    } else {
        println!("   ❌ {} (missing)", pdf_dir.display());
    }

    println!();
    println!("🌐 API address: http://{}", config.server.bind_addr());

    Ok(())
}
