
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::RagError;
use crate::config::Config;
use crate::database::lancedb::{ChunkMetadata, EmbeddingRecord, VectorStore};
use crate::documents::{self, PdfPage};
use crate::embeddings::chunking::{PageChunk, chunk_pages};
use crate::embeddings::ollama::OllamaClient;

/// Indexes PDF pages into the persisted vector collection
pub struct Indexer {
    config: Config,
    vector_store: VectorStore,
    ollama_client: OllamaClient,
}

/// Summary of a single ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub files: usize,
    pub pages: usize,
    pub chunks: usize,
    /// True when the collection already held data and ingestion was skipped
    pub skipped: bool,
}

impl IngestReport {
    fn skipped() -> Self {
        Self {
            files: 0,
            pages: 0,
            chunks: 0,
            skipped: true,
        }
    }
}

impl Indexer {
    /// Create an indexer for the configured PDF directory and collection
    #[inline]
    pub async fn new(config: Config) -> Result<Self> {
        let vector_store = VectorStore::new(&config)
            .await
            .context("Failed to initialize LanceDB vector store")?;

        let ollama_client =
            OllamaClient::new(&config).context("Failed to initialize Ollama client")?;

        Ok(Self {
            config,
            vector_store,
            ollama_client,
        })
    }

    /// Ingest the PDF directory unless the collection already holds data.
    ///
    /// The emptiness check is the only trigger: a non-empty collection is
    /// served as-is, even if the PDF directory changed since it was built.
    /// Use [`clear_collection`] followed by a fresh indexer to force a
    /// rebuild.
    #[inline]
    pub async fn ensure_indexed(&mut self) -> Result<IngestReport> {
        if !self
            .vector_store
            .is_empty()
            .await
            .context("Failed to check collection state")?
        {
            let count = self.vector_store.count_chunks().await?;
            info!(
                "Collection already holds {} chunks, skipping ingestion",
                count
            );
            return Ok(IngestReport::skipped());
        }

        let pdf_dir = self.config.pdf_dir_path();
        info!("Collection is empty, ingesting PDFs from {:?}", pdf_dir);

        if !pdf_dir.is_dir() {
            return Err(RagError::Ingest(format!(
                "PDF directory {} does not exist",
                pdf_dir.display()
            ))
            .into());
        }

        let pages = documents::load_directory(&pdf_dir)
            .with_context(|| format!("Failed to load PDF directory {}", pdf_dir.display()))?;

        if pages.is_empty() {
            warn!("No PDF pages found in {:?}, nothing to ingest", pdf_dir);
            return Ok(IngestReport {
                files: 0,
                pages: 0,
                chunks: 0,
                skipped: false,
            });
        }

        self.index_pages(pages).await
    }

    /// Chunk, embed, and store a set of PDF pages
    #[inline]
    pub async fn index_pages(&mut self, pages: Vec<PdfPage>) -> Result<IngestReport> {
        let files = pages
            .iter()
            .map(|p| p.file_name.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len();
        let page_count = pages.len();

        let chunks = chunk_pages(&pages, &self.config.chunking);
        if chunks.is_empty() {
            warn!("Chunking produced no chunks from {} pages", page_count);
            return Ok(IngestReport {
                files,
                pages: page_count,
                chunks: 0,
                skipped: false,
            });
        }

        info!(
            "Embedding {} chunks from {} pages across {} files",
            chunks.len(),
            page_count,
            files
        );

        let bar = if console::user_attended_stderr() {
            ProgressBar::new(chunks.len() as u64).with_style(
                ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding chunks")
                    .expect("style template is valid"),
            )
        } else {
            ProgressBar::hidden()
        };

        let batch_size = self.config.ollama.batch_size as usize;
        let mut stored = 0;

        for batch in chunks.chunks(batch_size) {
            let embedding_results = self
                .ollama_client
                .generate_chunk_embeddings(batch)
                .context("Failed to generate embeddings")?;

            let records: Vec<EmbeddingRecord> = batch
                .iter()
                .zip(embedding_results.iter())
                .map(|(chunk, result)| Self::build_record(chunk, &result.embedding))
                .collect();

            let batch_len = records.len();
            self.vector_store
                .store_embeddings_batch(records)
                .await
                .context("Failed to store embeddings in LanceDB")?;

            stored += batch_len;
            bar.set_position(stored as u64);
        }

        bar.finish_and_clear();
        info!("Ingestion complete: {} chunks stored", stored);

        Ok(IngestReport {
            files,
            pages: page_count,
            chunks: stored,
            skipped: false,
        })
    }

    fn build_record(chunk: &PageChunk, embedding: &[f32]) -> EmbeddingRecord {
        EmbeddingRecord {
            id: Uuid::new_v4().to_string(),
            vector: embedding.to_vec(),
            metadata: ChunkMetadata {
                file_name: chunk.file_name.clone(),
                page_label: chunk.page_label.clone(),
                content: chunk.content.clone(),
                token_count: chunk.token_count as u32,
                chunk_index: chunk.chunk_index as u32,
                created_at: Utc::now().to_rfc3339(),
            },
        }
    }

    /// Number of chunks currently stored in the collection
    #[inline]
    pub async fn chunk_count(&self) -> Result<u64> {
        Ok(self.vector_store.count_chunks().await?)
    }

    /// Consume the indexer and hand back its vector store
    #[inline]
    #[must_use]
    pub fn into_vector_store(self) -> VectorStore {
        self.vector_store
    }
}

/// Delete the persisted collection so the next run re-ingests from scratch
#[inline]
pub fn clear_collection(config: &Config) -> Result<()> {
    let db_path = config.vector_db_path();
    if db_path.exists() {
        info!("Removing vector collection at {:?}", db_path);
        std::fs::remove_dir_all(&db_path)
            .with_context(|| format!("Failed to remove vector collection {}", db_path.display()))?;
    }
    Ok(())
}
