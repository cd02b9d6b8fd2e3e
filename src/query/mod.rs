
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::database::lancedb::{ChunkMetadata, VectorStore};
use crate::embeddings::ollama::OllamaClient;
use crate::generation::{GenerationClient, SourceRef, extract_sources};

/// Answer returned when retrieval finds nothing to ground a response on
pub const NOT_FOUND_ANSWER: &str =
    "No relevant information was found in the indexed documents.";

/// Incoming question for the ask endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Generated answer with its deduplicated source references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<SourceRef>,
}

/// Retrieval-augmented question answering over the vector collection
pub struct QueryEngine {
    vector_store: VectorStore,
    ollama_client: OllamaClient,
    generation_client: GenerationClient,
    top_k: usize,
}

impl QueryEngine {
    /// Build a query engine over an already-initialized vector store
    #[inline]
    pub fn new(config: &Config, vector_store: VectorStore) -> Result<Self> {
        let ollama_client =
            OllamaClient::new(config).context("Failed to initialize Ollama client")?;
        let generation_client =
            GenerationClient::new(config).context("Failed to initialize generation client")?;

        Ok(Self {
            vector_store,
            ollama_client,
            generation_client,
            top_k: 1,
        })
    }

    #[inline]
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Answer a question: embed, retrieve, generate, cite.
    ///
    /// The whole pipeline is sequential per request. An empty retrieval
    /// short-circuits to [`NOT_FOUND_ANSWER`] without calling the LLM.
    #[inline]
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        debug!("Answering question (length: {})", question.len());

        let query_embedding = self
            .ollama_client
            .generate_embedding(question)
            .context("Failed to embed question")?;

        let hits = self
            .vector_store
            .search_similar(&query_embedding.embedding, self.top_k)
            .await
            .context("Failed to search vector collection")?;

        if hits.is_empty() {
            info!("No chunks retrieved, returning not-found answer");
            return Ok(AskResponse {
                answer: NOT_FOUND_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let chunks: Vec<ChunkMetadata> =
            hits.into_iter().map(|hit| hit.chunk_metadata).collect();

        let answer = self
            .generation_client
            .generate_answer(question, &chunks)
            .context("Failed to generate answer")?;

        let sources = extract_sources(&chunks);

        info!(
            "Answered question with {} source reference(s)",
            sources.len()
        );

        Ok(AskResponse { answer, sources })
    }
}
