// Embeddings module
// Handles Ollama embedding generation and page-text chunking

pub mod chunking;
pub mod ollama;

pub use chunking::{ChunkingConfig, PageChunk, chunk_page, chunk_pages, estimate_token_count};
pub use ollama::{EmbeddingResult, OllamaClient};
