// LanceDB vector collection module
// Handles persisted chunk storage and similarity search for embeddings


pub mod vector_store;

pub use vector_store::{SearchResult, VectorStore};

use serde::{Deserialize, Serialize};

/// Name of the persisted collection (LanceDB table)
pub const COLLECTION_NAME: &str = "pdf_rag";

/// Embedding record stored in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique identifier for this record
    pub id: String,
    /// The vector embedding (768 dimensions for nomic-embed-text)
    pub vector: Vec<f32>,
    /// The chunk this embedding represents
    pub metadata: ChunkMetadata,
}

/// A chunk's text and citation metadata, stored alongside its embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// File name of the source PDF
    pub file_name: String,
    /// Page label of the source page
    pub page_label: String,
    /// The chunk text
    pub content: String,
    /// Estimated token count of the chunk
    pub token_count: u32,
    /// Index of this chunk within its page
    pub chunk_index: u32,
    /// Timestamp when this record was created
    pub created_at: String,
}
