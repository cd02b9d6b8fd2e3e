// Database module
// The persisted vector collection (LanceDB) is the only stored state

pub mod lancedb;

pub use lancedb::{ChunkMetadata, EmbeddingRecord, SearchResult, VectorStore};
