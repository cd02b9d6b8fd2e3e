#[cfg(test)]
mod tests;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::database::ChunkMetadata;

/// A (file, page) pair identifying where an answer was grounded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub file_name: String,
    pub page: String,
}

/// Collect deduplicated source references from retrieved chunks,
/// preserving retrieval order
#[inline]
#[must_use]
pub fn extract_sources(chunks: &[ChunkMetadata]) -> Vec<SourceRef> {
    chunks
        .iter()
        .filter(|chunk| !chunk.file_name.is_empty() && !chunk.page_label.is_empty())
        .map(|chunk| SourceRef {
            file_name: chunk.file_name.clone(),
            page: chunk.page_label.clone(),
        })
        .unique()
        .collect()
}
