#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::documents::PdfPage;

/// A chunk of page text ready for embedding.
///
/// A chunk never spans more than one page, so each one carries exactly one
/// (file name, page label) citation pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChunk {
    /// The chunk text
    pub content: String,
    /// File name of the source PDF
    pub file_name: String,
    /// 1-based page label of the source page
    pub page_label: String,
    /// The index of this chunk within its page
    pub chunk_index: usize,
    /// Estimated token count
    pub token_count: usize,
}

/// Configuration for page-text chunking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens
    pub target_chunk_size: usize,
    /// Maximum chunk size in tokens before forced splitting
    pub max_chunk_size: usize,
    /// Minimum chunk size in tokens (smaller chunks will be merged)
    pub min_chunk_size: usize,
    /// Overlap size in tokens between adjacent chunks of the same page
    pub overlap_size: usize,
    /// Whether to break at sentence boundaries when possible
    pub sentence_boundary_splitting: bool,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            target_chunk_size: 650,
            max_chunk_size: 1000,
            min_chunk_size: 100,
            overlap_size: 50,
            sentence_boundary_splitting: true,
        }
    }
}

/// Chunk a set of extracted pages into embedding-ready pieces
#[inline]
pub fn chunk_pages(pages: &[PdfPage], config: &ChunkingConfig) -> Vec<PageChunk> {
    let chunks: Vec<PageChunk> = pages
        .iter()
        .flat_map(|page| chunk_page(page, config))
        .collect();

    debug!(
        "Chunked {} pages into {} chunks (avg {} tokens)",
        pages.len(),
        chunks.len(),
        chunks.iter().map(|c| c.token_count).sum::<usize>() / chunks.len().max(1)
    );

    chunks
}

/// Chunk the text of a single page
#[inline]
pub fn chunk_page(page: &PdfPage, config: &ChunkingConfig) -> Vec<PageChunk> {
    let content = page.text.trim();
    if content.is_empty() {
        return Vec::new();
    }

    let token_count = estimate_token_count(content);

    // Small pages become a single chunk
    let splits = if token_count <= config.target_chunk_size {
        vec![content.to_string()]
    } else {
        split_by_semantics(content, config)
    };

    let chunks: Vec<PageChunk> = splits
        .into_iter()
        .filter(|split| !split.trim().is_empty())
        .map(|split| {
            let chunk_token_count = estimate_token_count(&split);
            PageChunk {
                content: split,
                file_name: page.file_name.clone(),
                page_label: page.page_label.clone(),
                chunk_index: 0,
                token_count: chunk_token_count,
            }
        })
        .collect();

    post_process_chunks(chunks, config)
}

/// Split content using paragraph boundaries, with sentence and word fallbacks
fn split_by_semantics(content: &str, config: &ChunkingConfig) -> Vec<String> {
    let mut splits = Vec::new();
    let mut current_split = String::new();
    let mut current_token_count = 0;

    for paragraph in content.split("\n\n") {
        if paragraph.trim().is_empty() {
            continue;
        }

        let paragraph_tokens = estimate_token_count(paragraph);

        // Oversized paragraphs are split further before accumulation
        if paragraph_tokens > config.max_chunk_size {
            let inner_splits = if config.sentence_boundary_splitting {
                split_by_sentences(paragraph, config)
            } else {
                split_by_words(paragraph, config)
            };

            for inner_split in inner_splits {
                if current_token_count + estimate_token_count(&inner_split)
                    > config.target_chunk_size
                    && !current_split.trim().is_empty()
                {
                    splits.push(current_split.trim().to_string());
                    current_split.clear();
                    current_token_count = 0;
                }
                current_split.push_str(&inner_split);
                current_split.push_str("\n\n");
                current_token_count += estimate_token_count(&inner_split);
            }
        } else {
            if current_token_count + paragraph_tokens > config.target_chunk_size
                && !current_split.trim().is_empty()
            {
                splits.push(current_split.trim().to_string());
                current_split.clear();
                current_token_count = 0;
            }

            current_split.push_str(paragraph);
            current_split.push_str("\n\n");
            current_token_count += paragraph_tokens;
        }
    }

    if !current_split.trim().is_empty() {
        splits.push(current_split.trim().to_string());
    }

    splits
}

/// Split text by sentences
fn split_by_sentences(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let mut splits = Vec::new();
    let mut current_split = String::new();
    let mut current_token_count = 0;

    // Simple sentence boundary detection
    let sentences = text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    for (i, sentence) in sentences.iter().enumerate() {
        let sentence_with_punct = if i < sentences.len() - 1 {
            format!("{}. ", sentence)
        } else {
            (*sentence).to_string()
        };

        let sentence_tokens = estimate_token_count(&sentence_with_punct);

        if current_token_count + sentence_tokens > config.target_chunk_size
            && !current_split.trim().is_empty()
        {
            splits.push(current_split.trim().to_string());
            current_split.clear();
            current_token_count = 0;
        }

        current_split.push_str(&sentence_with_punct);
        current_token_count += sentence_tokens;
    }

    if !current_split.trim().is_empty() {
        splits.push(current_split.trim().to_string());
    }

    splits
}

/// Split text by words as a last resort
fn split_by_words(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let mut splits = Vec::new();
    let mut current_split = String::new();
    let mut current_token_count = 0;

    for word in text.split_whitespace() {
        let word_with_space = format!("{} ", word);
        let word_tokens = estimate_token_count(&word_with_space);

        if current_token_count + word_tokens > config.target_chunk_size
            && !current_split.trim().is_empty()
        {
            splits.push(current_split.trim().to_string());
            current_split.clear();
            current_token_count = 0;
        }

        current_split.push_str(&word_with_space);
        current_token_count += word_tokens;
    }

    if !current_split.trim().is_empty() {
        splits.push(current_split.trim().to_string());
    }

    splits
}

/// Post-process chunks: merge undersized neighbors, add overlap, re-index
fn post_process_chunks(chunks: Vec<PageChunk>, config: &ChunkingConfig) -> Vec<PageChunk> {
    if chunks.is_empty() {
        return chunks;
    }

    let mut processed = Vec::new();
    let mut pending_merge: Option<PageChunk> = None;

    for chunk in chunks {
        if let Some(mut pending) = pending_merge.take() {
            if chunk.token_count < config.min_chunk_size
                && pending.token_count + chunk.token_count <= config.max_chunk_size
            {
                pending.content.push_str("\n\n");
                pending.content.push_str(&chunk.content);
                pending.token_count += chunk.token_count;
                pending_merge = Some(pending);
                continue;
            }
            processed.push(pending);
        }

        if chunk.token_count < config.min_chunk_size {
            pending_merge = Some(chunk);
        } else {
            processed.push(chunk);
        }
    }

    if let Some(pending) = pending_merge {
        processed.push(pending);
    }

    if config.overlap_size > 0 {
        processed = add_overlap(processed, config);
    }

    for (i, chunk) in processed.iter_mut().enumerate() {
        chunk.chunk_index = i;
    }

    processed
}

/// Prefix each chunk with the tail of its predecessor from the same page
fn add_overlap(mut chunks: Vec<PageChunk>, config: &ChunkingConfig) -> Vec<PageChunk> {
    let mut i = 1;
    while i < chunks.len() {
        let (left, right) = chunks.split_at_mut(i);
        let prev_chunk = &left[i - 1];
        let curr_chunk = &mut right[0];

        if prev_chunk.page_label == curr_chunk.page_label
            && prev_chunk.file_name == curr_chunk.file_name
        {
            let overlap_text = extract_overlap_text(&prev_chunk.content, config.overlap_size);
            if !overlap_text.is_empty() {
                curr_chunk.content = format!("{}\n\n{}", overlap_text, curr_chunk.content);
                curr_chunk.token_count += estimate_token_count(&overlap_text);
            }
        }
        i += 1;
    }

    chunks
}

/// Extract overlap text from the end of a chunk
fn extract_overlap_text(content: &str, overlap_tokens: usize) -> String {
    let words: Vec<&str> = content.split_whitespace().collect();
    let word_count = (overlap_tokens as f64 * 0.75) as usize; // Rough word-to-token ratio

    if words.len() <= word_count {
        return String::new();
    }

    words[words.len() - word_count.min(words.len())..].join(" ")
}

/// Estimate token count using a simple heuristic
/// This is a rough approximation - actual tokenization would be more accurate
#[inline]
pub fn estimate_token_count(text: &str) -> usize {
    // Rough heuristic: 1 token ≈ 0.75 words for English text
    // Add extra tokens for punctuation and special characters
    let word_count = text.split_whitespace().count();
    let punct_count = text.chars().filter(|c| c.is_ascii_punctuation()).count();

    (punct_count as f64).mul_add(0.1, word_count as f64 / 0.75) as usize
}
