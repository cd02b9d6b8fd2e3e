use super::estimate_token_count as estimate_token_count_impl;
use super::*;

fn page(file_name: &str, page_label: &str, text: &str) -> PdfPage {
    PdfPage {
        file_name: file_name.to_string(),
        page_label: page_label.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn estimate_token_count() {
    assert_eq!(estimate_token_count_impl("hello world"), 2);
    assert_eq!(estimate_token_count_impl("This is a test."), 5);
    assert_eq!(estimate_token_count_impl(""), 0);
}

#[test]
fn small_page_is_single_chunk() {
    let config = ChunkingConfig::default();
    let chunks = chunk_page(
        &page("manual.pdf", "3", "A short page about warranty terms."),
        &config,
    );

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].file_name, "manual.pdf");
    assert_eq!(chunks[0].page_label, "3");
    assert_eq!(chunks[0].chunk_index, 0);
    assert!(chunks[0].content.contains("warranty"));
}

#[test]
fn large_page_is_split() {
    let config = ChunkingConfig {
        target_chunk_size: 50,
        max_chunk_size: 100,
        min_chunk_size: 10,
        overlap_size: 0,
        ..ChunkingConfig::default()
    };
    let text = "Advanced usage involves understanding complex concepts. ".repeat(100);
    let chunks = chunk_page(&page("manual.pdf", "7", &text), &config);

    assert!(chunks.len() > 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, i);
        assert_eq!(chunk.page_label, "7");
        assert_eq!(chunk.file_name, "manual.pdf");
    }
}

#[test]
fn paragraphs_group_up_to_target() {
    let config = ChunkingConfig {
        target_chunk_size: 100,
        max_chunk_size: 200,
        min_chunk_size: 50,
        overlap_size: 0,
        ..ChunkingConfig::default()
    };
    let paragraph = "One paragraph of filler text follows here with several words. ".repeat(4);
    let text = [paragraph.as_str(); 6].join("\n\n");
    let chunks = chunk_page(&page("manual.pdf", "1", &text), &config);

    assert!(chunks.len() > 1);
    // No chunk should grossly exceed the target size once merging is done
    for chunk in &chunks {
        assert!(chunk.token_count <= config.max_chunk_size);
    }
}

#[test]
fn overlap_prefixes_following_chunk() {
    let config = ChunkingConfig {
        target_chunk_size: 100,
        max_chunk_size: 200,
        min_chunk_size: 50,
        overlap_size: 20,
        ..ChunkingConfig::default()
    };
    let text = "alpha beta gamma delta epsilon zeta eta theta. ".repeat(60);
    let chunks = chunk_page(&page("manual.pdf", "2", &text), &config);

    assert!(chunks.len() > 1);
    // The second chunk begins with the tail words of the first
    let tail: Vec<&str> = chunks[0].content.split_whitespace().rev().take(3).collect();
    for word in tail {
        assert!(chunks[1].content.contains(word));
    }
}

#[test]
fn chunks_never_span_pages() {
    let config = ChunkingConfig::default();
    let pages = vec![
        page("a.pdf", "1", "Content of the first page."),
        page("a.pdf", "2", "Content of the second page."),
        page("b.pdf", "1", "Content of another document."),
    ];
    let chunks = chunk_pages(&pages, &config);

    assert_eq!(chunks.len(), 3);
    let pairs: Vec<(&str, &str)> = chunks
        .iter()
        .map(|c| (c.file_name.as_str(), c.page_label.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a.pdf", "1"), ("a.pdf", "2"), ("b.pdf", "1")]);
}

#[test]
fn empty_page_yields_no_chunks() {
    let config = ChunkingConfig::default();
    let chunks = chunk_page(&page("manual.pdf", "9", "   \n  "), &config);
    assert!(chunks.is_empty());
}
