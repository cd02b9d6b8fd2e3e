use super::*;

fn chunk(file_name: &str, page_label: &str, content: &str) -> ChunkMetadata {
    ChunkMetadata {
        file_name: file_name.to_string(),
        page_label: page_label.to_string(),
        content: content.to_string(),
        token_count: 10,
        chunk_index: 0,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[test]
fn extracts_file_and_page_pairs() {
    let chunks = vec![
        chunk("manual.pdf", "3", "first"),
        chunk("guide.pdf", "1", "second"),
    ];

    let sources = extract_sources(&chunks);

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].file_name, "manual.pdf");
    assert_eq!(sources[0].page, "3");
    assert_eq!(sources[1].file_name, "guide.pdf");
    assert_eq!(sources[1].page, "1");
}

#[test]
fn deduplicates_repeated_pairs_preserving_order() {
    let chunks = vec![
        chunk("manual.pdf", "3", "chunk a"),
        chunk("guide.pdf", "1", "chunk b"),
        chunk("manual.pdf", "3", "chunk c"),
        chunk("manual.pdf", "4", "chunk d"),
    ];

    let sources = extract_sources(&chunks);

    assert_eq!(
        sources,
        vec![
            SourceRef {
                file_name: "manual.pdf".to_string(),
                page: "3".to_string(),
            },
            SourceRef {
                file_name: "guide.pdf".to_string(),
                page: "1".to_string(),
            },
            SourceRef {
                file_name: "manual.pdf".to_string(),
                page: "4".to_string(),
            },
        ]
    );
}

#[test]
fn same_page_in_different_files_is_distinct() {
    let chunks = vec![chunk("a.pdf", "1", "x"), chunk("b.pdf", "1", "y")];

    let sources = extract_sources(&chunks);
    assert_eq!(sources.len(), 2);
}

#[test]
fn skips_chunks_with_missing_metadata() {
    let chunks = vec![
        chunk("", "1", "no file"),
        chunk("manual.pdf", "", "no page"),
        chunk("manual.pdf", "2", "complete"),
    ];

    let sources = extract_sources(&chunks);

    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].file_name, "manual.pdf");
    assert_eq!(sources[0].page, "2");
}

#[test]
fn empty_chunks_yield_no_sources() {
    assert!(extract_sources(&[]).is_empty());
}

#[test]
fn source_ref_serialization() {
    let source = SourceRef {
        file_name: "manual.pdf".to_string(),
        page: "7".to_string(),
    };

    let json = serde_json::to_value(&source).expect("should serialize");
    assert_eq!(json["file_name"], "manual.pdf");
    assert_eq!(json["page"], "7");

    let back: SourceRef = serde_json::from_value(json).expect("should deserialize");
    assert_eq!(back, source);
}
