use super::*;
use crate::config::Config;

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
fn client_configuration() {
    let config = Config::default();
    let client = GenerationClient::new(&config).expect("should create client");

    assert_eq!(client.model, "llama3.2:3b");
    assert!((client.temperature - 0.0).abs() < f32::EPSILON);
    assert_eq!(client.num_ctx, 2048);
}

#[test]
fn prompt_includes_context_and_question() {
    let chunks = vec![chunk("manual.pdf", "3", "The warranty lasts two years.")];
    let prompt = build_prompt("How long is the warranty?", &chunks);

    assert!(prompt.contains("Context information is below."));
    assert!(prompt.contains("[manual.pdf, page 3]"));
    assert!(prompt.contains("The warranty lasts two years."));
    assert!(prompt.contains("Query: How long is the warranty?"));
    assert!(prompt.contains("not prior knowledge"));
    assert!(prompt.ends_with("Answer: "));
}

#[test]
fn prompt_orders_multiple_chunks_by_retrieval_rank() {
    let chunks = vec![
        chunk("a.pdf", "1", "first chunk"),
        chunk("b.pdf", "2", "second chunk"),
    ];
    let prompt = build_prompt("question", &chunks);

    let first = prompt.find("first chunk").expect("first chunk in prompt");
    let second = prompt.find("second chunk").expect("second chunk in prompt");
    assert!(first < second);
}

#[test]
fn prompt_with_no_chunks_has_empty_context() {
    let prompt = build_prompt("anything", &[]);

    assert!(prompt.contains("---------------------\n---------------------"));
    assert!(prompt.contains("Query: anything"));
}

#[test]
fn generate_request_serialization() {
    let request = GenerateRequest {
        model: "llama3.2:3b".to_string(),
        prompt: "test prompt".to_string(),
        stream: false,
        options: GenerateOptions {
            temperature: 0.0,
            num_ctx: 2048,
        },
    };

    let json = serde_json::to_value(&request).expect("should serialize");
    assert_eq!(json["model"], "llama3.2:3b");
    assert_eq!(json["stream"], false);
    assert_eq!(json["options"]["num_ctx"], 2048);
    assert_eq!(json["options"]["temperature"], 0.0);
}
