#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

/// End-to-end tests for the ask pipeline against a mocked Ollama server
use pdf_rag::{
    config::{Config, OllamaConfig, ServerConfig},
    database::lancedb::{ChunkMetadata, EmbeddingRecord, VectorStore},
    embeddings::chunking::ChunkingConfig,
    indexer::Indexer,
    query::{NOT_FOUND_ANSWER, QueryEngine},
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(mock_server: &MockServer) -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let addr = mock_server.address();
    let config = Config {
        base_dir: temp_dir.path().to_path_buf(),
        ollama: OllamaConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            ..OllamaConfig::default()
        },
        server: ServerConfig::default(),
        chunking: ChunkingConfig::default(),
        pdf_dir: None,
    };
    (config, temp_dir)
}

fn seed_record(
    file_name: &str,
    page_label: &str,
    content: &str,
    vector: Vec<f32>,
) -> EmbeddingRecord {
    EmbeddingRecord {
        id: uuid::Uuid::new_v4().to_string(),
        vector,
        metadata: ChunkMetadata {
            file_name: file_name.to_string(),
            page_label: page_label.to_string(),
            content: content.to_string(),
            token_count: content.split_whitespace().count() as u32,
            chunk_index: 0,
            created_at: chrono::Utc::now().to_rfc3339(),
        },
    }
}

async fn mock_embedding(mock_server: &MockServer, vector: &[f32]) {
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [vector],
        })))
        .mount(mock_server)
        .await;
}

async fn mock_generation(mock_server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": answer,
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn ask_returns_answer_with_citation() {
    let mock_server = MockServer::start().await;
    let (config, _temp_dir) = create_test_config(&mock_server);

    let mut store = VectorStore::new(&config)
        .await
        .expect("should create vector store");
    store
        .store_embeddings_batch(vec![
            seed_record(
                "device_manual.pdf",
                "13",
                "The warranty covers manufacturing defects for two years.",
                vec![1.0, 0.0, 0.0, 0.0, 0.0],
            ),
            seed_record(
                "benefits_guide.pdf",
                "2",
                "Health insurance enrollment opens each November.",
                vec![0.0, 1.0, 0.0, 0.0, 0.0],
            ),
        ])
        .await
        .expect("should seed collection");

    // Query vector lands next to the warranty chunk
    mock_embedding(&mock_server, &[0.9, 0.1, 0.0, 0.0, 0.0]).await;
    mock_generation(&mock_server, "The warranty lasts two years.").await;

    let engine = QueryEngine::new(&config, store).expect("should create query engine");
    let response = engine
        .ask("How long is the warranty?")
        .await
        .expect("ask should succeed");

    assert_eq!(response.answer, "The warranty lasts two years.");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].file_name, "device_manual.pdf");
    assert_eq!(response.sources[0].page, "13");
}

#[tokio::test]
async fn ask_deduplicates_sources_preserving_order() {
    let mock_server = MockServer::start().await;
    let (config, _temp_dir) = create_test_config(&mock_server);

    let mut store = VectorStore::new(&config)
        .await
        .expect("should create vector store");
    store
        .store_embeddings_batch(vec![
            seed_record(
                "device_manual.pdf",
                "13",
                "The warranty covers manufacturing defects.",
                vec![1.0, 0.0, 0.0, 0.0, 0.0],
            ),
            seed_record(
                "device_manual.pdf",
                "13",
                "Water damage is excluded from warranty coverage.",
                vec![0.95, 0.05, 0.0, 0.0, 0.0],
            ),
            seed_record(
                "benefits_guide.pdf",
                "2",
                "Health insurance enrollment opens each November.",
                vec![0.8, 0.2, 0.0, 0.0, 0.0],
            ),
        ])
        .await
        .expect("should seed collection");

    mock_embedding(&mock_server, &[1.0, 0.0, 0.0, 0.0, 0.0]).await;
    mock_generation(&mock_server, "Defects are covered, water damage is not.").await;

    let engine = QueryEngine::new(&config, store)
        .expect("should create query engine")
        .with_top_k(3);
    let response = engine
        .ask("What does the warranty cover?")
        .await
        .expect("ask should succeed");

    // Two chunks share (device_manual.pdf, 13); the pair appears once,
    // first, because its chunks ranked highest
    assert_eq!(response.sources.len(), 2);
    assert_eq!(response.sources[0].file_name, "device_manual.pdf");
    assert_eq!(response.sources[0].page, "13");
    assert_eq!(response.sources[1].file_name, "benefits_guide.pdf");
    assert_eq!(response.sources[1].page, "2");
}

#[tokio::test]
async fn ask_on_empty_collection_short_circuits() {
    let mock_server = MockServer::start().await;
    let (config, _temp_dir) = create_test_config(&mock_server);

    let store = VectorStore::new(&config)
        .await
        .expect("should create vector store");

    mock_embedding(&mock_server, &[0.1, 0.2, 0.3, 0.4, 0.5]).await;

    // The LLM must never be called when retrieval comes back empty
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "should not be used",
        })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let engine = QueryEngine::new(&config, store).expect("should create query engine");
    let response = engine
        .ask("Is anything indexed?")
        .await
        .expect("ask should succeed");

    assert_eq!(response.answer, NOT_FOUND_ANSWER);
    assert!(response.sources.is_empty());
}

// Assembles a one-page PDF with a single text object, computing the xref
// offsets so the file is well formed
fn minimal_pdf(text: &str) -> Vec<u8> {
    let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!("<< /Length {} >>\nstream\n{stream}\nendstream", stream.len()),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_start = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

#[tokio::test]
async fn fresh_store_indexes_pdf_directory() {
    let mock_server = MockServer::start().await;
    let (config, _temp_dir) = create_test_config(&mock_server);

    let pdf_dir = config.pdf_dir_path();
    std::fs::create_dir_all(&pdf_dir).expect("should create pdf dir");
    std::fs::write(
        pdf_dir.join("handbook.pdf"),
        minimal_pdf("Employees accrue fifteen vacation days per year"),
    )
    .expect("should write pdf");

    // One short page chunks to a single embedding request
    mock_embedding(&mock_server, &[0.2, 0.4, 0.6, 0.8, 1.0]).await;

    let mut indexer = Indexer::new(config).await.expect("should create indexer");
    let report = indexer
        .ensure_indexed()
        .await
        .expect("ensure_indexed should succeed");

    assert!(!report.skipped);
    assert_eq!(report.files, 1);
    assert_eq!(report.pages, 1);
    assert!(report.chunks > 0);
    assert!(
        indexer.chunk_count().await.expect("should count chunks") > 0,
        "Indexed chunks must land in the collection"
    );
}

#[tokio::test]
async fn populated_collection_skips_ingestion_entirely() {
    let mock_server = MockServer::start().await;
    let (config, _temp_dir) = create_test_config(&mock_server);

    let mut store = VectorStore::new(&config)
        .await
        .expect("should create vector store");
    store
        .store_embeddings_batch(vec![seed_record(
            "device_manual.pdf",
            "1",
            "Existing indexed content.",
            vec![0.1, 0.2, 0.3, 0.4, 0.5],
        )])
        .await
        .expect("should seed collection");
    drop(store);

    // No embedding calls may happen during the skip path
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[0.0, 0.0, 0.0, 0.0, 0.0]],
        })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut indexer = Indexer::new(config).await.expect("should create indexer");
    let report = indexer
        .ensure_indexed()
        .await
        .expect("ensure_indexed should succeed");

    assert!(report.skipped);
    assert_eq!(
        indexer.chunk_count().await.expect("should count chunks"),
        1
    );
}
