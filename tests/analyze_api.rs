//! End-to-end API tests with a mocked OpenAI-compatible backend

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use nf_rag::cnae::{CnaeRecord, CnaeTable, Rate};
use nf_rag::config::RagConfig;
use nf_rag::providers::OpenAiProvider;
use nf_rag::server::state::AppState;
use nf_rag::server::RagServer;

fn test_state(base_url: String) -> (RagConfig, AppState) {
    let mut config = RagConfig::default();
    config.llm.base_url = base_url;
    config.llm.api_key = "test-key".to_string();
    config.llm.max_retries = 0;

    let record = CnaeRecord {
        code: Some(Rate::Text("6201-5/00".to_string())),
        description: Some("Desenvolvimento de programas de computador".to_string()),
        iss_rate: Some(Rate::Number(0.05)),
        ..Default::default()
    };
    let cnae = Arc::new(CnaeTable::from_records(vec![record], "cnae_table.json"));

    let (embedder, llm) = OpenAiProvider::new(&config.llm).split();
    let state = AppState::with_providers(
        config.clone(),
        cnae,
        Arc::new(embedder),
        Arc::new(llm),
    );

    (config, state)
}

async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn post_multipart(
    router: axum::Router,
    uri: &str,
    field_name: &str,
    filename: &str,
    data: &[u8],
) -> (StatusCode, Value) {
    let boundary = "nf-rag-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_empty_content_is_rejected_with_400() {
    // No backend calls happen for empty input
    let (config, state) = test_state("http://localhost:1".to_string());
    let router = RagServer::router_with_state(&config, state);

    let (status, body) = post_json(router, "/upload_nf_texto", json!({"conteudo": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_input");
    assert_eq!(body["error"]["message"], "O conteúdo textual está vazio.");
}

#[tokio::test]
async fn test_text_analysis_returns_llm_summary() {
    let server = MockServer::start_async().await;

    // Batch embedding for the invoice + CNAE reference chunks
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .body_contains("NF-e 100 servicos de informatica");
            then.status(200).json_body(json!({
                "data": [
                    {"index": 0, "embedding": [1.0, 0.0]},
                    {"index": 1, "embedding": [0.8, 0.2]}
                ]
            }));
        })
        .await;

    // Query embedding
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .body_contains("Qual a aliquota do ISS");
            then.status(200).json_body(json!({
                "data": [
                    {"index": 0, "embedding": [1.0, 0.0]}
                ]
            }));
        })
        .await;

    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200).json_body(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "ISS de 5% sobre o valor do serviço."}}
                ]
            }));
        })
        .await;

    let (config, state) = test_state(server.base_url());
    let router = RagServer::router_with_state(&config, state);

    let (status, body) = post_json(
        router,
        "/upload_nf_texto?pergunta=Qual%20a%20aliquota%20do%20ISS",
        json!({"conteudo": "NF-e 100 servicos de informatica valor 2000"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Texto analisado com sucesso.");
    // The summary is the LLM output verbatim
    assert_eq!(
        body["resumo_tributario"],
        "ISS de 5% sobre o valor do serviço."
    );
    assert!(body["sources"].as_array().is_some_and(|s| !s.is_empty()));
    chat_mock.assert_async().await;
}

#[tokio::test]
async fn test_trailing_slash_alias() {
    let (config, state) = test_state("http://localhost:1".to_string());
    let router = RagServer::router_with_state(&config, state);

    // The original front end posts to the slash-terminated path
    let (status, _) = post_json(router, "/upload_nf_texto/", json!({"conteudo": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_llm_failure_maps_to_503() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .body_contains("NF-e 100 servicos de informatica");
            then.status(200).json_body(json!({
                "data": [
                    {"index": 0, "embedding": [1.0, 0.0]},
                    {"index": 1, "embedding": [0.8, 0.2]}
                ]
            }));
        })
        .await;

    // Query embedding uses the default analysis question
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .body_contains("Analise os dados da nota fiscal");
            then.status(200).json_body(json!({
                "data": [
                    {"index": 0, "embedding": [1.0, 0.0]}
                ]
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500).body("upstream exploded");
        })
        .await;

    let (config, state) = test_state(server.base_url());
    let router = RagServer::router_with_state(&config, state);

    let (status, body) = post_json(
        router,
        "/upload_nf_texto",
        json!({"conteudo": "NF-e 100 servicos de informatica valor 2000"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "llm_error");
}

#[tokio::test]
async fn test_pdf_upload_without_file_field_is_rejected() {
    let (config, state) = test_state("http://localhost:1".to_string());
    let router = RagServer::router_with_state(&config, state);

    // A multipart body whose only field is not named "file"
    let (status, body) =
        post_multipart(router, "/upload_nf", "metadata", "nota.pdf", b"ignored").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_input");
    assert_eq!(body["error"]["message"], "Nenhum arquivo foi enviado.");
}

#[tokio::test]
async fn test_pdf_upload_rejects_non_pdf_extension() {
    let (config, state) = test_state("http://localhost:1".to_string());
    let router = RagServer::router_with_state(&config, state);

    let (status, body) =
        post_multipart(router, "/upload_nf", "file", "nota.txt", b"texto plano").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "unsupported_type");
}

#[tokio::test]
async fn test_pdf_upload_rejects_unparseable_pdf() {
    let (config, state) = test_state("http://localhost:1".to_string());
    let router = RagServer::router_with_state(&config, state);

    // Right extension, but the bytes are not a PDF; extraction fails before
    // any backend call is made
    let (status, body) =
        post_multipart(router, "/upload_nf", "file", "nota.pdf", b"not a pdf at all").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "parse_error");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (config, state) = test_state("http://localhost:1".to_string());
    let router = RagServer::router_with_state(&config, state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
