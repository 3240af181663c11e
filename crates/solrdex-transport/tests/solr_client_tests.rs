//! HTTP-level tests for the Solr transport against a local mock server

#![allow(clippy::unwrap_used)] // Tests can use unwrap for assertions
#![allow(clippy::expect_used)] // Tests can use expect for setup

use serde_json::json;
use solrdex_common::CorrelationId;
use solrdex_transport::{
    CommitPolicy, ExtractRequest, SearchTransport, SelectQuery, SolrClient, TransportError,
    UpdateRequest,
};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CORE_PATH: &str = "/solr/nextcloud";

/// Client bound to the `nextcloud` core of the mock server
fn client_for(server: &MockServer) -> SolrClient {
    SolrClient::new(
        format!("{}{CORE_PATH}/", server.uri()),
        Duration::from_secs(5),
    )
    .expect("client should build")
}

#[tokio::test]
async fn test_extract_uploads_file_with_literals() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{CORE_PATH}/update/extract")))
        .and(query_param("literal.id", "files!42"))
        .and(query_param("fmap.content", "text"))
        .and(query_param("uprefix", "attr_"))
        .and(query_param("commit", "true"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_string("hello solr"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"responseHeader":{"status":0}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello solr").unwrap();

    let mut request = ExtractRequest::new(file.path(), CommitPolicy::Immediate);
    request.add_field("id", "files!42");
    request
        .field_mappings
        .insert("content".to_string(), "text".to_string());
    request.unknown_field_prefix = Some("attr_".to_string());

    let response = client_for(&server)
        .extract(&request, &CorrelationId::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_extract_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{CORE_PATH}/update/extract")))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error":{"msg":"TikaException","code":500}}"#),
        )
        .mount(&server)
        .await;

    let file = tempfile::NamedTempFile::new().unwrap();
    let request = ExtractRequest::new(file.path(), CommitPolicy::Within { millis: 1000 });

    let err = client_for(&server)
        .extract(&request, &CorrelationId::new())
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(500));
    assert!(err.body().unwrap().contains("TikaException"));
}

#[tokio::test]
async fn test_extract_missing_file_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = ExtractRequest::new("/nonexistent/solrdex/file.bin", CommitPolicy::Immediate);
    let err = client_for(&server)
        .extract(&request, &CorrelationId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Io { .. }));
}

#[tokio::test]
async fn test_delete_by_id_posts_json_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{CORE_PATH}/update")))
        .and(query_param("commit", "true"))
        .and(body_json(json!({"delete": {"id": "files!42"}})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update(&UpdateRequest::delete_by_id("files!42"), &CorrelationId::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_not_found_is_reported_as_such() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{CORE_PATH}/update")))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .update(&UpdateRequest::delete_by_id("files!1"), &CorrelationId::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_select_sends_repeated_filters_and_returns_raw_body() {
    let body = r#"{"responseHeader":{"QTime":3},"response":{"numFound":0,"docs":[]}}"#;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{CORE_PATH}/select")))
        .and(query_param("q", "budget"))
        .and(query_param("fq", "attr_tags:(finance)"))
        .and(query_param("fq", "attr_author:\"alice\""))
        .and(query_param("rows", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let query = SelectQuery {
        query: "budget".to_string(),
        rows: 5,
        filters: vec![
            "attr_tags:(finance)".to_string(),
            "attr_author:\"alice\"".to_string(),
        ],
        ..SelectQuery::default()
    };

    let response = client_for(&server)
        .select(&query, &CorrelationId::new())
        .await
        .unwrap();

    assert_eq!(response.body, body);
}

#[tokio::test]
async fn test_ping_reads_status_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{CORE_PATH}/admin/ping")))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"OK"}"#))
        .mount(&server)
        .await;

    assert!(client_for(&server).ping().await.unwrap());
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let client = SolrClient::new("http://127.0.0.1:9/solr/nextcloud", Duration::from_secs(1))
        .unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, TransportError::Connection(_)));
}
