//! Router behavior against the in-memory transport

#![allow(clippy::unwrap_used)] // Tests can use unwrap for assertions
#![allow(clippy::expect_used)] // Tests can use expect for setup

use solrdex_document::{ContentEncoding, DocumentKind, IndexStatus, Severity};
use solrdex_indexing::{
    IndexMapper, IndexRouter, IndexRunner, RecordingRunner, ResultType, RunnerEvent,
};
use solrdex_test_utils::sample_document;
use solrdex_transport::{CommitPolicy, MockTransport, UpdateCommand};
use std::io::Write;
use std::sync::Arc;

fn router_with(transport: &MockTransport) -> (IndexRouter, Arc<RecordingRunner>) {
    let runner = Arc::new(RecordingRunner::new());
    let router = IndexRouter::new(IndexMapper::new(Arc::new(transport.clone())))
        .with_runner(Arc::clone(&runner) as Arc<dyn IndexRunner>);
    (router, runner)
}

#[tokio::test]
async fn test_new_document_is_extracted_and_marked_done() {
    let transport = MockTransport::new();
    let (router, runner) = router_with(&transport);
    let mut document = sample_document();

    let status = router.index_document(&mut document).await;

    assert_eq!(status, IndexStatus::DONE);
    assert!(document.index.last_index.is_some());
    assert!(document.index.errors.is_empty());

    let extracts = transport.extracts();
    assert_eq!(extracts.len(), 1);
    assert_eq!(
        extracts[0].request.field("id"),
        [format!("files!{}", document.id)]
    );
    assert_eq!(extracts[0].request.commit, CommitPolicy::Immediate);

    assert_eq!(runner.result_types(), vec![ResultType::Success]);
    match &runner.events()[1] {
        RunnerEvent::Result { message, status, .. } => {
            assert_eq!(status, "ok");
            assert!(message.contains("responseHeader"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_update_status_takes_the_extract_path() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document().with_status(IndexStatus::FULL);

    router.index_document(&mut document).await;

    assert_eq!(transport.extracts().len(), 1);
    assert!(transport.updates().is_empty());
}

#[tokio::test]
async fn test_container_is_rejected_without_engine_call() {
    let transport = MockTransport::new();
    let (router, runner) = router_with(&transport);
    let mut document = sample_document().with_kind(DocumentKind::Directory);

    let status = router.index_document(&mut document).await;

    assert_eq!(status, IndexStatus::FAILED);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(document.index.errors.len(), 1);
    assert_eq!(document.index.errors[0].exception, "NotIndexableDocument");
    assert_eq!(
        runner.result_types(),
        vec![ResultType::Warning, ResultType::Fail]
    );
}

#[tokio::test]
async fn test_unsupported_provider_is_rejected() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document();
    document.provider_id = "bookmarks".to_string();

    router.index_document(&mut document).await;

    assert_eq!(transport.call_count(), 0);
    assert_eq!(document.index.errors[0].exception, "ProviderNotCompatible");
}

#[tokio::test]
async fn test_missing_access_is_rejected() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document();
    document.access = None;

    let status = router.index_document(&mut document).await;

    assert_eq!(status, IndexStatus::FAILED);
    assert_eq!(document.index.errors[0].exception, "AccessContextMissing");
}

#[tokio::test]
async fn test_engine_failure_reports_warning_error_fail_in_order() {
    let transport = MockTransport::new().with_extract_failure(
        500,
        r#"{"error":{"msg":"org.apache.tika.exception.TikaException","code":500}}"#,
    );
    let (router, runner) = router_with(&transport);
    let mut document = sample_document();

    let status = router.index_document(&mut document).await;

    assert_eq!(status, IndexStatus::FAILED);
    assert_eq!(transport.extracts().len(), 1, "no retry expected");

    let events = runner.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        RunnerEvent::Action {
            action: "indexDocument".to_string(),
            force: false,
        }
    );
    assert_eq!(
        events[1],
        RunnerEvent::Result {
            message: String::new(),
            status: "issue while indexing".to_string(),
            result_type: ResultType::Warning,
        }
    );
    assert_eq!(
        events[2],
        RunnerEvent::Error {
            message: "org.apache.tika.exception.TikaException".to_string(),
            exception: "DataExtractionFailed".to_string(),
            severity: Severity::Error,
        }
    );
    assert_eq!(
        events[3],
        RunnerEvent::Result {
            message: String::new(),
            status: "fail".to_string(),
            result_type: ResultType::Fail,
        }
    );

    let record = &document.index.errors[0];
    assert_eq!(record.severity, Severity::Error);
    assert_eq!(record.message, "org.apache.tika.exception.TikaException");
}

#[tokio::test]
async fn test_remove_sends_one_delete_with_commit() {
    let transport = MockTransport::new();
    let (router, runner) = router_with(&transport);
    let mut document = sample_document().with_status(IndexStatus::REMOVE);

    let status = router.index_document(&mut document).await;

    assert_eq!(status, IndexStatus::DONE);
    assert!(transport.extracts().is_empty());

    let updates = transport.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].command,
        UpdateCommand::DeleteById(format!("files!{}", document.id))
    );
    assert!(updates[0].commit);

    assert_eq!(
        runner.events(),
        vec![
            RunnerEvent::Action {
                action: "removeDocument".to_string(),
                force: false,
            },
            RunnerEvent::Result {
                message: "{}".to_string(),
                status: "ok".to_string(),
                result_type: ResultType::Success,
            },
        ]
    );
}

#[tokio::test]
async fn test_sub_tag_shadowing_access_list_fails_without_engine_call() {
    let transport = MockTransport::new();
    let (router, runner) = router_with(&transport);
    let mut document = sample_document().with_sub_tag("users", "mallory");

    let status = router.index_document(&mut document).await;

    assert_eq!(status, IndexStatus::FAILED);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(document.index.errors[0].exception, "InvalidSubTag");
    assert_eq!(
        runner.result_types(),
        vec![ResultType::Warning, ResultType::Fail]
    );
}

#[tokio::test]
async fn test_remove_of_unknown_document_succeeds() {
    let transport = MockTransport::new().with_update_failure(404, "Not Found");
    let (router, _) = router_with(&transport);
    let mut document = sample_document().with_status(IndexStatus::REMOVE);

    assert_eq!(router.index_document(&mut document).await, IndexStatus::DONE);
}

#[tokio::test]
async fn test_remove_failure_is_recorded() {
    let transport = MockTransport::new().with_update_failure(503, "unavailable");
    let (router, _) = router_with(&transport);
    let mut document = sample_document().with_status(IndexStatus::REMOVE);

    assert_eq!(router.index_document(&mut document).await, IndexStatus::FAILED);
    assert_eq!(document.index.errors[0].exception, "Transport");
}

#[tokio::test]
async fn test_temporary_file_is_removed_after_success() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document();

    router.index_document(&mut document).await;

    let extract = &transport.extracts()[0];
    assert_eq!(extract.file_content.as_deref(), Some(&b"quarterly numbers"[..]));
    assert!(!extract.request.file.exists());
}

#[tokio::test]
async fn test_temporary_file_is_removed_after_engine_error() {
    let transport = MockTransport::new().with_extract_failure(400, "bad request");
    let (router, _) = router_with(&transport);
    let mut document = sample_document();

    router.index_document(&mut document).await;

    let extract = &transport.extracts()[0];
    assert!(extract.file_content.is_some());
    assert!(!extract.request.file.exists());
}

#[tokio::test]
async fn test_base64_content_is_staged_decoded() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document().with_content("JVBERi0xLjQ=", ContentEncoding::Base64);

    router.index_document(&mut document).await;

    let extract = &transport.extracts()[0];
    assert_eq!(extract.file_content.as_deref(), Some(&b"%PDF-1.4"[..]));
}

#[tokio::test]
async fn test_invalid_base64_fails_before_engine_call() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document().with_content("@@@", ContentEncoding::Base64);

    assert_eq!(router.index_document(&mut document).await, IndexStatus::FAILED);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(document.index.errors[0].exception, "ContentDecoding");
}

#[tokio::test]
async fn test_local_file_is_used_and_kept() {
    let mut local = tempfile::NamedTempFile::new().expect("temp file");
    local.write_all(b"from disk").expect("write");

    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);
    let mut document = sample_document().with_local_path(local.path());

    assert_eq!(router.index_document(&mut document).await, IndexStatus::DONE);

    let extract = &transport.extracts()[0];
    assert_eq!(extract.request.file, local.path());
    assert_eq!(extract.file_content.as_deref(), Some(&b"from disk"[..]));
    assert!(local.path().exists());
}

#[tokio::test]
async fn test_router_without_runner_still_updates_status() {
    let transport = MockTransport::new().with_extract_failure(500, "boom");
    let router = IndexRouter::new(IndexMapper::new(Arc::new(transport.clone())));
    let mut document = sample_document();

    assert_eq!(router.index_document(&mut document).await, IndexStatus::FAILED);
    assert_eq!(document.index.errors[0].message, "Error extracting report.txt");
}

#[tokio::test]
async fn test_delete_indexes_removes_each_pair() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);

    let removed = router
        .delete_indexes(&[("files", "1"), ("files", "2")])
        .await
        .unwrap();

    assert_eq!(removed, 2);
    let ids: Vec<_> = transport
        .updates()
        .into_iter()
        .map(|update| update.command)
        .collect();
    assert_eq!(
        ids,
        vec![
            UpdateCommand::DeleteById("files!1".to_string()),
            UpdateCommand::DeleteById("files!2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_delete_indexes_stops_at_first_failure() {
    let transport = MockTransport::new().with_update_failure(500, "down");
    let (router, _) = router_with(&transport);

    let result = router.delete_indexes(&[("files", "1"), ("files", "2")]).await;

    assert!(result.is_err());
    assert_eq!(transport.updates().len(), 1);
}

#[tokio::test]
async fn test_delete_indexes_rejects_ambiguous_provider() {
    let transport = MockTransport::new();
    let (router, _) = router_with(&transport);

    let result = router.delete_indexes(&[("bad!provider", "1")]).await;

    assert!(result.is_err());
    assert_eq!(transport.call_count(), 0);
}
