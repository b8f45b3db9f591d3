use std::sync::Arc;

use crate::config::RenderConfig;
use crate::error::Error;
use crate::models::{FilterTicket, TranscriptPayload};
use crate::render::Renderer;
use crate::storage::{ArcStorage, MockStorage, Storage, sqlite::Sqlite};

use super::*;

async fn sqlite() -> ArcStorage {
    Arc::new(Sqlite::open(None, true).await.unwrap())
}

fn payload(transcript_id: &str, creator_name: &str, closed_at: &str) -> TranscriptPayload {
    let body = serde_json::json!({
        "ticket": {
            "channel_id": "c-1",
            "creator_name": creator_name,
            "creator_id": "u-1",
            "topic": "Billing",
            "transcript_id": transcript_id,
            "created_at": "2024-05-01T10:00:00Z",
            "closed_at": closed_at,
            "closed_by_name": "Mod1"
        },
        "messages": [
            {
                "author_name": creator_name,
                "is_admin": false,
                "content": "<b>hi</b>",
                "timestamp": "2024-05-01T10:00:00Z"
            },
            {
                "author_name": "Mod1",
                "is_admin": true,
                "content": "How can I help?",
                "timestamp": "2024-05-01T10:01:00Z"
            }
        ]
    });
    TranscriptPayload::parse(body.to_string().as_bytes()).unwrap()
}

fn transcript_service(storage: ArcStorage) -> TranscriptService {
    TranscriptService::new(
        storage,
        Renderer::from_config(&RenderConfig::default()).unwrap(),
    )
}

#[tokio::test]
async fn test_ingest_then_render() {
    let storage = sqlite().await;
    let ingest = IngestService::new(storage.clone());

    let path = ingest
        .ingest(payload("abc123def", "Ann", "2024-05-01T11:00:00Z"))
        .await
        .unwrap();
    assert_eq!(path, "/abc123def");

    let page = transcript_service(storage.clone())
        .render("abc123def")
        .await
        .unwrap();
    assert!(page.contains("&lt;b&gt;hi&lt;/b&gt;"));
    assert!(page.contains("abc123"));
    let first = page.find("&lt;b&gt;hi").unwrap();
    let second = page.find("How can I help?").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_ingest_duplicate() {
    let storage = sqlite().await;
    let ingest = IngestService::new(storage.clone());

    ingest
        .ingest(payload("dup", "Ann", "2024-05-01T11:00:00Z"))
        .await
        .unwrap();
    let err = ingest
        .ingest(payload("dup", "Bob", "2024-05-01T12:00:00Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(ref id) if id == "dup"));

    let ticket = storage
        .get_ticket_by_transcript_id("dup")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ticket.creator_name(), "Ann");
}

#[tokio::test]
async fn test_ingest_invalid_payload_writes_nothing() {
    let storage = sqlite().await;
    let ingest = IngestService::new(storage.clone());

    let err = ingest
        .ingest(TranscriptPayload::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPayload(_)));
    assert!(
        storage
            .list_tickets(FilterTicket::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_ingest_storage_failure() {
    let mut storage = MockStorage::new();
    storage
        .expect_insert_transcript()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("disk I/O error")));

    let err = IngestService::new(Arc::new(storage))
        .ingest(payload("x", "Ann", "2024-05-01T11:00:00Z"))
        .await
        .unwrap_err();
    match err {
        Error::StorageFailure(report) => assert!(report.to_string().contains("disk I/O error")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_ingest_invalid_payload_skips_storage() {
    let mut storage = MockStorage::new();
    storage.expect_insert_transcript().never();

    let err = IngestService::new(Arc::new(storage))
        .ingest(TranscriptPayload::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPayload(_)));
}

#[tokio::test]
async fn test_render_unknown_transcript() {
    let err = transcript_service(sqlite().await)
        .render("missing")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(ref id) if id == "missing"));
}

#[tokio::test]
async fn test_render_storage_failure() {
    let mut storage = MockStorage::new();
    storage
        .expect_get_ticket_by_transcript_id()
        .returning(|_| Err(eyre::eyre!("database is locked")));

    let err = transcript_service(Arc::new(storage))
        .render("abc")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StorageFailure(_)));
}

#[tokio::test]
async fn test_search() {
    let storage = sqlite().await;
    let ingest = IngestService::new(storage.clone());
    ingest
        .ingest(payload("t1", "Ann", "2024-05-01T11:00:00Z"))
        .await
        .unwrap();
    ingest
        .ingest(payload("t2", "Bob", "2024-05-01T13:00:00Z"))
        .await
        .unwrap();
    ingest
        .ingest(payload("t3", "Annika", "2024-05-01T12:00:00Z"))
        .await
        .unwrap();

    let search = SearchService::new(storage);

    let all: Vec<String> = search
        .list(FilterTicket::default())
        .await
        .unwrap()
        .iter()
        .map(|t| t.transcript_id().to_string())
        .collect();
    assert_eq!(all, vec!["t2", "t3", "t1"]);

    let ann: Vec<String> = search
        .list(FilterTicket::default().with_creator_name("Ann"))
        .await
        .unwrap()
        .iter()
        .map(|t| t.transcript_id().to_string())
        .collect();
    assert_eq!(ann, vec!["t3", "t1"]);
}
