use chrono::{Duration, Utc};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use govdraft::error::Error;
use govdraft::store::{DocumentRecord, DocumentStore};

fn record(id: &str, document_type: &str, minutes_ago: i64, tokens: u64, cost: f64) -> DocumentRecord
{   let at = Utc::now() - Duration::minutes(minutes_ago);
    DocumentRecord
    {   id: id.to_string()
      , document_type: document_type.to_string()
      , subject: format!("Subject {}", id)
      , generated_content: "body".to_string()
      , sender_name: Some("Project Director".to_string())
      , sender_designation: Some("Project Director, PMU".to_string())
      , recipient_name: None
      , recipient_organization: None
      , reference_number: None
      , priority: Some("normal".to_string())
      , docx_path: None
      , pdf_path: None
      , tokens_used: tokens
      , cost_estimate: cost
      , model_used: Some("claude-sonnet-4-20250514".to_string())
      , metadata: json!({ "attachments": [] })
      , created_at: at
      , updated_at: at
    }
}

fn file_url(dir: &std::path::Path) -> String
{   format!("sqlite://{}", dir.join("records.db").display())
}

#[tokio::test]
async fn test_save_and_get()
{   let store = assert_ok!(DocumentStore::in_memory().await);
    let mut saved = record("a", "memo", 0, 10, 0.1);
    saved.recipient_name = Some("Municipal Commissioner".to_string());
    saved.metadata = json!({ "attachments": ["Annexure A"], "meeting_date": null });
    let id = assert_ok!(store.save(saved.clone()).await);
    assert_eq!(id, "a");

    let found = assert_ok!(store.get("a").await).expect("record a");
    assert_eq!(found.subject, "Subject a");
    assert_eq!(found.recipient_name.as_deref(), Some("Municipal Commissioner"));
    assert_eq!(found.metadata["attachments"][0], "Annexure A");
    assert_eq!(found.created_at, saved.created_at);
    assert!(assert_ok!(store.get("missing").await).is_none());
}

#[tokio::test]
async fn test_list_filters_orders_and_paginates()
{   let store = assert_ok!(DocumentStore::in_memory().await);
    assert_ok!(store.save(record("old", "memo", 30, 1, 0.0)).await);
    assert_ok!(store.save(record("new", "memo", 1, 1, 0.0)).await);
    assert_ok!(store.save(record("mid", "email", 10, 1, 0.0)).await);
    assert_ok!(store.save(record("mid-memo", "memo", 9, 1, 0.0)).await);

    let all = assert_ok!(store.list(0, 50, None).await);
    assert_eq!(all.total, 4);
    let ids: Vec<&str> = all.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid-memo", "mid", "old"]);

    let memos = assert_ok!(store.list(1, 1, Some("memo")).await);
    assert_eq!(memos.total, 3);
    assert_eq!(memos.documents.len(), 1);
    assert_eq!(memos.documents[0].id, "mid-memo");

    let beyond = assert_ok!(store.list(10, 5, None).await);
    assert_eq!(beyond.total, 4);
    assert!(beyond.documents.is_empty());
}

#[tokio::test]
async fn test_stats_totals_and_rounding()
{   let store = assert_ok!(DocumentStore::in_memory().await);
    assert_ok!(store.save(record("a", "memo", 0, 500, 0.0039)).await);
    assert_ok!(store.save(record("b", "memo", 0, 1000, 0.0078)).await);
    assert_ok!(store.save(record("c", "circular", 0, 250, 0.00201)).await);

    let stats = assert_ok!(store.stats().await);
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_tokens_used, 1750);
    assert!((stats.total_cost_estimate - 0.0137).abs() < 1e-9);
    assert_eq!(stats.documents_by_type.get("memo"), Some(&2));
    assert_eq!(stats.documents_by_type.get("circular"), Some(&1));
}

#[tokio::test]
async fn test_stats_on_empty_store()
{   let store = assert_ok!(DocumentStore::in_memory().await);
    let stats = assert_ok!(store.stats().await);
    assert_eq!(stats.total_documents, 0);
    assert_eq!(stats.total_tokens_used, 0);
    assert_eq!(stats.total_cost_estimate, 0.0);
    assert!(stats.documents_by_type.is_empty());
}

#[tokio::test]
async fn test_file_store_survives_reconnect()
{   let dir = tempfile::tempdir().unwrap();
    let url = file_url(dir.path());

    let store = assert_ok!(DocumentStore::connect(&url).await);
    assert_eq!(assert_ok!(store.list(0, 50, None).await).total, 0);
    assert_ok!(store.save(record("a", "email", 0, 42, 0.01)).await);
    drop(store);

    let reopened = assert_ok!(DocumentStore::connect(&url).await);
    let found = assert_ok!(reopened.get("a").await).expect("persisted record");
    assert_eq!(found.tokens_used, 42);
    assert_eq!(found.document_type, "email");
}

#[tokio::test]
async fn test_save_replaces_same_id()
{   let store = assert_ok!(DocumentStore::in_memory().await);
    assert_ok!(store.save(record("a", "memo", 0, 1, 0.0)).await);
    assert_ok!(store.save(record("a", "memo", 0, 99, 0.0)).await);
    assert_eq!(assert_ok!(store.list(0, 50, None).await).total, 1);
    let found = assert_ok!(store.get("a").await).unwrap();
    assert_eq!(found.tokens_used, 99);
}

#[tokio::test]
async fn test_failed_save_leaves_no_record()
{   let dir = tempfile::tempdir().unwrap();
    let url = file_url(dir.path());
    let store = assert_ok!(DocumentStore::connect(&url).await);

    let side = sqlx::SqlitePool::connect(&url).await.unwrap();
    sqlx::query(
      "CREATE TRIGGER reject_insert BEFORE INSERT ON generated_documents
       BEGIN SELECT RAISE(ABORT, 'disk full'); END"
    ).execute(&side).await.unwrap();
    side.close().await;

    let err = assert_err!(store.save(record("a", "memo", 0, 10, 0.1)).await);
    assert!(matches!(&err, Error::Storage(msg) if msg.contains("disk full")));
    assert!(assert_ok!(store.get("a").await).is_none());
    assert_eq!(assert_ok!(store.list(0, 50, None).await).total, 0);
    assert_eq!(assert_ok!(store.stats().await).total_documents, 0);
}

#[tokio::test]
async fn test_unopenable_database_is_a_storage_error()
{   let dir = tempfile::tempdir().unwrap();
    let url = file_url(&dir.path().join("missing-dir"));
    let result = DocumentStore::connect(&url).await;
    assert!(matches!(result, Err(Error::Storage(_))));
}
