//! Generated-document records in SQLite

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::cost::round_to;
use crate::error::Error;

const SCHEMA: [&str; 2] =
[   "CREATE TABLE IF NOT EXISTS generated_documents (
       id TEXT PRIMARY KEY,
       document_type TEXT NOT NULL,
       subject TEXT NOT NULL,
       generated_content TEXT NOT NULL,
       sender_name TEXT,
       sender_designation TEXT,
       recipient_name TEXT,
       recipient_organization TEXT,
       reference_number TEXT,
       priority TEXT,
       docx_path TEXT,
       pdf_path TEXT,
       tokens_used INTEGER NOT NULL DEFAULT 0,
       cost_estimate REAL NOT NULL DEFAULT 0.0,
       model_used TEXT,
       metadata_json TEXT NOT NULL DEFAULT '{}',
       created_at TEXT NOT NULL,
       updated_at TEXT NOT NULL
     )"
  , "CREATE INDEX IF NOT EXISTS idx_generated_documents_type
       ON generated_documents (document_type)"
];

/// One stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord
{   pub id: String
  , pub document_type: String
  , pub subject: String
  , pub generated_content: String
  , pub sender_name: Option<String>
  , pub sender_designation: Option<String>
  , pub recipient_name: Option<String>
  , pub recipient_organization: Option<String>
  , pub reference_number: Option<String>
  , pub priority: Option<String>
  , pub docx_path: Option<String>
  , pub pdf_path: Option<String>
  , pub tokens_used: u64
  , pub cost_estimate: f64
  , pub model_used: Option<String>
  , pub metadata: serde_json::Value
  , pub created_at: DateTime<Utc>
  , pub updated_at: DateTime<Utc>
}

/// Row as laid out in `generated_documents`
#[derive(Debug, FromRow)]
struct DocumentRow
{   id: String
  , document_type: String
  , subject: String
  , generated_content: String
  , sender_name: Option<String>
  , sender_designation: Option<String>
  , recipient_name: Option<String>
  , recipient_organization: Option<String>
  , reference_number: Option<String>
  , priority: Option<String>
  , docx_path: Option<String>
  , pdf_path: Option<String>
  , tokens_used: i64
  , cost_estimate: f64
  , model_used: Option<String>
  , metadata_json: Json<serde_json::Value>
  , created_at: DateTime<Utc>
  , updated_at: DateTime<Utc>
}

impl From<DocumentRow> for DocumentRecord
{   fn from(row: DocumentRow) -> Self
    {   DocumentRecord
        {   id: row.id
          , document_type: row.document_type
          , subject: row.subject
          , generated_content: row.generated_content
          , sender_name: row.sender_name
          , sender_designation: row.sender_designation
          , recipient_name: row.recipient_name
          , recipient_organization: row.recipient_organization
          , reference_number: row.reference_number
          , priority: row.priority
          , docx_path: row.docx_path
          , pdf_path: row.pdf_path
          , tokens_used: row.tokens_used.max(0) as u64
          , cost_estimate: row.cost_estimate
          , model_used: row.model_used
          , metadata: row.metadata_json.0
          , created_at: row.created_at
          , updated_at: row.updated_at
        }
    }
}

/// One page of a listing; `total` counts every match, not just this page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentList
{   pub total: usize
  , pub documents: Vec<DocumentRecord>
}

/// Usage totals across all stored documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics
{   pub total_documents: usize
  , pub total_tokens_used: u64
  , pub total_cost_estimate: f64
  , pub documents_by_type: BTreeMap<String, usize>
  , pub timestamp: DateTime<Utc>
}

impl From<sqlx::Error> for Error
{   fn from(e: sqlx::Error) -> Self
    {   error!("Database error: {}", e);
        Error::Storage(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStore
{   pool: SqlitePool
}

impl DocumentStore
{   /// Connect to `database_url` (e.g. `sqlite://./docs.db`), creating
    /// the file and schema when missing
    pub async fn connect(database_url: &str) -> Result<Self, Error>
    {   let options = SqliteConnectOptions::from_str(database_url)
          .map_err(|e| Error::Configuration(format!(
            "DATABASE_URL '{}': {}", database_url, e
          )))?
          .create_if_missing(true);

        let pool = if database_url.contains(":memory:")
        {   // every connection would see its own empty database
            SqlitePoolOptions::new()
              .max_connections(1)
              .idle_timeout(None)
              .max_lifetime(None)
              .connect_with(options)
              .await?
        } else
        {   SqlitePoolOptions::new()
              .max_connections(5)
              .connect_with(options)
              .await?
        };

        let store = DocumentStore { pool };
        store.migrate().await?;
        info!("Connected document store at {}", database_url);
        Ok(store)
    }

    /// Private in-memory database
    pub async fn in_memory() -> Result<Self, Error>
    {   DocumentStore::connect("sqlite::memory:").await
    }

    async fn migrate(&self) -> Result<(), Error>
    {   for statement in SCHEMA
        {   sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert or replace a record by id; returns the id
    pub async fn save(&self, record: DocumentRecord) -> Result<String, Error>
    {   sqlx::query(
          "INSERT OR REPLACE INTO generated_documents (
             id, document_type, subject, generated_content,
             sender_name, sender_designation, recipient_name,
             recipient_organization, reference_number, priority,
             docx_path, pdf_path, tokens_used, cost_estimate,
             model_used, metadata_json, created_at, updated_at
           ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&record.id)
        .bind(&record.document_type)
        .bind(&record.subject)
        .bind(&record.generated_content)
        .bind(&record.sender_name)
        .bind(&record.sender_designation)
        .bind(&record.recipient_name)
        .bind(&record.recipient_organization)
        .bind(&record.reference_number)
        .bind(&record.priority)
        .bind(&record.docx_path)
        .bind(&record.pdf_path)
        .bind(record.tokens_used as i64)
        .bind(record.cost_estimate)
        .bind(&record.model_used)
        .bind(Json(&record.metadata))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        debug!("Saved document {}", record.id);
        Ok(record.id)
    }

    pub async fn get(&self, id: &str) -> Result<Option<DocumentRecord>, Error>
    {   let row = sqlx::query_as::<_, DocumentRow>(
          "SELECT * FROM generated_documents WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DocumentRecord::from))
    }

    /// Newest first, optionally filtered by type, then offset/limit
    pub async fn list(
      &self
    , skip: usize
    , limit: usize
    , document_type: Option<&str>
    ) -> Result<DocumentList, Error>
    {   let (total, rows) = match document_type
        {   Some(kind) => {
              let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM generated_documents WHERE document_type = ?"
              )
              .bind(kind)
              .fetch_one(&self.pool)
              .await?;
              let rows = sqlx::query_as::<_, DocumentRow>(
                "SELECT * FROM generated_documents WHERE document_type = ?
                 ORDER BY created_at DESC LIMIT ? OFFSET ?"
              )
              .bind(kind)
              .bind(clamp(limit))
              .bind(clamp(skip))
              .fetch_all(&self.pool)
              .await?;
              (total, rows)
            }
          , None => {
              let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM generated_documents"
              )
              .fetch_one(&self.pool)
              .await?;
              let rows = sqlx::query_as::<_, DocumentRow>(
                "SELECT * FROM generated_documents
                 ORDER BY created_at DESC LIMIT ? OFFSET ?"
              )
              .bind(clamp(limit))
              .bind(clamp(skip))
              .fetch_all(&self.pool)
              .await?;
              (total, rows)
            }
        };

        Ok(DocumentList
        {   total: total.max(0) as usize
          , documents: rows.into_iter().map(DocumentRecord::from).collect()
        })
    }

    pub async fn stats(&self) -> Result<Statistics, Error>
    {   let (count, tokens, cost): (i64, i64, f64) = sqlx::query_as(
          "SELECT COUNT(*), COALESCE(SUM(tokens_used), 0),
                  COALESCE(SUM(cost_estimate), 0.0)
           FROM generated_documents"
        )
        .fetch_one(&self.pool)
        .await?;

        let by_type: Vec<(String, i64)> = sqlx::query_as(
          "SELECT document_type, COUNT(*) FROM generated_documents
           GROUP BY document_type"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(Statistics
        {   total_documents: count.max(0) as usize
          , total_tokens_used: tokens.max(0) as u64
          , total_cost_estimate: round_to(cost, 4)
          , documents_by_type: by_type
              .into_iter()
              .map(|(kind, n)| (kind, n.max(0) as usize))
              .collect()
          , timestamp: Utc::now()
        })
    }
}

fn clamp(value: usize) -> i64
{   i64::try_from(value).unwrap_or(i64::MAX)
}
