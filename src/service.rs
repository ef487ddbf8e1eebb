//! Generation plus rendering plus persistence, and the read-side queries

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};
use serde_json::json;

use crate::client::DraftingClient;
use crate::config::Settings;
use crate::error::Error;
use crate::render::{RenderedFiles, Renderer};
use crate::request::{DocumentRequest, DocumentResponse, HealthCheck, TemplateInfo};
use crate::store::{DocumentList, DocumentRecord, DocumentStore, Statistics};
use crate::templates;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str 
  = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Which rendered file to download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat
{   Pdf
  , Docx
}

impl FileFormat
{   /// "pdf" selects PDF; anything else selects DOCX
    pub fn from_param(value: &str) -> Self
    {   if value == "pdf" { FileFormat::Pdf } else { FileFormat::Docx }
    }

    pub fn mime(&self) -> &'static str
    {   match self
        {   FileFormat::Pdf => PDF_MIME
          , FileFormat::Docx => DOCX_MIME
        }
    }
}

pub struct DocumentService
{   settings: Arc<Settings>
  , client: DraftingClient
  , renderer: Renderer
  , store: DocumentStore
}

impl DocumentService
{   pub fn new(
      settings: Arc<Settings>
    , client: DraftingClient
    , renderer: Renderer
    , store: DocumentStore
    ) -> Self
    {   DocumentService
        {   settings
          , client
          , renderer
          , store
        }
    }

    /// Wire up real backends, renderer and database from settings
    pub async fn from_settings(settings: Arc<Settings>) -> Result<Self, Error>
    {   let client = DraftingClient::new(settings.clone())?;
        let renderer = Renderer::new(&settings)?;
        let store = DocumentStore::connect(&settings.database_url).await?;
        Ok(DocumentService::new(settings, client, renderer, store))
    }

    pub fn settings(&self) -> &Settings
    {   &self.settings
    }

    /// Generate, render both formats, then record. Nothing is written
    /// when generation fails; rendered files are removed again when the
    /// record cannot be saved.
    pub async fn generate_document(
      &self
    , request: DocumentRequest
    ) -> Result<DocumentResponse, Error>
    {   let result = self.client.generate(&request).await?;
        let id = uuid::Uuid::new_v4().to_string();
        let document_type = request.document_type.as_str().to_string();

        let files = self.render(&result.content, &document_type, &id).await;

        let metadata = json!({
          "attachments": request.attachments,
          "additional_context": request.additional_context,
          "meeting_date": request.meeting_date,
          "meeting_venue": request.meeting_venue,
          "attendees": request.attendees,
          "agenda_items": request.agenda_items,
        });
        let now = Utc::now();
        let record = DocumentRecord
        {   id: id.clone()
          , document_type: document_type.clone()
          , subject: request.subject
          , generated_content: result.content.clone()
          , sender_name: Some(request.sender_name)
          , sender_designation: Some(request.sender_designation)
          , recipient_name: request.recipient_name
          , recipient_organization: request.recipient_organization
          , reference_number: request.reference_number
          , priority: Some(request.priority.as_str().to_string())
          , docx_path: files.docx_path.clone()
          , pdf_path: files.pdf_path.clone()
          , tokens_used: result.tokens_used
          , cost_estimate: result.cost_estimate
          , model_used: Some(result.model_used.clone())
          , metadata: metadata.clone()
          , created_at: now
          , updated_at: now
        };
        if let Err(e) = self.store.save(record).await
        {   error!("Saving document {} failed: {}", id, e);
            remove_rendered(&files).await;
            return Err(e);
        }
        info!(
          "Generated {} {} with {} ({} tokens)",
          document_type, id, result.model_used, result.tokens_used
        );

        Ok(DocumentResponse
        {   id
          , document_type
          , generated_content: result.content
          , file_path: files.docx_path.clone()
          , pdf_path: files.pdf_path
          , docx_path: files.docx_path
          , metadata
          , created_at: now
          , tokens_used: result.tokens_used
          , cost_estimate: result.cost_estimate
        })
    }

    /// Rendering failures are logged and leave the paths empty
    async fn render(
      &self
    , text: &str
    , document_type: &str
    , id: &str
    ) -> RenderedFiles
    {   let renderer = self.renderer.clone();
        let (text, document_type, id) 
          = (text.to_string(), document_type.to_string(), id.to_string());
        let outcome = tokio::task::spawn_blocking(move || {
          renderer.render(&text, &document_type, &id)
        }).await;
        match outcome
        {   Ok(Ok(files)) => files
          , Ok(Err(e)) => {
              error!("Rendering failed: {}", e);
              RenderedFiles::default()
            }
          , Err(e) => {
              error!("Rendering task failed: {}", e);
              RenderedFiles::default()
            }
        }
    }

    pub async fn get_document(&self, id: &str) -> Result<DocumentRecord, Error>
    {   self.store.get(id).await?.ok_or_else(|| {
          Error::NotFound("Document".to_string())
        })
    }

    pub async fn list_documents(
      &self
    , skip: usize
    , limit: usize
    , document_type: Option<&str>
    ) -> Result<DocumentList, Error>
    {   self.store.list(skip, limit, document_type).await
    }

    pub async fn statistics(&self) -> Result<Statistics, Error>
    {   self.store.stats().await
    }

    pub fn templates(&self) -> Vec<TemplateInfo>
    {   templates::available_templates()
    }

    pub fn health(&self) -> HealthCheck
    {   HealthCheck
        {   status: "healthy".to_string()
          , version: self.settings.app_version.clone()
          , timestamp: Utc::now()
          , ai_service: self.settings.primary_llm.to_string()
          , database: "connected".to_string()
        }
    }

    /// Path of a rendered file, checked to exist on disk
    pub async fn download_path(
      &self
    , id: &str
    , format: FileFormat
    ) -> Result<PathBuf, Error>
    {   let record = self.get_document(id).await?;
        let path = match format
        {   FileFormat::Pdf => record.pdf_path
          , FileFormat::Docx => record.docx_path
        };
        let path = path
          .map(PathBuf::from)
          .ok_or_else(|| Error::NotFound("File".to_string()))?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false)
        {   return Err(Error::NotFound("File".to_string()));
        }
        Ok(path)
    }
}

async fn remove_rendered(files: &RenderedFiles)
{   for path in [&files.docx_path, &files.pdf_path].into_iter().flatten()
    {   if let Err(e) = tokio::fs::remove_file(path).await
        {   warn!("Could not remove {}: {}", path, e);
        }
    }
}
