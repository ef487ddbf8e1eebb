//! HTTP routes

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::request::{DocumentRequest, DocumentResponse, HealthCheck, TemplateInfo};
use crate::service::{DocumentService, FileFormat};
use crate::store::{DocumentList, DocumentRecord, Statistics};

pub type AppState = Arc<DocumentService>;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody
{   pub detail: String
}

/// Error as seen by HTTP clients
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError
{   fn from(e: Error) -> Self
    {   ApiError(e)
    }
}

impl IntoResponse for ApiError
{   fn into_response(self) -> Response
    {   let (status, detail) = match &self.0
        {   Error::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string())
          , Error::GenerationFailed { .. } => (
              StatusCode::INTERNAL_SERVER_ERROR
            , format!("Error generating document: {}", self.0)
            )
          , other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        };
        if status.is_server_error()
        {   error!("Request failed: {}", detail);
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams
{   #[serde(default)]
    pub skip: usize
  , #[serde(default = "default_limit")]
    pub limit: usize
  , #[serde(default)]
    pub document_type: Option<String>
}

fn default_limit() -> usize
{   50
}

pub fn router(service: AppState) -> Router
{   Router::new()
      .route("/health", get(health))
      .route("/templates", get(list_templates))
      .route("/generate", post(generate))
      .route("/documents", get(list_documents))
      .route("/documents/:id", get(get_document))
      .route("/download/:id/:file_type", get(download))
      .route("/stats", get(statistics))
      .with_state(service)
}

/// Bind and serve until the process exits
pub async fn serve(service: AppState) -> Result<(), Error>
{   let address = service.settings().bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&address).await
      .map_err(|e| Error::Configuration(format!(
        "cannot bind {}: {}", address, e
      )))?;
    info!(
      "{} v{} listening on {}",
      service.settings().app_name,
      service.settings().app_version,
      address
    );
    axum::serve(listener, router(service)).await
      .map_err(|e| Error::Other(e.to_string()))
}

async fn health(State(service): State<AppState>) -> Json<HealthCheck>
{   Json(service.health())
}

async fn list_templates(
  State(service): State<AppState>
) -> Json<Vec<TemplateInfo>>
{   Json(service.templates())
}

async fn generate(
  State(service): State<AppState>
, Json(request): Json<DocumentRequest>
) -> Result<Json<DocumentResponse>, ApiError>
{   Ok(Json(service.generate_document(request).await?))
}

async fn list_documents(
  State(service): State<AppState>
, Query(params): Query<ListParams>
) -> Result<Json<DocumentList>, ApiError>
{   let document_type = params.document_type
      .as_deref()
      .filter(|t| !t.is_empty());
    Ok(Json(
      service.list_documents(params.skip, params.limit, document_type).await?
    ))
}

async fn get_document(
  State(service): State<AppState>
, Path(id): Path<String>
) -> Result<Json<DocumentRecord>, ApiError>
{   Ok(Json(service.get_document(&id).await?))
}

async fn download(
  State(service): State<AppState>
, Path((id, file_type)): Path<(String, String)>
) -> Result<Response, ApiError>
{   let format = FileFormat::from_param(&file_type);
    let path = service.download_path(&id, format).await?;
    let bytes = tokio::fs::read(&path).await
      .map_err(|_| Error::NotFound("File".to_string()))?;
    let filename = path.file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| format!("{}.{}", id, file_type));

    Ok((
      [
        (header::CONTENT_TYPE, format.mime().to_string())
      , (
          header::CONTENT_DISPOSITION
        , format!("attachment; filename=\"{}\"", filename)
        )
      ]
    , bytes
    ).into_response())
}

async fn statistics(
  State(service): State<AppState>
) -> Result<Json<Statistics>, ApiError>
{   Ok(Json(service.statistics().await?))
}
