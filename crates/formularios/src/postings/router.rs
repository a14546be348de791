use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::PostingId;
use super::export::{export_file_name, ExportError};
use super::repository::{PostingRepository, RepositoryError};
use super::service::{PostingService, PostingServiceError};

/// Body of a bulk document download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub ids: Vec<PostingId>,
}

/// Router builder exposing posting listings and the bulk document download.
pub fn posting_router<R>(service: Arc<PostingService<R>>) -> Router
where
    R: PostingRepository + 'static,
{
    Router::new()
        .route("/api/v1/formularios", get(list_handler::<R>))
        .route(
            "/api/v1/formularios/descargar",
            post(download_handler::<R>),
        )
        .route("/api/v1/formularios/:posting_id", get(detail_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<PostingService<R>>>) -> Response
where
    R: PostingRepository + 'static,
{
    match service.list().await {
        Ok(postings) => (StatusCode::OK, axum::Json(postings)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<PostingService<R>>>,
    Path(posting_id): Path<i64>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.get(PostingId(posting_id)).await {
        Ok(posting) => (StatusCode::OK, axum::Json(posting)).into_response(),
        Err(PostingServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("posting {posting_id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn download_handler<R>(
    State(service): State<Arc<PostingService<R>>>,
    axum::Json(request): axum::Json<DownloadRequest>,
) -> Response
where
    R: PostingRepository + 'static,
{
    match service.export_documents(&request.ids).await {
        Ok(export) => {
            let file_name = export_file_name(Local::now().date_naive());
            let headers = [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ];
            (StatusCode::OK, headers, export.bytes).into_response()
        }
        Err(PostingServiceError::Export(ExportError::NoDocumentsFound)) => {
            let payload = json!({
                "message": ExportError::NoDocumentsFound.to_string(),
                "error": "No se encontraron documentos",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "document export failed");
            let payload = json!({
                "message": "Error al generar el archivo de descarga",
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn internal_error(err: PostingServiceError) -> Response {
    error!(error = %err, "posting request failed");
    let payload = json!({
        "error": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
