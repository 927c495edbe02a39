//! HTTP request handlers for the web server.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::error::ImportErrorKind;
use crate::models::ImportResult;

/// Body of `POST /api/import`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub url: String,
}

/// Import a job posting from a URL.
pub async fn import_job(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected import request body: {}", rejection);
            return result_response(ImportResult::failed(ImportErrorKind::InvalidUrl));
        }
    };

    let result = state.importer.import(&request.url).await;
    result_response(result)
}

fn result_response(result: ImportResult) -> Response {
    let status = if result.is_failed() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(result)).into_response()
}

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}
