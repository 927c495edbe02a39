//! HTTP endpoint for job imports.
//!
//! - `POST /api/import` with `{"url": "..."}` returns the import result,
//!   200 for success/partial and 400 for failed
//! - `GET /api/health` returns `ok`

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;

use crate::config::Settings;
use crate::services::JobImporter;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub importer: JobImporter,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            importer: JobImporter::new(settings)?,
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn setup_test_app() -> axum::Router {
        let state = AppState::new(&Settings::default()).unwrap();
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = setup_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_import_invalid_url_is_bad_request() {
        let response = setup_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/import")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"url": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "Invalid URL");
        assert_eq!(json["fields_extracted"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_import_malformed_body_is_bad_request() {
        let response = setup_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/import")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "failed");
    }
}
