//! Upload UI handlers.

use std::io::Cursor;
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::AppState;
use super::error::ServerError;
use super::pages;
use crate::config::mib_to_bytes;
use crate::metrics::UploadOutcome;
use crate::report::output::render_html;

pub(super) fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze_upload))
        .route("/health", get(health))
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    Ok(Html(pages::index_page(state.max_upload_mb)?))
}

/// Heartbeat: `{"status": "ok", "version": "..."}`.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Accepts the multipart field `file` (a WhatsApp export zip) and answers
/// with the rendered HTML report.
async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, ServerError> {
    let limit_mb = state.max_upload_mb;
    let bytes = read_file_field(&mut multipart, limit_mb).await?;
    debug!(bytes = bytes.len(), "received upload");

    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        let result = worker_state
            .analyzer
            .analyze_archive(Cursor::new(bytes))
            .and_then(|analysis| {
                let html = render_html(&analysis.report)?;
                Ok((analysis.report.summary.messages, html))
            });
        worker_state.recorder.record_upload(UploadOutcome::of(&result));
        result
    })
    .await
    .map_err(|e| ServerError::Internal(format!("analysis task failed: {e}")))?;

    let (messages, html) = result?;
    info!(messages, "upload analyzed");
    Ok(Html(html))
}

async fn read_file_field(
    multipart: &mut Multipart,
    limit_mb: usize,
) -> Result<Vec<u8>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, limit_mb))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(&e, limit_mb))?;
        if data.len() > mib_to_bytes(limit_mb) {
            return Err(ServerError::PayloadTooLarge { limit_mb });
        }
        return Ok(data.to_vec());
    }

    Err(ServerError::BadRequest(
        "Envie o arquivo .zip da conversa no campo 'file'.".to_string(),
    ))
}

fn multipart_error(e: &MultipartError, limit_mb: usize) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge { limit_mb }
    } else {
        ServerError::BadRequest(format!("Falha ao ler o envio: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::metrics::NoopRecorder;
    use crate::report::Analyzer;
    use crate::server::build;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use std::io::Write;
    use tower::ServiceExt;

    const BOUNDARY: &str = "zapmetrics-test-boundary";

    fn app(max_upload_mb: usize) -> Router {
        let state = AppState::new(Analyzer::default(), Arc::new(NoopRecorder), max_upload_mb);
        build(Arc::new(state))
    }

    fn zip_with(name: &str, content: &[u8]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn multipart_request(field: &str, payload: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"chat.zip\"\r\nContent-Type: application/zip\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(50)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"ok\""));
    }

    #[tokio::test]
    async fn index_serves_form() {
        let response = app(50)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("multipart/form-data"));
    }

    #[tokio::test]
    async fn upload_renders_report() {
        let zip = zip_with(
            "WhatsApp Chat.txt",
            "12/01/2024, 9:00 AM - Alice: Bom dia 😀\n12/01/2024, 9:05 AM - Bob: Hi there".as_bytes(),
        );
        let response = app(50).oneshot(multipart_request("file", &zip)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Participante Alice"));
        assert!(html.contains("Participante Bob"));
    }

    #[tokio::test]
    async fn upload_without_txt_is_422() {
        let zip = zip_with("photo.jpg", b"\xff\xd8\xff");
        let response = app(50).oneshot(multipart_request("file", &zip)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Nenhum arquivo .txt encontrado no ZIP"));
    }

    #[tokio::test]
    async fn upload_not_zip_is_422() {
        let response = app(50)
            .oneshot(multipart_request("file", b"definitely not a zip"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn upload_without_messages_is_422() {
        let zip = zip_with("chat.txt", b"nothing that looks like a header");
        let response = app(50).oneshot(multipart_request("file", &zip)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Nenhuma mensagem encontrada."));
    }

    #[tokio::test]
    async fn upload_with_oversized_chat_is_422() {
        let config = AnalyzerConfig::new().with_max_chat_bytes(64);
        let state = AppState::new(Analyzer::new(config), Arc::new(NoopRecorder), 50);
        let zip = zip_with("chat.txt", "1/1/24, 9:00 AM - Ana: oi\n".repeat(20).as_bytes());
        let response = build(Arc::new(state))
            .oneshot(multipart_request("file", &zip))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("excede o limite"));
    }

    #[tokio::test]
    async fn huge_upload_limit_still_builds_router() {
        let zip = zip_with("chat.txt", b"1/1/24, 9:00 AM - Ana: oi");
        let response = app(usize::MAX)
            .oneshot(multipart_request("file", &zip))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_file_field_is_400() {
        let response = app(50)
            .oneshot(multipart_request("attachment", b"x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let payload = vec![b'x'; 2 * 1024 * 1024];
        let response = app(1).oneshot(multipart_request("file", &payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
