//! Request error type for the upload UI.
//!
//! Handlers return `Result<T, ServerError>`. Problems with the uploaded file
//! become a 422 page carrying the Portuguese user message; everything else
//! is logged in full and answered with a generic 500 page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use super::pages;
use crate::error::ZapError;

const GENERIC_FAILURE: &str = "Erro interno ao processar o arquivo.";

#[derive(Debug, Error)]
pub enum ServerError {
    /// The analysis pipeline failed.
    #[error(transparent)]
    Analysis(#[from] ZapError),

    /// The request itself was malformed (no file field, broken multipart).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upload exceeded the configured body limit.
    #[error("upload too large (limit {limit_mb} MiB)")]
    PayloadTooLarge { limit_mb: usize },

    /// An unclassified internal failure (e.g. a worker task panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Analysis(e) if e.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Analysis(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Text shown on the error page.
    pub fn client_message(&self) -> String {
        match self {
            ServerError::Analysis(e) if e.is_user_error() => e.user_message(),
            ServerError::BadRequest(m) => m.clone(),
            ServerError::PayloadTooLarge { limit_mb } => {
                format!("O arquivo excede o limite de {limit_mb} MB.")
            }
            ServerError::Analysis(_) | ServerError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "upload rejected");
        }

        let message = self.client_message();
        match pages::error_page(status, &message) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!(error = %e, "failed to render error page");
                (status, message).into_response()
            }
        }
    }
}
