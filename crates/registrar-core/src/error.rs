use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body returned by every Registrar endpoint.
///
/// `details` carries structured extras (field errors, identity-provider
/// reasons) and is omitted when empty.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    #[serde(flatten)]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Typed service errors implement this to get a uniform HTTP rendering.
pub trait ServiceError: std::fmt::Display {
    fn status(&self) -> StatusCode;
    fn kind(&self) -> &'static str;

    fn details(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        None
    }
}

/// Render a [`ServiceError`] as `(status, Json(ErrorBody))`.
pub fn error_response<E: ServiceError + std::fmt::Debug>(error: &E) -> Response {
    let status = error.status();
    // Log 5xx only; tower-http TraceLayer already records method/uri/status for all
    // requests and 4xx are expected client errors.
    if status.is_server_error() {
        tracing::error!(error = ?error, kind = error.kind(), "internal error");
    }
    let body = ErrorBody {
        kind: error.kind(),
        message: error.to_string(),
        details: error.details(),
    };
    (status, axum::Json(body)).into_response()
}
