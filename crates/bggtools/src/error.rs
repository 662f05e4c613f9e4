use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Error::Upstream { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
            Error::Network(message) => (StatusCode::BAD_GATEWAY, message),
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
