use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Realtime gateway error variants.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("invalid token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error("invalid scope")]
    InvalidScope,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for RealtimeError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidScope => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "status": status.as_u16(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
