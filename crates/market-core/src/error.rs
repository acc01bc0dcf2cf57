use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Common application error variants shared by services without a richer
/// error surface of their own.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
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
