use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use market_domain::role::Role;
use market_domain::validate::ValidationErrors;

/// Api service error variants.
///
/// Error bodies always carry a numeric `status`; validation failures add a
/// per-field `errors` map, authentication/authorization failures a
/// `message_code`, and the review gate its `type` tag.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(ValidationErrors),
    #[error("{0}")]
    Param(&'static str),
    #[error("must provide old password and password")]
    MissingPasswordPair,
    #[error("User is not capable of becoming {}", .0.as_str())]
    RoleNotEligible(Role),
    #[error("{0}")]
    ReviewGate(&'static str),
    #[error("email is already registered")]
    EmailTaken,
    #[error("not authorized")]
    NotAuthorized,
    #[error("old password is not correct")]
    OldPasswordMismatch,
    #[error("wrong email or password")]
    LoginFailed,
    #[error("user is banned")]
    Banned,
    #[error("invalid token")]
    InvalidToken,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::Param(_)
            | Self::MissingPasswordPair
            | Self::RoleNotEligible(_)
            | Self::EmailTaken => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ReviewGate(_) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::OldPasswordMismatch | Self::LoginFailed | Self::Banned | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingPasswordPair => {
                Some("error.param.must_provide_old_password_and_password")
            }
            Self::NotAuthorized => Some("error.authentication.not_authorized"),
            Self::OldPasswordMismatch => {
                Some("error.authentication.old_password_is_not_correct")
            }
            Self::LoginFailed => Some("error.authentication.wrong_email_or_password"),
            Self::Banned => Some("error.authentication.user_banned"),
            Self::InvalidToken => Some("error.authentication.invalid_token"),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }

        let mut body = serde_json::json!({ "status": status.as_u16() });
        match &self {
            Self::Validation(errors) => {
                body["errors"] = serde_json::to_value(errors).unwrap_or_default();
            }
            Self::ReviewGate(message) => {
                body["type"] = "review".into();
                body["message"] = (*message).into();
            }
            _ => match self.message_code() {
                Some(code) => body["message_code"] = code.into(),
                None => body["message"] = self.to_string().into(),
            },
        }

        (status, axum::Json(body)).into_response()
    }
}
