//! Access-token extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;

use market_auth_types::token::validate_access_token;

use crate::domain::repository::UserRepository as _;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// The authenticated caller, loaded from the `x-access-token` header.
///
/// Rejects with 401 when the header is absent, the token fails validation,
/// the user is gone, or the token was issued before the user's
/// `accept_token_after` watermark (all sessions signed out).
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Whether a validated token predates the user's session-invalidation
/// watermark and must be rejected.
pub fn token_is_stale(info: &market_auth_types::token::TokenInfo, user: &User) -> bool {
    (info.issued_at as i64) < user.accept_token_after.timestamp()
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = parts
            .headers
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let state = state.clone();

        async move {
            let token = token.ok_or(ApiError::InvalidToken)?;
            let info = validate_access_token(&token, &state.jwt_secret)
                .map_err(|_| ApiError::InvalidToken)?;
            let user = state
                .user_repo()
                .find_by_id(info.user_id)
                .await?
                .ok_or(ApiError::InvalidToken)?;
            if token_is_stale(&info, &user) {
                return Err(ApiError::InvalidToken);
            }
            Ok(CurrentUser(user))
        }
    }
}
