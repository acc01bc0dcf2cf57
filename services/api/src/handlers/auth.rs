use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase};

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token expiry, seconds since UNIX epoch.
    pub expires_at: u64,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        token: output.token,
        expires_at: output.expires_at,
        user: output.user.into(),
    }))
}
