use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::types::User;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::auth::{RegisterInput, RegisterUseCase};

// ── Public projection ────────────────────────────────────────────────────────

/// The single public representation of a user.
///
/// `password_hash` and `accept_token_after` are structurally absent; every
/// user-bearing response goes through this projection.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub room: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub identity_number: Option<String>,
    pub banned: bool,
    pub roles: Vec<&'static str>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let roles = user
            .role_flags()
            .roles()
            .into_iter()
            .map(|r| r.as_str())
            .collect();
        Self {
            id: user.id.to_string(),
            email: user.email,
            full_name: user.full_name,
            room: user.room,
            phone: user.phone,
            gender: user.gender,
            identity_number: user.identity_number,
            banned: user.banned,
            roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}
