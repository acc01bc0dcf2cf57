use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::parse_page;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::admin_user::{
    GetUserUseCase, ListUsersUseCase, SetRolesUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::usecase::credential::{ChangePasswordInput, ChangePasswordUseCase};

fn require_admin(caller: &CurrentUser) -> Result<(), ApiError> {
    if !caller.0.admin {
        return Err(ApiError::NotAuthorized);
    }
    Ok(())
}

// ── GET /admin/users ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

pub async fn list_users(
    caller: CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<UserListResponse>, ApiError> {
    require_admin(&caller)?;
    let page = parse_page(raw_query.as_deref())?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(page).await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

// ── GET /admin/users/{id} ────────────────────────────────────────────────────

pub async fn get_user(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&caller)?;
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(user_id).await?;
    Ok(Json(user.into()))
}

// ── PUT /admin/users/{id} ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub room: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub identity_number: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub banned: Option<bool>,
}

pub async fn update_user(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&caller)?;
    let target = GetUserUseCase {
        users: state.user_repo(),
    }
    .execute(user_id)
    .await?;

    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let updated = usecase
        .execute(
            &target,
            UpdateProfileInput {
                full_name: body.full_name,
                room: body.room,
                phone: body.phone,
                gender: body.gender,
                identity_number: body.identity_number,
                email: body.email,
                password: body.password,
                banned: body.banned,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

// ── POST /admin/users/{id}/roles ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SetRolesRequest {
    /// Kept as raw JSON: a missing or non-array value is a parameter error,
    /// not a deserialization failure.
    pub roles: Option<serde_json::Value>,
}

pub async fn set_roles(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SetRolesRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&caller)?;
    let target = GetUserUseCase {
        users: state.user_repo(),
    }
    .execute(user_id)
    .await?;

    let usecase = SetRolesUseCase {
        users: state.user_repo(),
    };
    let updated = usecase.execute(&target, body.roles.as_ref()).await?;
    Ok(Json(updated.into()))
}

// ── POST /admin/change-password ──────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub password: String,
}

pub async fn change_password(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            &user,
            ChangePasswordInput {
                old_password: body.old_password,
                password: body.password,
            },
        )
        .await?;
    Ok(StatusCode::OK)
}
