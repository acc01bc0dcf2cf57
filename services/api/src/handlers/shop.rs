use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use market_domain::image::ImageFile;

use crate::domain::types::Shop;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::shop::{
    CreateShopInput, CreateShopUseCase, DestroyShopUseCase, GetShopUseCase, UpdateShopInput,
    UpdateShopUseCase,
};

// ── Response ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ShopResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub opening_status: bool,
    pub avatar_file: Option<ImageFile>,
    pub cover_file: Option<ImageFile>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Shop> for ShopResponse {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.id.to_string(),
            owner_id: shop.owner_id.to_string(),
            name: shop.name,
            description: shop.description,
            address: shop.address,
            opening_status: shop.opening_status,
            avatar_file: shop.avatar_file,
            cover_file: shop.cover_file,
            created_at: shop.created_at,
            updated_at: shop.updated_at,
        }
    }
}

// ── POST /shops ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

pub async fn create_shop(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateShopRequest>,
) -> Result<(StatusCode, Json<ShopResponse>), ApiError> {
    let usecase = CreateShopUseCase {
        shops: state.shop_repo(),
        search: state.search_client(),
    };
    let shop = usecase
        .execute(
            &user,
            CreateShopInput {
                name: body.name,
                description: body.description,
                address: body.address,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(shop.into())))
}

// ── GET /shops/{id} ──────────────────────────────────────────────────────────

pub async fn get_shop(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
) -> Result<Json<ShopResponse>, ApiError> {
    let usecase = GetShopUseCase {
        shops: state.shop_repo(),
    };
    let shop = usecase.execute(shop_id).await?;
    Ok(Json(shop.into()))
}

// ── PUT /shops/{id} ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub opening_status: Option<bool>,
    pub avatar_file: Option<ImageFile>,
    pub cover_file: Option<ImageFile>,
}

pub async fn update_shop(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    Json(body): Json<UpdateShopRequest>,
) -> Result<Json<ShopResponse>, ApiError> {
    let shop = GetShopUseCase {
        shops: state.shop_repo(),
    }
    .execute(shop_id)
    .await?;

    let usecase = UpdateShopUseCase {
        shops: state.shop_repo(),
        search: state.search_client(),
    };
    let updated = usecase
        .execute(
            &user,
            shop,
            UpdateShopInput {
                name: body.name,
                description: body.description,
                address: body.address,
                opening_status: body.opening_status,
                avatar_file: body.avatar_file,
                cover_file: body.cover_file,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

// ── DELETE /shops/{id} ───────────────────────────────────────────────────────

pub async fn destroy_shop(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let shop = GetShopUseCase {
        shops: state.shop_repo(),
    }
    .execute(shop_id)
    .await?;

    let usecase = DestroyShopUseCase {
        shops: state.shop_repo(),
        search: state.search_client(),
        images: state.image_client(),
    };
    usecase.execute(&user, shop).await?;
    Ok(StatusCode::NO_CONTENT)
}
