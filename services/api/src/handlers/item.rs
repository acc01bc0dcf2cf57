use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use market_domain::image::ImageFile;

use crate::domain::types::Item;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::parse_page;
use crate::state::AppState;
use crate::usecase::item::{
    CreateItemInput, CreateItemUseCase, DestroyItemUseCase, ListShopItemsUseCase,
    UpdateItemInput, UpdateItemUseCase,
};
use crate::usecase::shop::GetShopUseCase;

// ── Response ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub shop_id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: Option<i32>,
    pub sort: i32,
    pub status: i32,
    pub image_file: Option<ImageFile>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_string(),
            shop_id: item.shop_id.to_string(),
            category_id: item.category_id.to_string(),
            name: item.name,
            description: item.description,
            price: item.price,
            quantity: item.quantity,
            sort: item.sort,
            status: item.status.as_i32(),
            image_file: item.image_file,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// ── POST /shops/{id}/items ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateItemRequest {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: Option<i32>,
    pub sort: Option<i32>,
    pub status: Option<i32>,
}

pub async fn create_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let shop = GetShopUseCase {
        shops: state.shop_repo(),
    }
    .execute(shop_id)
    .await?;

    let usecase = CreateItemUseCase {
        items: state.item_repo(),
        categories: state.category_repo(),
        search: state.search_client(),
    };
    let item = usecase
        .execute(
            &user,
            &shop,
            CreateItemInput {
                category_id: body.category_id,
                name: body.name,
                description: body.description,
                price: body.price,
                quantity: body.quantity,
                sort: body.sort,
                status: body.status,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

// ── GET /shops/{id}/items ────────────────────────────────────────────────────

pub async fn list_shop_items(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let page = parse_page(raw_query.as_deref())?;
    let usecase = ListShopItemsUseCase {
        items: state.item_repo(),
    };
    let items = usecase.execute(shop_id, page).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

// ── PUT /items/{id} ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
    pub sort: Option<i32>,
    pub status: Option<i32>,
    pub image_file: Option<ImageFile>,
}

async fn load_item_and_shop(
    state: &AppState,
    item_id: Uuid,
) -> Result<(Item, crate::domain::types::Shop), ApiError> {
    use crate::domain::repository::ItemRepository as _;

    let item = state
        .item_repo()
        .find_by_id(item_id)
        .await?
        .ok_or(ApiError::NotFound("item"))?;
    let shop = GetShopUseCase {
        shops: state.shop_repo(),
    }
    .execute(item.shop_id)
    .await?;
    Ok((item, shop))
}

pub async fn update_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let (item, shop) = load_item_and_shop(&state, item_id).await?;

    let usecase = UpdateItemUseCase {
        items: state.item_repo(),
        search: state.search_client(),
    };
    let updated = usecase
        .execute(
            &user,
            &shop,
            item,
            UpdateItemInput {
                name: body.name,
                description: body.description,
                price: body.price,
                quantity: body.quantity,
                sort: body.sort,
                status: body.status,
                image_file: body.image_file,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

// ── DELETE /items/{id} ───────────────────────────────────────────────────────

pub async fn destroy_item(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let (item, shop) = load_item_and_shop(&state, item_id).await?;

    let usecase = DestroyItemUseCase {
        items: state.item_repo(),
        search: state.search_client(),
        images: state.image_client(),
    };
    usecase.execute(&user, &shop, item).await?;
    Ok(StatusCode::NO_CONTENT)
}
