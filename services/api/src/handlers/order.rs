use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Order;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::parse_page;
use crate::state::AppState;
use crate::usecase::order::{CreateOrderInput, CreateOrderUseCase, ListMyOrdersUseCase};
use crate::usecase::shop::GetShopUseCase;

// ── Response ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub shop_id: String,
    pub note: Option<String>,
    pub status: String,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            shop_id: order.shop_id.to_string(),
            note: order.note,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// ── POST /shops/{id}/orders ──────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CreateOrderRequest {
    pub note: Option<String>,
}

pub async fn create_order(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let shop = GetShopUseCase {
        shops: state.shop_repo(),
    }
    .execute(shop_id)
    .await?;

    let usecase = CreateOrderUseCase {
        orders: state.order_repo(),
        realtime: state.realtime_client(),
    };
    let order = usecase
        .execute(&user, &shop, CreateOrderInput { note: body.note })
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

// ── GET /users/me/orders ─────────────────────────────────────────────────────

pub async fn list_my_orders(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let page = parse_page(raw_query.as_deref())?;
    let usecase = ListMyOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = usecase.execute(user.id, page).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
