use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Review;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::parse_page;
use crate::state::AppState;
use crate::usecase::review::{ListShopReviewsUseCase, ReviewShopInput, ReviewShopUseCase};
use crate::usecase::shop::GetShopUseCase;

// ── Response ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub user_id: String,
    pub shop_id: String,
    pub rate: i32,
    pub comment: String,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "market_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            user_id: review.user_id.to_string(),
            shop_id: review.shop_id.to_string(),
            rate: review.rate,
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

// ── POST /shops/{id}/reviews ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ReviewShopRequest {
    pub rate: Option<i32>,
    pub comment: Option<String>,
}

pub async fn review_shop(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    Json(body): Json<ReviewShopRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let shop = GetShopUseCase {
        shops: state.shop_repo(),
    }
    .execute(shop_id)
    .await?;

    let usecase = ReviewShopUseCase {
        orders: state.order_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(
            user.id,
            shop.id,
            ReviewShopInput {
                rate: body.rate,
                comment: body.comment,
            },
        )
        .await?;
    Ok(Json(review.into()))
}

// ── GET /shops/{id}/reviews ──────────────────────────────────────────────────

pub async fn list_shop_reviews(
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let page = parse_page(raw_query.as_deref())?;
    let usecase = ListShopReviewsUseCase {
        reviews: state.review_repo(),
    };
    let reviews = usecase.execute(shop_id, page).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}
