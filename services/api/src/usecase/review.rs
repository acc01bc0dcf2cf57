use chrono::Utc;
use uuid::Uuid;

use market_domain::pagination::PageRequest;

use crate::domain::repository::{OrderRepository, ReviewRepository};
use crate::domain::types::Review;
use crate::error::ApiError;

pub const ORDER_REQUIRED: &str =
    "You must order at this shop at least one time before review";
pub const RATE_AND_COMMENT_REQUIRED: &str = "Must provide rate and comment when review shop";

// ── ReviewShop ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ReviewShopInput {
    pub rate: Option<i32>,
    pub comment: Option<String>,
}

/// Order-gated review upsert.
///
/// Per `(user, shop)` pair the state machine is `NoReview -> Reviewed`;
/// further reviews mutate the existing row in place, never duplicating it.
pub struct ReviewShopUseCase<O: OrderRepository, R: ReviewRepository> {
    pub orders: O,
    pub reviews: R,
}

impl<O: OrderRepository, R: ReviewRepository> ReviewShopUseCase<O, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        shop_id: Uuid,
        input: ReviewShopInput,
    ) -> Result<Review, ApiError> {
        if !self.orders.exists_for(user_id, shop_id).await? {
            return Err(ApiError::ReviewGate(ORDER_REQUIRED));
        }

        let (rate, comment) = match (input.rate, input.comment) {
            (Some(rate), Some(comment)) => (rate, comment),
            _ => return Err(ApiError::ReviewGate(RATE_AND_COMMENT_REQUIRED)),
        };

        match self.reviews.find_by_user_shop(user_id, shop_id).await? {
            Some(existing) => {
                self.reviews
                    .update_rate_comment(existing.id, rate, &comment)
                    .await
            }
            None => {
                let now = Utc::now();
                let review = Review {
                    id: Uuid::now_v7(),
                    user_id,
                    shop_id,
                    rate,
                    comment,
                    created_at: now,
                    updated_at: now,
                };
                self.reviews.insert(&review).await?;
                Ok(review)
            }
        }
    }
}

// ── ListShopReviews ──────────────────────────────────────────────────────────

pub struct ListShopReviewsUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ListShopReviewsUseCase<R> {
    pub async fn execute(
        &self,
        shop_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiError> {
        self.reviews.list_by_shop(shop_id, page.clamped()).await
    }
}
