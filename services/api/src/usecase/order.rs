use chrono::Utc;
use uuid::Uuid;

use market_domain::pagination::PageRequest;

use crate::domain::repository::{OrderRepository, RealtimePort};
use crate::domain::types::{Order, Shop, User};
use crate::error::ApiError;

// ── CreateOrder ──────────────────────────────────────────────────────────────

pub struct CreateOrderInput {
    pub note: Option<String>,
}

pub struct CreateOrderUseCase<O, N>
where
    O: OrderRepository,
    N: RealtimePort + Clone + Send + 'static,
{
    pub orders: O,
    pub realtime: N,
}

impl<O, N> CreateOrderUseCase<O, N>
where
    O: OrderRepository,
    N: RealtimePort + Clone + Send + 'static,
{
    pub async fn execute(
        &self,
        user: &User,
        shop: &Shop,
        input: CreateOrderInput,
    ) -> Result<Order, ApiError> {
        if shop.owner_id == user.id {
            return Err(ApiError::Param("You cannot order at your own shop"));
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::now_v7(),
            user_id: user.id,
            shop_id: shop.id,
            note: input.note,
            status: "pending".into(),
            created_at: now,
            updated_at: now,
        };
        self.orders.create(&order).await?;

        // Notify the shop owner on their private channel; delivery is
        // best-effort and never blocks the order response.
        let realtime = self.realtime.clone();
        let owner_id = shop.owner_id;
        let payload = serde_json::json!({
            "order_id": order.id,
            "shop_id": order.shop_id,
            "user_id": order.user_id,
        });
        tokio::spawn(async move {
            if let Err(e) = realtime.publish_user(owner_id, "order.created", payload).await {
                tracing::error!(error = %e, %owner_id, "order notification failed");
            }
        });

        Ok(order)
    }
}

// ── ListMyOrders ─────────────────────────────────────────────────────────────

pub struct ListMyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListMyOrdersUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, ApiError> {
        self.orders.list_by_user(user_id, page.clamped()).await
    }
}
