//! Order-gated review flow, driven through the order and review usecases
//! together.

use uuid::Uuid;

use market_api::domain::repository::RealtimePort;
use market_api::error::ApiError;
use market_api::usecase::order::{CreateOrderInput, CreateOrderUseCase};
use market_api::usecase::review::{
    ORDER_REQUIRED, RATE_AND_COMMENT_REQUIRED, ReviewShopInput, ReviewShopUseCase,
};
use market_domain::pagination::PageRequest;

use crate::helpers::{InMemoryOrderRepo, InMemoryReviewRepo, create_user, create_user_with_role};

#[derive(Clone, Default)]
struct NullRealtime;

impl RealtimePort for NullRealtime {
    async fn publish_user(
        &self,
        _user_id: Uuid,
        _event: &str,
        _payload: serde_json::Value,
    ) -> Result<(), ApiError> {
        Ok(())
    }
    async fn publish_public(
        &self,
        _event: &str,
        _payload: serde_json::Value,
    ) -> Result<(), ApiError> {
        Ok(())
    }
}

fn shop_owned_by(owner_id: Uuid) -> market_api::domain::types::Shop {
    let now = chrono::Utc::now();
    market_api::domain::types::Shop {
        id: Uuid::now_v7(),
        owner_id,
        name: "Banh Mi Corner".into(),
        description: None,
        address: None,
        opening_status: true,
        avatar_file: None,
        cover_file: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn ordering_then_reviewing_succeeds_and_upserts() {
    let owner = create_user_with_role("12345678", "seller");
    let buyer = create_user("12345678");
    let shop = shop_owned_by(owner.id);

    let orders = InMemoryOrderRepo::default();
    let reviews = InMemoryReviewRepo::default();

    // The buyer orders once; that order satisfies the review gate.
    CreateOrderUseCase {
        orders: orders.clone(),
        realtime: NullRealtime,
    }
    .execute(&buyer, &shop, CreateOrderInput { note: None })
    .await
    .unwrap();

    let review_uc = ReviewShopUseCase {
        orders: orders.clone(),
        reviews: reviews.clone(),
    };

    let first = review_uc
        .execute(
            buyer.id,
            shop.id,
            ReviewShopInput {
                rate: Some(3),
                comment: Some("xxx".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.rate, 3);
    assert_eq!(first.comment, "xxx");

    let second = review_uc
        .execute(
            buyer.id,
            shop.id,
            ReviewShopInput {
                rate: Some(1),
                comment: Some("yyy".into()),
            },
        )
        .await
        .unwrap();

    // Same row, updated in place.
    assert_eq!(second.id, first.id);
    assert_eq!(second.rate, 1);
    assert_eq!(second.comment, "yyy");
    assert_eq!(reviews.all().len(), 1);
}

#[tokio::test]
async fn reviewing_without_order_is_gated() {
    let buyer = create_user("12345678");
    let shop = shop_owned_by(Uuid::now_v7());
    let reviews = InMemoryReviewRepo::default();

    let review_uc = ReviewShopUseCase {
        orders: InMemoryOrderRepo::default(),
        reviews: reviews.clone(),
    };
    let result = review_uc
        .execute(
            buyer.id,
            shop.id,
            ReviewShopInput {
                rate: Some(3),
                comment: Some("xxx".into()),
            },
        )
        .await;

    match result {
        Err(ApiError::ReviewGate(message)) => assert_eq!(message, ORDER_REQUIRED),
        other => panic!("expected review gate error, got {other:?}"),
    }
    assert!(reviews.all().is_empty());
}

#[tokio::test]
async fn comment_only_follow_up_leaves_review_untouched() {
    let owner = create_user_with_role("12345678", "seller");
    let buyer = create_user("12345678");
    let shop = shop_owned_by(owner.id);

    let orders = InMemoryOrderRepo::default();
    let reviews = InMemoryReviewRepo::default();
    CreateOrderUseCase {
        orders: orders.clone(),
        realtime: NullRealtime,
    }
    .execute(&buyer, &shop, CreateOrderInput { note: None })
    .await
    .unwrap();

    let review_uc = ReviewShopUseCase {
        orders,
        reviews: reviews.clone(),
    };
    review_uc
        .execute(
            buyer.id,
            shop.id,
            ReviewShopInput {
                rate: Some(3),
                comment: Some("xxx".into()),
            },
        )
        .await
        .unwrap();

    let result = review_uc
        .execute(
            buyer.id,
            shop.id,
            ReviewShopInput {
                rate: None,
                comment: Some("yyy".into()),
            },
        )
        .await;
    match result {
        Err(ApiError::ReviewGate(message)) => {
            assert_eq!(message, RATE_AND_COMMENT_REQUIRED);
        }
        other => panic!("expected review gate error, got {other:?}"),
    }

    let stored = reviews.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].rate, 3);
    assert_eq!(stored[0].comment, "xxx");
}

#[tokio::test]
async fn orders_are_visible_to_their_owner() {
    let owner = create_user_with_role("12345678", "seller");
    let buyer = create_user("12345678");
    let shop = shop_owned_by(owner.id);

    let orders = InMemoryOrderRepo::default();
    CreateOrderUseCase {
        orders: orders.clone(),
        realtime: NullRealtime,
    }
    .execute(
        &buyer,
        &shop,
        CreateOrderInput {
            note: Some("extra chili".into()),
        },
    )
    .await
    .unwrap();

    use market_api::domain::repository::OrderRepository as _;
    let listed = orders
        .list_by_user(buyer.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].note.as_deref(), Some("extra chili"));
}
