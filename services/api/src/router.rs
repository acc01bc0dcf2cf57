use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use market_core::health::{healthz, readyz};
use market_core::middleware::request_id_layer;

use crate::handlers::{
    admin_user::{change_password, get_user, list_users, set_roles, update_user},
    auth::login,
    category::list_categories,
    item::{create_item, destroy_item, list_shop_items, update_item},
    order::{create_order, list_my_orders},
    review::{list_shop_reviews, review_shop},
    shop::{create_shop, destroy_shop, get_shop, update_shop},
    user::{get_me, register},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/login", post(login))
        .route("/users", post(register))
        .route("/users/me", get(get_me))
        .route("/users/me/orders", get(list_my_orders))
        // Admin
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", get(get_user))
        .route("/admin/users/{id}", put(update_user))
        .route("/admin/users/{id}/roles", post(set_roles))
        .route("/admin/change-password", post(change_password))
        // Categories
        .route("/categories", get(list_categories))
        // Shops
        .route("/shops", post(create_shop))
        .route("/shops/{id}", get(get_shop))
        .route("/shops/{id}", put(update_shop))
        .route("/shops/{id}", delete(destroy_shop))
        // Items
        .route("/shops/{id}/items", get(list_shop_items))
        .route("/shops/{id}/items", post(create_item))
        .route("/items/{id}", put(update_item))
        .route("/items/{id}", delete(destroy_item))
        // Orders
        .route("/shops/{id}/orders", post(create_order))
        // Reviews
        .route("/shops/{id}/reviews", post(review_shop))
        .route("/shops/{id}/reviews", get(list_shop_reviews))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
