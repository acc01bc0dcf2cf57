use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use market_core::health::{healthz, readyz};
use market_core::middleware::request_id_layer;

use crate::handlers::{broadcast, channel};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/channel", get(channel))
        .route("/internal/broadcast", post(broadcast))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
