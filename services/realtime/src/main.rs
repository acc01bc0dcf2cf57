use tracing::info;

use market_realtime::config::RealtimeConfig;
use market_realtime::hub::Hub;
use market_realtime::router::build_router;
use market_realtime::state::AppState;

#[tokio::main]
async fn main() {
    market_core::tracing::init_tracing();

    let config = RealtimeConfig::from_env();

    let state = AppState {
        hub: Hub::new(),
        jwt_secret: config.jwt_secret,
        internal_secret: config.internal_secret,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.realtime_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("realtime gateway listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
