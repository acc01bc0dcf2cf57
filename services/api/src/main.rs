use sea_orm::Database;
use tracing::info;

use market_api::config::ApiConfig;
use market_api::infra::images::HttpImageStoreClient;
use market_api::infra::realtime::HttpRealtimeClient;
use market_api::infra::search::HttpSearchIndexClient;
use market_api::router::build_router;
use market_api::state::AppState;

#[tokio::main]
async fn main() {
    market_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        search: HttpSearchIndexClient::new(&config.search_index_url),
        images: HttpImageStoreClient::new(&config.image_store_url),
        realtime: HttpRealtimeClient::new(
            &config.realtime_url,
            &config.realtime_internal_secret,
        ),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
