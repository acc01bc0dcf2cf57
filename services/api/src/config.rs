/// Api service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    /// HS256 secret for access tokens.
    pub jwt_secret: String,
    /// Base URL of the search-index service.
    pub search_index_url: String,
    /// Base URL of the image store.
    pub image_store_url: String,
    /// Base URL of the realtime gateway.
    pub realtime_url: String,
    /// Shared secret for the realtime gateway's internal broadcast endpoint.
    pub realtime_internal_secret: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            search_index_url: std::env::var("SEARCH_INDEX_URL").expect("SEARCH_INDEX_URL"),
            image_store_url: std::env::var("IMAGE_STORE_URL").expect("IMAGE_STORE_URL"),
            realtime_url: std::env::var("REALTIME_URL").expect("REALTIME_URL"),
            realtime_internal_secret: std::env::var("REALTIME_INTERNAL_SECRET")
                .expect("REALTIME_INTERNAL_SECRET"),
        }
    }
}
