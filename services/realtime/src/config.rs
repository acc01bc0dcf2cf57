/// Realtime gateway configuration loaded from environment variables.
#[derive(Debug)]
pub struct RealtimeConfig {
    /// TCP port for the HTTP server (default 3001). Env var: `REALTIME_PORT`.
    pub realtime_port: u16,
    /// HS256 secret for access-token validation.
    pub jwt_secret: String,
    /// Shared secret guarding the internal broadcast endpoint.
    pub internal_secret: String,
}

impl RealtimeConfig {
    pub fn from_env() -> Self {
        Self {
            realtime_port: std::env::var("REALTIME_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            internal_secret: std::env::var("REALTIME_INTERNAL_SECRET")
                .expect("REALTIME_INTERNAL_SECRET"),
        }
    }
}
