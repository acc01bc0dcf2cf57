use crate::hub::Hub;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub hub: Hub,
    pub jwt_secret: String,
    pub internal_secret: String,
}
