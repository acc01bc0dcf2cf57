use axum::{Json, extract::State};
use serde::Serialize;

use crate::domain::repository::CategoryRepository as _;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

// ── GET /categories ──────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.category_repo().list().await?;
    Ok(Json(
        categories
            .into_iter()
            .map(|c| CategoryResponse {
                id: c.id.to_string(),
                name: c.name,
            })
            .collect(),
    ))
}
