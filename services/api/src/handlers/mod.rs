pub mod admin_user;
pub mod auth;
pub mod category;
pub mod item;
pub mod order;
pub mod review;
pub mod shop;
pub mod user;

use market_domain::pagination::PageRequest;

use crate::error::ApiError;

/// Parse pagination from a raw query string (`per-page`, `page`).
pub(crate) fn parse_page(raw_query: Option<&str>) -> Result<PageRequest, ApiError> {
    let page: PageRequest = raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| ApiError::Param("Invalid query string"))?
        .unwrap_or_default();
    Ok(page)
}
