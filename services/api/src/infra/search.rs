use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::SearchIndexPort;
use crate::error::ApiError;

/// HTTP client for the search-index service.
///
/// The service re-reads the shop (and its sellable items) itself, so both
/// calls are plain triggers keyed by shop id.
#[derive(Clone)]
pub struct HttpSearchIndexClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSearchIndexClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }
}

impl SearchIndexPort for HttpSearchIndexClient {
    async fn index_shop_by_id(&self, shop_id: Uuid) -> Result<(), ApiError> {
        let url = format!("{}/shops/{}", self.base_url, shop_id);
        self.http
            .put(&url)
            .send()
            .await
            .context("index shop document")?
            .error_for_status()
            .context("index shop document status")?;
        Ok(())
    }

    async fn delete_shop_index_by_id(&self, shop_id: Uuid) -> Result<(), ApiError> {
        let url = format!("{}/shops/{}", self.base_url, shop_id);
        self.http
            .delete(&url)
            .send()
            .await
            .context("delete shop document")?
            .error_for_status()
            .context("delete shop document status")?;
        Ok(())
    }
}
