use anyhow::Context as _;
use futures::future::join_all;

use market_domain::image::ImageVersion;

use crate::domain::repository::ImageStorePort;
use crate::error::ApiError;

/// HTTP client for the image store. Deletion is one request per stored
/// version, addressed by the version's storage key.
#[derive(Clone)]
pub struct HttpImageStoreClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpImageStoreClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }
}

impl ImageStorePort for HttpImageStoreClient {
    async fn delete_images(&self, versions: &[ImageVersion]) -> Result<(), ApiError> {
        // Every version is attempted even if an earlier one fails; the first
        // failure is reported after the batch completes.
        let requests = versions.iter().map(|version| {
            let url = format!("{}/{}", self.base_url, version.key);
            async move {
                self.http
                    .delete(&url)
                    .send()
                    .await
                    .context("delete image version")?
                    .error_for_status()
                    .context("delete image version status")?;
                Ok::<(), ApiError>(())
            }
        });
        let results = join_all(requests).await;
        results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }
}
