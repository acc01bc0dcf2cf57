//! Post-commit dispatch to the search index and image store.
//!
//! Mutation usecases call these explicitly after a successful persistence
//! operation; failures are logged and never surfaced to the caller.

use uuid::Uuid;

use market_domain::image::ImageVersion;

use crate::domain::repository::{ImageStorePort, SearchIndexPort};

/// Fire-and-forget re-index of a shop's search document.
pub fn spawn_index_shop<S>(search: S, shop_id: Uuid)
where
    S: SearchIndexPort + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = search.index_shop_by_id(shop_id).await {
            tracing::error!(error = %e, %shop_id, "shop re-index failed");
        }
    });
}

/// What happens to the shop's search document after a destroy.
#[derive(Debug, Clone, Copy)]
pub enum IndexAction {
    /// Item destroyed: the shop document shrinks but stays.
    Reindex,
    /// Shop destroyed: the document goes away.
    Remove,
}

/// Destroy-path cleanup: attempt every image-version deletion and the index
/// call concurrently, awaiting both. Neither failure can undo the already
/// committed database delete; they are logged and swallowed.
pub async fn cleanup_after_destroy<S, I>(
    search: &S,
    images: &I,
    shop_id: Uuid,
    versions: &[ImageVersion],
    action: IndexAction,
) where
    S: SearchIndexPort,
    I: ImageStorePort,
{
    let delete_images = async {
        if versions.is_empty() {
            return;
        }
        if let Err(e) = images.delete_images(versions).await {
            tracing::error!(error = %e, count = versions.len(), "image version deletion failed");
        }
    };
    let update_index = async {
        let result = match action {
            IndexAction::Reindex => search.index_shop_by_id(shop_id).await,
            IndexAction::Remove => search.delete_shop_index_by_id(shop_id).await,
        };
        if let Err(e) = result {
            tracing::error!(error = %e, %shop_id, "search index update failed");
        }
    };
    futures::join!(delete_images, update_index);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::error::ApiError;

    /// Recording search-index mock shared by the mutation usecase tests.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSearch {
        pub indexed: Arc<Mutex<Vec<Uuid>>>,
        pub removed: Arc<Mutex<Vec<Uuid>>>,
        pub fail: bool,
    }

    impl SearchIndexPort for RecordingSearch {
        async fn index_shop_by_id(&self, shop_id: Uuid) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::Internal(anyhow::anyhow!("index down")));
            }
            self.indexed.lock().unwrap().push(shop_id);
            Ok(())
        }
        async fn delete_shop_index_by_id(&self, shop_id: Uuid) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::Internal(anyhow::anyhow!("index down")));
            }
            self.removed.lock().unwrap().push(shop_id);
            Ok(())
        }
    }

    /// Recording image-store mock shared by the mutation usecase tests.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingImages {
        pub deleted: Arc<Mutex<Vec<ImageVersion>>>,
        pub fail: bool,
    }

    impl ImageStorePort for RecordingImages {
        async fn delete_images(&self, versions: &[ImageVersion]) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::Internal(anyhow::anyhow!("store down")));
            }
            self.deleted.lock().unwrap().extend(versions.iter().cloned());
            Ok(())
        }
    }

    fn version(key: &str) -> ImageVersion {
        ImageVersion {
            location: format!("https://cdn/{key}"),
            key: key.into(),
        }
    }

    #[tokio::test]
    async fn spawned_index_eventually_runs() {
        let search = RecordingSearch::default();
        let shop_id = Uuid::now_v7();
        spawn_index_shop(search.clone(), shop_id);
        // Single-threaded test runtime: yielding lets the spawned task run.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(*search.indexed.lock().unwrap(), vec![shop_id]);
    }

    #[tokio::test]
    async fn destroy_cleanup_deletes_versions_and_removes_index() {
        let search = RecordingSearch::default();
        let images = RecordingImages::default();
        let shop_id = Uuid::now_v7();
        let versions = vec![version("shops/avatar.png"), version("shops/cover.png")];

        cleanup_after_destroy(&search, &images, shop_id, &versions, IndexAction::Remove).await;

        assert_eq!(images.deleted.lock().unwrap().len(), 2);
        assert_eq!(*search.removed.lock().unwrap(), vec![shop_id]);
        assert!(search.indexed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn destroy_cleanup_reindexes_for_items() {
        let search = RecordingSearch::default();
        let images = RecordingImages::default();
        let shop_id = Uuid::now_v7();

        cleanup_after_destroy(
            &search,
            &images,
            shop_id,
            &[version("items/a.png")],
            IndexAction::Reindex,
        )
        .await;

        assert_eq!(*search.indexed.lock().unwrap(), vec![shop_id]);
        assert!(search.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn destroy_cleanup_swallows_failures() {
        let search = RecordingSearch {
            fail: true,
            ..Default::default()
        };
        let images = RecordingImages {
            fail: true,
            ..Default::default()
        };
        // Must not panic or propagate.
        cleanup_after_destroy(
            &search,
            &images,
            Uuid::now_v7(),
            &[version("shops/a.png")],
            IndexAction::Remove,
        )
        .await;
    }

    #[tokio::test]
    async fn destroy_cleanup_skips_image_call_without_versions() {
        let search = RecordingSearch::default();
        let images = RecordingImages::default();
        cleanup_after_destroy(&search, &images, Uuid::now_v7(), &[], IndexAction::Remove).await;
        assert!(images.deleted.lock().unwrap().is_empty());
    }
}
