#![allow(async_fn_in_trait)]

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use market_domain::image::ImageVersion;
use market_domain::pagination::PageRequest;
use market_domain::role::RoleFlags;

use crate::domain::types::{Category, Item, Order, Review, Shop, User, UserPatch};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError>;
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Apply an admin profile patch and return the updated user.
    async fn apply_patch(&self, id: Uuid, patch: &UserPatch) -> Result<User, ApiError>;

    /// Overwrite the role flags and return the updated user.
    async fn set_role_flags(&self, id: Uuid, flags: RoleFlags) -> Result<User, ApiError>;

    /// Store a new password hash and move the session-invalidation watermark.
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        accept_token_after: DateTime<Utc>,
    ) -> Result<(), ApiError>;
}

/// Repository for shops.
pub trait ShopRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Shop>, ApiError>;
    async fn create(&self, shop: &Shop) -> Result<(), ApiError>;
    async fn update(&self, shop: &Shop) -> Result<(), ApiError>;

    /// Delete a shop. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for items.
pub trait ItemRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, ApiError>;
    async fn list_by_shop(&self, shop_id: Uuid, page: PageRequest) -> Result<Vec<Item>, ApiError>;
    async fn create(&self, item: &Item) -> Result<(), ApiError>;
    async fn update(&self, item: &Item) -> Result<(), ApiError>;

    /// Delete an item. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for item categories.
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, ApiError>;
    async fn exists(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for orders.
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<(), ApiError>;
    async fn list_by_user(&self, user_id: Uuid, page: PageRequest)
    -> Result<Vec<Order>, ApiError>;

    /// Whether at least one order exists for the pair (the review gate).
    async fn exists_for(&self, user_id: Uuid, shop_id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for shop reviews.
pub trait ReviewRepository: Send + Sync {
    async fn find_by_user_shop(
        &self,
        user_id: Uuid,
        shop_id: Uuid,
    ) -> Result<Option<Review>, ApiError>;
    async fn list_by_shop(&self, shop_id: Uuid, page: PageRequest)
    -> Result<Vec<Review>, ApiError>;
    async fn insert(&self, review: &Review) -> Result<(), ApiError>;

    /// Overwrite rate and comment in place, preserving row identity.
    async fn update_rate_comment(
        &self,
        id: Uuid,
        rate: i32,
        comment: &str,
    ) -> Result<Review, ApiError>;
}

/// Port to the search-index service.
///
/// Declared with explicit `Send` futures so mutation usecases can hand them
/// to `tokio::spawn`; implementers still write plain `async fn`.
pub trait SearchIndexPort: Send + Sync {
    fn index_shop_by_id(
        &self,
        shop_id: Uuid,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn delete_shop_index_by_id(
        &self,
        shop_id: Uuid,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Port to the image store. Issues one deletion request per stored version.
pub trait ImageStorePort: Send + Sync {
    async fn delete_images(&self, versions: &[ImageVersion]) -> Result<(), ApiError>;
}

/// Port to the realtime gateway. Same `Send`-future contract as
/// [`SearchIndexPort`]: notifications are spawned off the request path.
pub trait RealtimePort: Send + Sync {
    fn publish_user(
        &self,
        user_id: Uuid,
        event: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn publish_public(
        &self,
        event: &str,
        payload: serde_json::Value,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
