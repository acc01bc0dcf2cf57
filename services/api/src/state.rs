use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCategoryRepository, DbItemRepository, DbOrderRepository, DbReviewRepository,
    DbShopRepository, DbUserRepository,
};
use crate::infra::images::HttpImageStoreClient;
use crate::infra::realtime::HttpRealtimeClient;
use crate::infra::search::HttpSearchIndexClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub search: HttpSearchIndexClient,
    pub images: HttpImageStoreClient,
    pub realtime: HttpRealtimeClient,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn shop_repo(&self) -> DbShopRepository {
        DbShopRepository {
            db: self.db.clone(),
        }
    }

    pub fn item_repo(&self) -> DbItemRepository {
        DbItemRepository {
            db: self.db.clone(),
        }
    }

    pub fn category_repo(&self) -> DbCategoryRepository {
        DbCategoryRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn search_client(&self) -> HttpSearchIndexClient {
        self.search.clone()
    }

    pub fn image_client(&self) -> HttpImageStoreClient {
        self.images.clone()
    }

    pub fn realtime_client(&self) -> HttpRealtimeClient {
        self.realtime.clone()
    }
}
