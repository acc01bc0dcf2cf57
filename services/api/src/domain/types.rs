use chrono::{DateTime, Utc};
use uuid::Uuid;

use market_domain::image::{ImageFile, ImageVersion};
use market_domain::role::RoleFlags;

/// User account owned by the api service.
///
/// `password_hash` and `accept_token_after` stay inside the service; the
/// public projection is built at the handler boundary.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub room: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub identity_number: Option<String>,
    pub seller: bool,
    pub admin: bool,
    pub banned: bool,
    /// Session-invalidation watermark: tokens issued before this instant are
    /// rejected.
    pub accept_token_after: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role_flags(&self) -> RoleFlags {
        RoleFlags {
            seller: self.seller,
            admin: self.admin,
        }
    }
}

/// Admin profile patch. `None` leaves the field untouched; `password_hash`
/// is already hashed by the credential manager.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub room: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub identity_number: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub banned: Option<bool>,
}

/// A shop, owned by exactly one user.
#[derive(Debug, Clone)]
pub struct Shop {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub opening_status: bool,
    pub avatar_file: Option<ImageFile>,
    pub cover_file: Option<ImageFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Every stored image version across both attachments, for destroy-time
    /// cleanup.
    pub fn image_versions(&self) -> Vec<ImageVersion> {
        self.avatar_file
            .iter()
            .chain(self.cover_file.iter())
            .flat_map(|f| f.versions.iter().cloned())
            .collect()
    }
}

/// Sellable flag on an item. Wire format: integer (1 = for sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    NotForSell = 0,
    ForSell = 1,
}

impl ItemStatus {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::NotForSell),
            1 => Some(Self::ForSell),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// An item sold by a shop.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: Option<i32>,
    pub sort: i32,
    pub status: ItemStatus,
    pub image_file: Option<ImageFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn image_versions(&self) -> Vec<ImageVersion> {
        self.image_file
            .iter()
            .flat_map(|f| f.versions.iter().cloned())
            .collect()
    }
}

/// An order placed by a user at a shop. Its existence gates the user's
/// ability to review that shop.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub note: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's review of a shop; at most one per `(user_id, shop_id)` pair.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub rate: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
