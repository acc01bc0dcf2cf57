use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use market_api::domain::repository::{OrderRepository, ReviewRepository, UserRepository};
use market_api::domain::types::{Order, Review, User, UserPatch};
use market_api::error::ApiError;
use market_api::usecase::credential::hash_password;
use market_domain::pagination::PageRequest;
use market_domain::role::RoleFlags;

// ── InMemoryUserRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepo {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn get(&self, id: Uuid) -> User {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .expect("user present")
    }
}

impl UserRepository for InMemoryUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn apply_patch(&self, id: Uuid, patch: &UserPatch) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound("user"))?;
        if let Some(v) = &patch.full_name {
            user.full_name = v.clone();
        }
        if let Some(v) = &patch.room {
            user.room = Some(v.clone());
        }
        if let Some(v) = &patch.phone {
            user.phone = Some(v.clone());
        }
        if let Some(v) = &patch.gender {
            user.gender = Some(v.clone());
        }
        if let Some(v) = &patch.identity_number {
            user.identity_number = Some(v.clone());
        }
        if let Some(v) = &patch.email {
            user.email = v.clone();
        }
        if let Some(v) = &patch.password_hash {
            user.password_hash = v.clone();
        }
        if let Some(v) = patch.banned {
            user.banned = v;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_role_flags(&self, id: Uuid, flags: RoleFlags) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound("user"))?;
        user.seller = flags.seller;
        user.admin = flags.admin;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        accept_token_after: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound("user"))?;
        user.password_hash = password_hash.to_owned();
        user.accept_token_after = accept_token_after;
        user.updated_at = Utc::now();
        Ok(())
    }
}

// ── InMemoryOrderRepo ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
}

impl OrderRepository for InMemoryOrderRepo {
    async fn create(&self, order: &Order) -> Result<(), ApiError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Order>, ApiError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn exists_for(&self, user_id: Uuid, shop_id: Uuid) -> Result<bool, ApiError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .any(|o| o.user_id == user_id && o.shop_id == shop_id))
    }
}

// ── InMemoryReviewRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryReviewRepo {
    pub reviews: Arc<Mutex<Vec<Review>>>,
}

impl InMemoryReviewRepo {
    pub fn all(&self) -> Vec<Review> {
        self.reviews.lock().unwrap().clone()
    }
}

impl ReviewRepository for InMemoryReviewRepo {
    async fn find_by_user_shop(
        &self,
        user_id: Uuid,
        shop_id: Uuid,
    ) -> Result<Option<Review>, ApiError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.shop_id == shop_id)
            .cloned())
    }

    async fn list_by_shop(
        &self,
        shop_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Review>, ApiError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.shop_id == shop_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, review: &Review) -> Result<(), ApiError> {
        self.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    async fn update_rate_comment(
        &self,
        id: Uuid,
        rate: i32,
        comment: &str,
    ) -> Result<Review, ApiError> {
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::NotFound("review"))?;
        review.rate = rate;
        review.comment = comment.to_owned();
        review.updated_at = Utc::now();
        Ok(review.clone())
    }
}

// ── Factories ────────────────────────────────────────────────────────────────

pub fn create_user(password: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: format!("user-{}@example.com", Uuid::new_v4()),
        password_hash: hash_password(password).unwrap(),
        full_name: "Nguyen Van A".into(),
        room: Some("D222".into()),
        phone: Some("123123123123".into()),
        gender: Some("male".into()),
        identity_number: Some("123456789".into()),
        seller: false,
        admin: false,
        banned: false,
        accept_token_after: now,
        created_at: now,
        updated_at: now,
    }
}

pub fn create_user_with_role(password: &str, role: &str) -> User {
    let mut user = create_user(password);
    match role {
        "seller" => user.seller = true,
        "admin" => user.admin = true,
        _ => {}
    }
    user
}
