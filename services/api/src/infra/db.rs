use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel as _, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use market_api_schema::{categories, items, orders, reviews, shops, users};
use market_domain::image::ImageFile;
use market_domain::pagination::PageRequest;
use market_domain::role::RoleFlags;

use crate::domain::repository::{
    CategoryRepository, ItemRepository, OrderRepository, ReviewRepository, ShopRepository,
    UserRepository,
};
use crate::domain::types::{Category, Item, ItemStatus, Order, Review, Shop, User, UserPatch};
use crate::error::ApiError;

fn image_file_from_json(value: Option<serde_json::Value>) -> Option<ImageFile> {
    value.and_then(|v| serde_json::from_value(v).ok())
}

fn image_file_to_json(file: &ImageFile) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(file)
        .context("serialize image attachment")
        .map_err(ApiError::from)
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            full_name: Set(user.full_name.clone()),
            room: Set(user.room.clone()),
            phone: Set(user.phone.clone()),
            gender: Set(user.gender.clone()),
            identity_number: Set(user.identity_number.clone()),
            seller: Set(user.seller),
            admin: Set(user.admin),
            banned: Set(user.banned),
            accept_token_after: Set(user.accept_token_after),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn apply_patch(&self, id: Uuid, patch: &UserPatch) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(v) = &patch.full_name {
            am.full_name = Set(v.clone());
        }
        if let Some(v) = &patch.room {
            am.room = Set(Some(v.clone()));
        }
        if let Some(v) = &patch.phone {
            am.phone = Set(Some(v.clone()));
        }
        if let Some(v) = &patch.gender {
            am.gender = Set(Some(v.clone()));
        }
        if let Some(v) = &patch.identity_number {
            am.identity_number = Set(Some(v.clone()));
        }
        if let Some(v) = &patch.email {
            am.email = Set(v.clone());
        }
        if let Some(v) = &patch.password_hash {
            am.password_hash = Set(v.clone());
        }
        if let Some(v) = patch.banned {
            am.banned = Set(v);
        }
        am.updated_at = Set(Utc::now());
        let model = am.update(&self.db).await.context("apply user patch")?;
        Ok(user_from_model(model))
    }

    async fn set_role_flags(&self, id: Uuid, flags: RoleFlags) -> Result<User, ApiError> {
        let am = users::ActiveModel {
            id: Set(id),
            seller: Set(flags.seller),
            admin: Set(flags.admin),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = am.update(&self.db).await.context("set role flags")?;
        Ok(user_from_model(model))
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        accept_token_after: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let am = users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            accept_token_after: Set(accept_token_after),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        am.update(&self.db).await.context("update password")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        full_name: model.full_name,
        room: model.room,
        phone: model.phone,
        gender: model.gender,
        identity_number: model.identity_number,
        seller: model.seller,
        admin: model.admin,
        banned: model.banned,
        accept_token_after: model.accept_token_after,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Shop repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShopRepository {
    pub db: DatabaseConnection,
}

impl ShopRepository for DbShopRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Shop>, ApiError> {
        let model = shops::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find shop by id")?;
        Ok(model.map(shop_from_model))
    }

    async fn create(&self, shop: &Shop) -> Result<(), ApiError> {
        shops::ActiveModel {
            id: Set(shop.id),
            owner_id: Set(shop.owner_id),
            name: Set(shop.name.clone()),
            description: Set(shop.description.clone()),
            address: Set(shop.address.clone()),
            opening_status: Set(shop.opening_status),
            avatar_file: Set(shop
                .avatar_file
                .as_ref()
                .map(image_file_to_json)
                .transpose()?),
            cover_file: Set(shop
                .cover_file
                .as_ref()
                .map(image_file_to_json)
                .transpose()?),
            created_at: Set(shop.created_at),
            updated_at: Set(shop.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create shop")?;
        Ok(())
    }

    async fn update(&self, shop: &Shop) -> Result<(), ApiError> {
        let am = shops::ActiveModel {
            id: Set(shop.id),
            name: Set(shop.name.clone()),
            description: Set(shop.description.clone()),
            address: Set(shop.address.clone()),
            opening_status: Set(shop.opening_status),
            avatar_file: Set(shop
                .avatar_file
                .as_ref()
                .map(image_file_to_json)
                .transpose()?),
            cover_file: Set(shop
                .cover_file
                .as_ref()
                .map(image_file_to_json)
                .transpose()?),
            updated_at: Set(shop.updated_at),
            ..Default::default()
        };
        am.update(&self.db).await.context("update shop")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = shops::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete shop")?;
        Ok(result.rows_affected > 0)
    }
}

fn shop_from_model(model: shops::Model) -> Shop {
    Shop {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        description: model.description,
        address: model.address,
        opening_status: model.opening_status,
        avatar_file: image_file_from_json(model.avatar_file),
        cover_file: image_file_from_json(model.cover_file),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Item repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbItemRepository {
    pub db: DatabaseConnection,
}

impl ItemRepository for DbItemRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, ApiError> {
        let model = items::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find item by id")?;
        Ok(model.map(item_from_model))
    }

    async fn list_by_shop(
        &self,
        shop_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Item>, ApiError> {
        let models = items::Entity::find()
            .filter(items::Column::ShopId.eq(shop_id))
            .order_by_asc(items::Column::Sort)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list items by shop")?;
        Ok(models.into_iter().map(item_from_model).collect())
    }

    async fn create(&self, item: &Item) -> Result<(), ApiError> {
        items::ActiveModel {
            id: Set(item.id),
            shop_id: Set(item.shop_id),
            category_id: Set(item.category_id),
            name: Set(item.name.clone()),
            description: Set(item.description.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity),
            sort: Set(item.sort),
            status: Set(item.status.as_i32()),
            image_file: Set(item
                .image_file
                .as_ref()
                .map(image_file_to_json)
                .transpose()?),
            created_at: Set(item.created_at),
            updated_at: Set(item.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create item")?;
        Ok(())
    }

    async fn update(&self, item: &Item) -> Result<(), ApiError> {
        let am = items::ActiveModel {
            id: Set(item.id),
            name: Set(item.name.clone()),
            description: Set(item.description.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity),
            sort: Set(item.sort),
            status: Set(item.status.as_i32()),
            image_file: Set(item
                .image_file
                .as_ref()
                .map(image_file_to_json)
                .transpose()?),
            updated_at: Set(item.updated_at),
            ..Default::default()
        };
        am.update(&self.db).await.context("update item")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete item")?;
        Ok(result.rows_affected > 0)
    }
}

fn item_from_model(model: items::Model) -> Item {
    Item {
        id: model.id,
        shop_id: model.shop_id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        quantity: model.quantity,
        sort: model.sort,
        // Rows only ever hold 0 or 1; anything else maps to not-for-sell.
        status: ItemStatus::from_i32(model.status).unwrap_or(ItemStatus::NotForSell),
        image_file: image_file_from_json(model.image_file),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, ApiError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models
            .into_iter()
            .map(|m| Category {
                id: m.id,
                name: m.name,
                created_at: m.created_at,
                updated_at: m.updated_at,
            })
            .collect())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
        let model = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find category by id")?;
        Ok(model.is_some())
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), ApiError> {
        orders::ActiveModel {
            id: Set(order.id),
            user_id: Set(order.user_id),
            shop_id: Set(order.shop_id),
            note: Set(order.note.clone()),
            status: Set(order.status.clone()),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create order")?;
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, ApiError> {
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        Ok(models.into_iter().map(order_from_model).collect())
    }

    async fn exists_for(&self, user_id: Uuid, shop_id: Uuid) -> Result<bool, ApiError> {
        let model = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::ShopId.eq(shop_id))
            .one(&self.db)
            .await
            .context("check order existence")?;
        Ok(model.is_some())
    }
}

fn order_from_model(model: orders::Model) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        shop_id: model.shop_id,
        note: model.note,
        status: model.status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn find_by_user_shop(
        &self,
        user_id: Uuid,
        shop_id: Uuid,
    ) -> Result<Option<Review>, ApiError> {
        let model = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::ShopId.eq(shop_id))
            .one(&self.db)
            .await
            .context("find review by user and shop")?;
        Ok(model.map(review_from_model))
    }

    async fn list_by_shop(
        &self,
        shop_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, ApiError> {
        let models = reviews::Entity::find()
            .filter(reviews::Column::ShopId.eq(shop_id))
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list reviews by shop")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn insert(&self, review: &Review) -> Result<(), ApiError> {
        reviews::ActiveModel {
            id: Set(review.id),
            user_id: Set(review.user_id),
            shop_id: Set(review.shop_id),
            rate: Set(review.rate),
            comment: Set(review.comment.clone()),
            created_at: Set(review.created_at),
            updated_at: Set(review.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert review")?;
        Ok(())
    }

    async fn update_rate_comment(
        &self,
        id: Uuid,
        rate: i32,
        comment: &str,
    ) -> Result<Review, ApiError> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find review for update")?
            .ok_or(ApiError::NotFound("review"))?;

        let mut review = model.into_active_model();
        review.rate = Set(rate);
        review.comment = Set(comment.to_owned());
        review.updated_at = Set(Utc::now());
        let model = review.update(&self.db).await.context("update review")?;
        Ok(review_from_model(model))
    }
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        shop_id: model.shop_id,
        rate: model.rate,
        comment: model.comment,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
