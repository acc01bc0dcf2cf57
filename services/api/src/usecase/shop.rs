use chrono::Utc;
use uuid::Uuid;

use market_domain::image::ImageFile;
use market_domain::validate::{DESCRIPTION_LEN, NAME_LEN, ValidationErrors, check_len};

use crate::domain::repository::{ImageStorePort, SearchIndexPort, ShopRepository};
use crate::domain::types::{Shop, User};
use crate::error::ApiError;
use crate::usecase::indexing::{IndexAction, cleanup_after_destroy, spawn_index_shop};

fn validate_shop_fields(
    name: Option<&str>,
    description: Option<&str>,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrors::default();
    if let Some(name) = name {
        check_len(&mut errors, "name", name, NAME_LEN);
    }
    if let Some(description) = description {
        check_len(&mut errors, "description", description, DESCRIPTION_LEN);
    }
    errors.into_result().map_err(ApiError::Validation)
}

// ── CreateShop ───────────────────────────────────────────────────────────────

pub struct CreateShopInput {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
}

pub struct CreateShopUseCase<R, S>
where
    R: ShopRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub shops: R,
    pub search: S,
}

impl<R, S> CreateShopUseCase<R, S>
where
    R: ShopRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub async fn execute(&self, owner: &User, input: CreateShopInput) -> Result<Shop, ApiError> {
        if !owner.seller {
            return Err(ApiError::NotAuthorized);
        }
        validate_shop_fields(Some(&input.name), input.description.as_deref())?;

        let now = Utc::now();
        let shop = Shop {
            id: Uuid::now_v7(),
            owner_id: owner.id,
            name: input.name,
            description: input.description,
            address: input.address,
            opening_status: true,
            avatar_file: None,
            cover_file: None,
            created_at: now,
            updated_at: now,
        };
        self.shops.create(&shop).await?;
        spawn_index_shop(self.search.clone(), shop.id);
        Ok(shop)
    }
}

// ── GetShop ──────────────────────────────────────────────────────────────────

pub struct GetShopUseCase<R: ShopRepository> {
    pub shops: R,
}

impl<R: ShopRepository> GetShopUseCase<R> {
    pub async fn execute(&self, shop_id: Uuid) -> Result<Shop, ApiError> {
        self.shops
            .find_by_id(shop_id)
            .await?
            .ok_or(ApiError::NotFound("shop"))
    }
}

// ── UpdateShop ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateShopInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub opening_status: Option<bool>,
    pub avatar_file: Option<ImageFile>,
    pub cover_file: Option<ImageFile>,
}

pub struct UpdateShopUseCase<R, S>
where
    R: ShopRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub shops: R,
    pub search: S,
}

impl<R, S> UpdateShopUseCase<R, S>
where
    R: ShopRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub async fn execute(
        &self,
        caller: &User,
        shop: Shop,
        input: UpdateShopInput,
    ) -> Result<Shop, ApiError> {
        if shop.owner_id != caller.id && !caller.admin {
            return Err(ApiError::NotAuthorized);
        }
        validate_shop_fields(input.name.as_deref(), input.description.as_deref())?;

        let mut shop = shop;
        if let Some(name) = input.name {
            shop.name = name;
        }
        if let Some(description) = input.description {
            shop.description = Some(description);
        }
        if let Some(address) = input.address {
            shop.address = Some(address);
        }
        if let Some(opening_status) = input.opening_status {
            shop.opening_status = opening_status;
        }
        if let Some(avatar_file) = input.avatar_file {
            shop.avatar_file = Some(avatar_file);
        }
        if let Some(cover_file) = input.cover_file {
            shop.cover_file = Some(cover_file);
        }
        shop.updated_at = Utc::now();

        self.shops.update(&shop).await?;
        spawn_index_shop(self.search.clone(), shop.id);
        Ok(shop)
    }
}

// ── DestroyShop ──────────────────────────────────────────────────────────────

pub struct DestroyShopUseCase<R, S, I>
where
    R: ShopRepository,
    S: SearchIndexPort,
    I: ImageStorePort,
{
    pub shops: R,
    pub search: S,
    pub images: I,
}

impl<R, S, I> DestroyShopUseCase<R, S, I>
where
    R: ShopRepository,
    S: SearchIndexPort,
    I: ImageStorePort,
{
    pub async fn execute(&self, caller: &User, shop: Shop) -> Result<(), ApiError> {
        if shop.owner_id != caller.id && !caller.admin {
            return Err(ApiError::NotAuthorized);
        }
        let deleted = self.shops.delete(shop.id).await?;
        if !deleted {
            return Err(ApiError::NotFound("shop"));
        }
        cleanup_after_destroy(
            &self.search,
            &self.images,
            shop.id,
            &shop.image_versions(),
            IndexAction::Remove,
        )
        .await;
        Ok(())
    }
}
