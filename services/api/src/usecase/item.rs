use chrono::Utc;
use uuid::Uuid;

use market_domain::image::ImageFile;
use market_domain::pagination::PageRequest;
use market_domain::validate::{
    DESCRIPTION_LEN, NAME_LEN, VALIDATION_FAILED, ValidationErrors, check_len,
};

use crate::domain::repository::{
    CategoryRepository, ImageStorePort, ItemRepository, SearchIndexPort,
};
use crate::domain::types::{Item, ItemStatus, Shop, User};
use crate::error::ApiError;
use crate::usecase::indexing::{IndexAction, cleanup_after_destroy, spawn_index_shop};

fn check_price(errors: &mut ValidationErrors, price: i32) {
    if price < 1 {
        errors.add(
            "price",
            "Validation failed: price must be at least 1".into(),
            VALIDATION_FAILED,
        );
    }
}

fn check_status(errors: &mut ValidationErrors, status: i32) -> Option<ItemStatus> {
    let parsed = ItemStatus::from_i32(status);
    if parsed.is_none() {
        errors.add(
            "status",
            "Validation failed: status must be 0 or 1".into(),
            VALIDATION_FAILED,
        );
    }
    parsed
}

// ── CreateItem ───────────────────────────────────────────────────────────────

pub struct CreateItemInput {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub quantity: Option<i32>,
    pub sort: Option<i32>,
    pub status: Option<i32>,
}

pub struct CreateItemUseCase<R, C, S>
where
    R: ItemRepository,
    C: CategoryRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub items: R,
    pub categories: C,
    pub search: S,
}

impl<R, C, S> CreateItemUseCase<R, C, S>
where
    R: ItemRepository,
    C: CategoryRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub async fn execute(
        &self,
        caller: &User,
        shop: &Shop,
        input: CreateItemInput,
    ) -> Result<Item, ApiError> {
        if shop.owner_id != caller.id && !caller.admin {
            return Err(ApiError::NotAuthorized);
        }

        let mut errors = ValidationErrors::default();
        check_len(&mut errors, "name", &input.name, NAME_LEN);
        if let Some(description) = &input.description {
            check_len(&mut errors, "description", description, DESCRIPTION_LEN);
        }
        check_price(&mut errors, input.price);
        let status = match input.status {
            Some(v) => check_status(&mut errors, v),
            None => Some(ItemStatus::ForSell),
        };
        errors.into_result().map_err(ApiError::Validation)?;
        // check_status only returns None alongside a validation error.
        let status = status.unwrap_or(ItemStatus::ForSell);

        if !self.categories.exists(input.category_id).await? {
            return Err(ApiError::NotFound("category"));
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::now_v7(),
            shop_id: shop.id,
            category_id: input.category_id,
            name: input.name,
            description: input.description,
            price: input.price,
            quantity: input.quantity,
            sort: input.sort.unwrap_or(0),
            status,
            image_file: None,
            created_at: now,
            updated_at: now,
        };
        self.items.create(&item).await?;
        // Index immediately only when the item is actually for sell.
        if item.status == ItemStatus::ForSell {
            spawn_index_shop(self.search.clone(), item.shop_id);
        }
        Ok(item)
    }
}

// ── ListShopItems ────────────────────────────────────────────────────────────

pub struct ListShopItemsUseCase<R: ItemRepository> {
    pub items: R,
}

impl<R: ItemRepository> ListShopItemsUseCase<R> {
    pub async fn execute(
        &self,
        shop_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Item>, ApiError> {
        self.items.list_by_shop(shop_id, page.clamped()).await
    }
}

// ── UpdateItem ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
    pub sort: Option<i32>,
    pub status: Option<i32>,
    pub image_file: Option<ImageFile>,
}

pub struct UpdateItemUseCase<R, S>
where
    R: ItemRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub items: R,
    pub search: S,
}

impl<R, S> UpdateItemUseCase<R, S>
where
    R: ItemRepository,
    S: SearchIndexPort + Clone + Send + 'static,
{
    pub async fn execute(
        &self,
        caller: &User,
        shop: &Shop,
        item: Item,
        input: UpdateItemInput,
    ) -> Result<Item, ApiError> {
        if shop.owner_id != caller.id && !caller.admin {
            return Err(ApiError::NotAuthorized);
        }

        let mut errors = ValidationErrors::default();
        if let Some(name) = &input.name {
            check_len(&mut errors, "name", name, NAME_LEN);
        }
        if let Some(description) = &input.description {
            check_len(&mut errors, "description", description, DESCRIPTION_LEN);
        }
        if let Some(price) = input.price {
            check_price(&mut errors, price);
        }
        let status = input.status.and_then(|v| check_status(&mut errors, v));
        errors.into_result().map_err(ApiError::Validation)?;

        let mut item = item;
        if let Some(name) = input.name {
            item.name = name;
        }
        if let Some(description) = input.description {
            item.description = Some(description);
        }
        if let Some(price) = input.price {
            item.price = price;
        }
        if let Some(quantity) = input.quantity {
            item.quantity = Some(quantity);
        }
        if let Some(sort) = input.sort {
            item.sort = sort;
        }
        if let Some(status) = status {
            item.status = status;
        }
        if let Some(image_file) = input.image_file {
            item.image_file = Some(image_file);
        }
        item.updated_at = Utc::now();

        self.items.update(&item).await?;
        spawn_index_shop(self.search.clone(), item.shop_id);
        Ok(item)
    }
}

// ── DestroyItem ──────────────────────────────────────────────────────────────

pub struct DestroyItemUseCase<R, S, I>
where
    R: ItemRepository,
    S: SearchIndexPort,
    I: ImageStorePort,
{
    pub items: R,
    pub search: S,
    pub images: I,
}

impl<R, S, I> DestroyItemUseCase<R, S, I>
where
    R: ItemRepository,
    S: SearchIndexPort,
    I: ImageStorePort,
{
    pub async fn execute(&self, caller: &User, shop: &Shop, item: Item) -> Result<(), ApiError> {
        if shop.owner_id != caller.id && !caller.admin {
            return Err(ApiError::NotAuthorized);
        }
        let deleted = self.items.delete(item.id).await?;
        if !deleted {
            return Err(ApiError::NotFound("item"));
        }
        cleanup_after_destroy(
            &self.search,
            &self.images,
            item.shop_id,
            &item.image_versions(),
            IndexAction::Reindex,
        )
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use market_domain::image::ImageVersion;

    use crate::domain::types::Category;
    use crate::usecase::indexing::tests::{RecordingImages, RecordingSearch};

    struct MockItemRepo {
        items: Mutex<Vec<Item>>,
    }

    impl MockItemRepo {
        fn new(items: Vec<Item>) -> Self {
            Self {
                items: Mutex::new(items),
            }
        }
    }

    impl ItemRepository for MockItemRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Item>, ApiError> {
            Ok(self.items.lock().unwrap().iter().find(|i| i.id == id).cloned())
        }
        async fn list_by_shop(
            &self,
            shop_id: Uuid,
            _page: PageRequest,
        ) -> Result<Vec<Item>, ApiError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.shop_id == shop_id)
                .cloned()
                .collect())
        }
        async fn create(&self, item: &Item) -> Result<(), ApiError> {
            self.items.lock().unwrap().push(item.clone());
            Ok(())
        }
        async fn update(&self, item: &Item) -> Result<(), ApiError> {
            let mut items = self.items.lock().unwrap();
            let slot = items
                .iter_mut()
                .find(|i| i.id == item.id)
                .ok_or(ApiError::NotFound("item"))?;
            *slot = item.clone();
            Ok(())
        }
        async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|i| i.id != id);
            Ok(items.len() < before)
        }
    }

    struct MockCategoryRepo {
        known: Vec<Uuid>,
    }

    impl CategoryRepository for MockCategoryRepo {
        async fn list(&self) -> Result<Vec<Category>, ApiError> {
            Ok(vec![])
        }
        async fn exists(&self, id: Uuid) -> Result<bool, ApiError> {
            Ok(self.known.contains(&id))
        }
    }

    fn owner_and_shop() -> (User, Shop) {
        let now = Utc::now();
        let owner = User {
            id: Uuid::now_v7(),
            email: "seller@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            full_name: "Seller".into(),
            room: None,
            phone: None,
            gender: None,
            identity_number: None,
            seller: true,
            admin: false,
            banned: false,
            accept_token_after: now,
            created_at: now,
            updated_at: now,
        };
        let shop = Shop {
            id: Uuid::now_v7(),
            owner_id: owner.id,
            name: "Banh Mi Corner".into(),
            description: None,
            address: None,
            opening_status: true,
            avatar_file: None,
            cover_file: None,
            created_at: now,
            updated_at: now,
        };
        (owner, shop)
    }

    fn item_in(shop: &Shop, status: ItemStatus) -> Item {
        let now = Utc::now();
        Item {
            id: Uuid::now_v7(),
            shop_id: shop.id,
            category_id: Uuid::now_v7(),
            name: "Banh mi".into(),
            description: None,
            price: 15000,
            quantity: Some(10),
            sort: 0,
            status,
            image_file: Some(ImageFile {
                versions: vec![ImageVersion {
                    location: "https://cdn/items/a.png".into(),
                    key: "items/a.png".into(),
                }],
            }),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_input(category_id: Uuid) -> CreateItemInput {
        CreateItemInput {
            category_id,
            name: "Banh mi".into(),
            description: Some("Crispy".into()),
            price: 15000,
            quantity: Some(10),
            sort: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn create_for_sell_item_schedules_index() {
        let (owner, shop) = owner_and_shop();
        let category_id = Uuid::now_v7();
        let uc = CreateItemUseCase {
            items: MockItemRepo::new(vec![]),
            categories: MockCategoryRepo {
                known: vec![category_id],
            },
            search: RecordingSearch::default(),
        };
        let item = uc
            .execute(&owner, &shop, create_input(category_id))
            .await
            .unwrap();
        assert_eq!(item.status, ItemStatus::ForSell);

        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(*uc.search.indexed.lock().unwrap(), vec![shop.id]);
    }

    #[tokio::test]
    async fn create_not_for_sell_item_skips_index() {
        let (owner, shop) = owner_and_shop();
        let category_id = Uuid::now_v7();
        let uc = CreateItemUseCase {
            items: MockItemRepo::new(vec![]),
            categories: MockCategoryRepo {
                known: vec![category_id],
            },
            search: RecordingSearch::default(),
        };
        let mut input = create_input(category_id);
        input.status = Some(0);
        let item = uc.execute(&owner, &shop, input).await.unwrap();
        assert_eq!(item.status, ItemStatus::NotForSell);

        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(uc.search.indexed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_unknown_category() {
        let (owner, shop) = owner_and_shop();
        let uc = CreateItemUseCase {
            items: MockItemRepo::new(vec![]),
            categories: MockCategoryRepo { known: vec![] },
            search: RecordingSearch::default(),
        };
        let result = uc
            .execute(&owner, &shop, create_input(Uuid::now_v7()))
            .await;
        assert!(matches!(result, Err(ApiError::NotFound("category"))));
        assert!(uc.items.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_collects_validation_failures() {
        let (owner, shop) = owner_and_shop();
        let category_id = Uuid::now_v7();
        let uc = CreateItemUseCase {
            items: MockItemRepo::new(vec![]),
            categories: MockCategoryRepo {
                known: vec![category_id],
            },
            search: RecordingSearch::default(),
        };
        let mut input = create_input(category_id);
        input.name = "".into();
        input.price = 0;
        let result = uc.execute(&owner, &shop, input).await;
        match result {
            Err(ApiError::Validation(errors)) => {
                assert!(errors.0.contains_key("name"));
                assert!(errors.0.contains_key("price"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_requires_shop_owner() {
        let (_, shop) = owner_and_shop();
        let (stranger, _) = owner_and_shop();
        let uc = CreateItemUseCase {
            items: MockItemRepo::new(vec![]),
            categories: MockCategoryRepo { known: vec![] },
            search: RecordingSearch::default(),
        };
        let result = uc
            .execute(&stranger, &shop, create_input(Uuid::now_v7()))
            .await;
        assert!(matches!(result, Err(ApiError::NotAuthorized)));
    }

    #[tokio::test]
    async fn update_always_schedules_index() {
        let (owner, shop) = owner_and_shop();
        let item = item_in(&shop, ItemStatus::NotForSell);
        let uc = UpdateItemUseCase {
            items: MockItemRepo::new(vec![item.clone()]),
            search: RecordingSearch::default(),
        };
        let updated = uc
            .execute(
                &owner,
                &shop,
                item,
                UpdateItemInput {
                    name: Some("Banh mi trung".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Banh mi trung");

        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(*uc.search.indexed.lock().unwrap(), vec![shop.id]);
    }

    #[tokio::test]
    async fn destroy_deletes_versions_and_reindexes_shop() {
        let (owner, shop) = owner_and_shop();
        let item = item_in(&shop, ItemStatus::ForSell);
        let uc = DestroyItemUseCase {
            items: MockItemRepo::new(vec![item.clone()]),
            search: RecordingSearch::default(),
            images: RecordingImages::default(),
        };
        uc.execute(&owner, &shop, item).await.unwrap();

        assert!(uc.items.items.lock().unwrap().is_empty());
        let deleted = uc.images.deleted.lock().unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].key, "items/a.png");
        assert_eq!(*uc.search.indexed.lock().unwrap(), vec![shop.id]);
    }
}
