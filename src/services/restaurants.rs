use crate::db::collections::RESTAURANTS;
use crate::db::{AssetOperations, DocumentWrite, Query, SharedStore, StoreError};
use crate::models::restaurant::{
    NewRestaurant, Restaurant, UpdateRestaurant, DEFAULT_RESTAURANT_STATUS,
};
use crate::models::{normalize, normalize_all};
use crate::services::{existed, populate_image_urls};
use crate::traits::{restaurant_image_key, ImageKey};
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, HandledError, Severity};
use log::{debug, info};

const COMPONENT: &str = "RestaurantService";

#[derive(Clone)]
pub struct RestaurantOperations {
    store: SharedStore,
    assets: AssetOperations,
    errors: ErrorLog,
}

impl RestaurantOperations {
    pub fn new(store: SharedStore, assets: AssetOperations, errors: ErrorLog) -> Self {
        Self {
            store,
            assets,
            errors,
        }
    }

    async fn load(&self, query: Query, action: &str) -> Result<Vec<Restaurant>, HandledError> {
        let docs = self.store.query(&query).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, action),
                HandleOptions::default().user_message("Failed to load restaurants."),
            )
        })?;

        let mut restaurants: Vec<Restaurant> = normalize_all(docs);
        restaurants.sort_by_key(|r| r.name.to_lowercase());
        populate_image_urls(&mut restaurants, &self.assets).await;
        debug!("{}: loaded {} restaurants", action, restaurants.len());
        Ok(restaurants)
    }

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, HandledError> {
        self.load(Query::collection(RESTAURANTS), "list_restaurants").await
    }

    pub async fn list_restaurants_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<Restaurant>, HandledError> {
        // documents without a status read as the default one
        if status == DEFAULT_RESTAURANT_STATUS {
            let mut restaurants = self
                .load(Query::collection(RESTAURANTS), "list_restaurants_by_status")
                .await?;
            restaurants.retain(|r| r.status == status);
            return Ok(restaurants);
        }
        self.load(
            Query::collection(RESTAURANTS).where_eq("status", status),
            "list_restaurants_by_status",
        )
        .await
    }

    pub async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, HandledError> {
        let doc = self.store.get(RESTAURANTS, id).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "get_restaurant").with("id", id),
                HandleOptions::default().user_message("Failed to load restaurant details."),
            )
        })?;

        let Some(doc) = doc else {
            return Ok(None);
        };
        let mut restaurant: Restaurant = normalize(doc);
        if restaurant.has_image() {
            populate_image_urls(std::slice::from_mut(&mut restaurant), &self.assets).await;
        }
        Ok(Some(restaurant))
    }

    pub async fn add_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "add_restaurant").with("name", new.name.as_str());
        let fail = |e: &StoreError| {
            self.errors.handle(
                e,
                &ctx,
                HandleOptions::default().user_message("Failed to add restaurant."),
            )
        };

        let mut write = DocumentWrite::from_record(&new).map_err(|e| fail(&e))?;
        write.fields.entry("rating").or_insert(0.0_f64.into());
        write
            .fields
            .entry("status")
            .or_insert(DEFAULT_RESTAURANT_STATUS.into());
        let write = write
            .set("has_image", false)
            .server_timestamp("created_at")
            .server_timestamp("updated_at");

        let id = self.store.create(RESTAURANTS, write).await.map_err(|e| fail(&e))?;
        info!("add_restaurant: created restaurant '{}' ({})", new.name, id);

        let doc = self
            .store
            .get(RESTAURANTS, &id)
            .await
            .map_err(|e| fail(&e))?
            .ok_or_else(|| fail(&StoreError::NotFound(format!("{RESTAURANTS}/{id}"))))?;
        Ok(normalize(doc))
    }

    pub async fn update_restaurant(
        &self,
        id: &str,
        update: UpdateRestaurant,
    ) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "update_restaurant").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to update restaurant.");

        let write = DocumentWrite::from_record(&update)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?
            .server_timestamp("updated_at");
        existed(self.store.update(RESTAURANTS, id, write).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))
    }

    /// Deletes the document and, best effort, its image.
    pub async fn delete_restaurant(&self, id: &str) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "delete_restaurant").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to delete restaurant.");

        let Some(existing) = self.get_restaurant(id).await? else {
            return Ok(false);
        };
        let deleted = existed(self.store.delete(RESTAURANTS, id).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?;

        if deleted && existing.has_image() {
            if let Err(e) = self.assets.delete_object(&existing.image_key()).await {
                self.errors.handle(
                    &e,
                    &ctx,
                    HandleOptions::default().severity(Severity::Warning),
                );
            }
        }
        Ok(deleted)
    }

    /// Presigned PUT URL for the restaurant image; `None` if the restaurant
    /// does not exist.
    pub async fn request_image_upload(&self, id: &str) -> Result<Option<String>, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "request_image_upload").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to prepare image upload.");

        let url = self
            .assets
            .presign_upload(&restaurant_image_key(id))
            .await
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?;

        let write = DocumentWrite::default()
            .set("has_image", true)
            .server_timestamp("updated_at");
        let found = existed(self.store.update(RESTAURANTS, id, write).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?;
        Ok(found.then_some(url))
    }
}
