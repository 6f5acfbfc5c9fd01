use crate::db::collections::USERS;
use crate::db::{AssetOperations, DocumentWrite, Query, SharedStore, StoreError};
use crate::models::user::{NewUser, Role, UpdateUser, UserProfile, DEFAULT_DRIVER_STATUS};
use crate::models::{normalize, normalize_all};
use crate::services::{existed, populate_image_urls};
use crate::traits::{avatar_key, ImageKey};
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, HandledError, Severity};
use log::{debug, info};

const COMPONENT: &str = "UserService";

#[derive(Clone)]
pub struct UserOperations {
    store: SharedStore,
    assets: AssetOperations,
    errors: ErrorLog,
}

impl UserOperations {
    pub fn new(store: SharedStore, assets: AssetOperations, errors: ErrorLog) -> Self {
        Self {
            store,
            assets,
            errors,
        }
    }

    async fn load(
        &self,
        query: Query,
        ctx: ErrorContext,
    ) -> Result<Vec<UserProfile>, HandledError> {
        let docs = self.store.query(&query).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ctx,
                HandleOptions::default().user_message("Failed to load users."),
            )
        })?;

        let mut users: Vec<UserProfile> = normalize_all(docs);
        users.sort_by_key(|u| u.name.to_lowercase());
        populate_image_urls(&mut users, &self.assets).await;
        debug!("{}: loaded {} users", ctx.action, users.len());
        Ok(users)
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, HandledError> {
        self.load(
            Query::collection(USERS),
            ErrorContext::new(COMPONENT, "list_users"),
        )
        .await
    }

    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<UserProfile>, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "list_users_by_role").with("role", role.as_str());

        // missing or unrecognised roles all read as `unknown`
        if role == Role::Unknown {
            let mut users = self.load(Query::collection(USERS), ctx).await?;
            users.retain(|u| u.role == Role::Unknown);
            return Ok(users);
        }
        self.load(Query::collection(USERS).where_eq("role", role.as_str()), ctx)
            .await
    }

    pub async fn list_drivers(&self) -> Result<Vec<UserProfile>, HandledError> {
        self.list_users_by_role(Role::Driver).await
    }

    pub async fn list_owners(&self) -> Result<Vec<UserProfile>, HandledError> {
        self.list_users_by_role(Role::Owner).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, HandledError> {
        let doc = self.store.get(USERS, id).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "get_user").with("id", id),
                HandleOptions::default().user_message("Failed to load user details."),
            )
        })?;

        let Some(doc) = doc else {
            return Ok(None);
        };
        let mut user: UserProfile = normalize(doc);
        if user.has_image() {
            populate_image_urls(std::slice::from_mut(&mut user), &self.assets).await;
        }
        Ok(Some(user))
    }

    pub async fn add_user(&self, new: NewUser) -> Result<UserProfile, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "add_user").with("role", new.role.as_str());
        let fail = |e: &StoreError| {
            self.errors.handle(
                e,
                &ctx,
                HandleOptions::default().user_message("Failed to add user."),
            )
        };

        let write = DocumentWrite::from_record(&new)
            .map_err(|e| fail(&e))?
            .set("rating", 0.0)
            .set("completed_orders", 0)
            .set("status", DEFAULT_DRIVER_STATUS)
            .set("has_avatar", false)
            .server_timestamp("created_at")
            .server_timestamp("updated_at");

        let id = self.store.create(USERS, write).await.map_err(|e| fail(&e))?;
        info!("add_user: created {} '{}' ({})", new.role.as_str(), new.name, id);

        let doc = self
            .store
            .get(USERS, &id)
            .await
            .map_err(|e| fail(&e))?
            .ok_or_else(|| fail(&StoreError::NotFound(format!("{USERS}/{id}"))))?;
        Ok(normalize(doc))
    }

    pub async fn update_user(&self, id: &str, update: UpdateUser) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "update_user").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to update user.");

        let write = DocumentWrite::from_record(&update)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?
            .server_timestamp("updated_at");
        existed(self.store.update(USERS, id, write).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))
    }

    /// Marks a driver or owner as verified (or revokes it).
    pub async fn set_verified(&self, id: &str, verified: bool) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "set_verified")
            .with("id", id)
            .with("verified", verified);

        let write = DocumentWrite::default()
            .set("verified", verified)
            .server_timestamp("updated_at");
        let found = existed(self.store.update(USERS, id, write).await).map_err(|e| {
            self.errors.handle(
                &e,
                &ctx,
                HandleOptions::default().user_message("Failed to update verification status."),
            )
        })?;
        if found {
            info!("set_verified: user {} verified={}", id, verified);
        }
        Ok(found)
    }

    pub async fn delete_user(&self, id: &str) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "delete_user").with("id", id);

        let Some(existing) = self.get_user(id).await? else {
            return Ok(false);
        };
        let deleted = existed(self.store.delete(USERS, id).await).map_err(|e| {
            self.errors.handle(
                &e,
                &ctx,
                HandleOptions::default().user_message("Failed to delete user."),
            )
        })?;

        if deleted && existing.has_image() {
            if let Err(e) = self.assets.delete_object(&existing.image_key()).await {
                self.errors
                    .handle(&e, &ctx, HandleOptions::default().severity(Severity::Warning));
            }
        }
        Ok(deleted)
    }

    /// Presigned PUT URL for the user's avatar; `None` if the user does not exist.
    pub async fn request_avatar_upload(&self, id: &str) -> Result<Option<String>, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "request_avatar_upload").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to prepare avatar upload.");

        let url = self
            .assets
            .presign_upload(&avatar_key(id))
            .await
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?;

        let write = DocumentWrite::default()
            .set("has_avatar", true)
            .server_timestamp("updated_at");
        let found = existed(self.store.update(USERS, id, write).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?;
        Ok(found.then_some(url))
    }
}
