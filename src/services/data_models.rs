use crate::db::collections::DATA_MODELS;
use crate::db::{DocumentWrite, Query, SharedStore, StoreError};
use crate::models::data_model::{DataModel, ModelCategory, NewDataModel, UpdateDataModel};
use crate::models::{normalize, normalize_all};
use crate::services::existed;
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, HandledError};
use log::info;

const COMPONENT: &str = "DataModelService";

#[derive(Clone)]
pub struct DataModelOperations {
    store: SharedStore,
    errors: ErrorLog,
}

/// Core models first, then by name.
fn catalog_order(models: &mut [DataModel]) {
    models.sort_by(|a, b| {
        (a.category != ModelCategory::Core)
            .cmp(&(b.category != ModelCategory::Core))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

impl DataModelOperations {
    pub fn new(store: SharedStore, errors: ErrorLog) -> Self {
        Self { store, errors }
    }

    async fn load(&self, query: Query, ctx: ErrorContext) -> Result<Vec<DataModel>, HandledError> {
        let docs = self.store.query(&query).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ctx,
                HandleOptions::default().user_message("Failed to load data models."),
            )
        })?;
        let mut models: Vec<DataModel> = normalize_all(docs);
        catalog_order(&mut models);
        Ok(models)
    }

    pub async fn list_data_models(&self) -> Result<Vec<DataModel>, HandledError> {
        self.load(
            Query::collection(DATA_MODELS),
            ErrorContext::new(COMPONENT, "list_data_models"),
        )
        .await
    }

    pub async fn list_data_models_by_category(
        &self,
        category: ModelCategory,
    ) -> Result<Vec<DataModel>, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "list_data_models_by_category")
            .with("category", category.as_str());

        // documents without a category read as the default one
        if category == ModelCategory::default() {
            let mut models = self.load(Query::collection(DATA_MODELS), ctx).await?;
            models.retain(|m| m.category == category);
            return Ok(models);
        }
        self.load(
            Query::collection(DATA_MODELS).where_eq("category", category.as_str()),
            ctx,
        )
        .await
    }

    pub async fn get_data_model(&self, id: &str) -> Result<Option<DataModel>, HandledError> {
        let doc = self.store.get(DATA_MODELS, id).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "get_data_model").with("id", id),
                HandleOptions::default().user_message("Failed to load data model."),
            )
        })?;
        Ok(doc.map(normalize))
    }

    pub async fn add_data_model(&self, new: NewDataModel) -> Result<DataModel, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "add_data_model").with("name", new.name.as_str());
        let fail = |e: &StoreError| {
            self.errors.handle(
                e,
                &ctx,
                HandleOptions::default().user_message("Failed to add data model."),
            )
        };

        let write = DocumentWrite::from_record(&new)
            .map_err(|e| fail(&e))?
            .set("usage_count", 0)
            .server_timestamp("created_at")
            .server_timestamp("updated_at");
        let id = self
            .store
            .create(DATA_MODELS, write)
            .await
            .map_err(|e| fail(&e))?;
        info!("add_data_model: created '{}' ({})", new.name, id);

        let doc = self
            .store
            .get(DATA_MODELS, &id)
            .await
            .map_err(|e| fail(&e))?
            .ok_or_else(|| fail(&StoreError::NotFound(format!("{DATA_MODELS}/{id}"))))?;
        Ok(normalize(doc))
    }

    pub async fn update_data_model(
        &self,
        id: &str,
        update: UpdateDataModel,
    ) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "update_data_model").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to update data model.");

        let write = DocumentWrite::from_record(&update)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?
            .server_timestamp("updated_at");
        existed(self.store.update(DATA_MODELS, id, write).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))
    }

    pub async fn delete_data_model(&self, id: &str) -> Result<bool, HandledError> {
        existed(self.store.delete(DATA_MODELS, id).await).map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "delete_data_model").with("id", id),
                HandleOptions::default().user_message("Failed to delete data model."),
            )
        })
    }

    /// Atomically bumps `usage_count`.
    pub async fn record_usage(&self, id: &str) -> Result<bool, HandledError> {
        let write = DocumentWrite::default()
            .increment("usage_count", 1)
            .server_timestamp("updated_at");
        existed(self.store.update(DATA_MODELS, id, write).await).map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "record_usage").with("id", id),
                HandleOptions::default(),
            )
        })
    }
}
