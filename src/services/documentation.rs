use crate::db::collections::DOCUMENTATION;
use crate::db::{DocumentWrite, Query, SharedStore, StoreError};
use crate::models::documentation::{DocPage, NewDocPage, UpdateDocPage, DEFAULT_DOC_CATEGORY};
use crate::models::{normalize, normalize_all};
use crate::services::existed;
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, HandledError};
use log::{debug, info};

const COMPONENT: &str = "DocumentationService";

#[derive(Clone)]
pub struct DocumentationOperations {
    store: SharedStore,
    errors: ErrorLog,
}

impl DocumentationOperations {
    pub fn new(store: SharedStore, errors: ErrorLog) -> Self {
        Self { store, errors }
    }

    async fn load(&self, query: Query, ctx: ErrorContext) -> Result<Vec<DocPage>, HandledError> {
        let docs = self.store.query(&query).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ctx,
                HandleOptions::default().user_message("Failed to load documentation."),
            )
        })?;
        let mut pages: Vec<DocPage> = normalize_all(docs);
        pages.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        });
        Ok(pages)
    }

    pub async fn list_documents(&self) -> Result<Vec<DocPage>, HandledError> {
        self.load(
            Query::collection(DOCUMENTATION),
            ErrorContext::new(COMPONENT, "list_documents"),
        )
        .await
    }

    pub async fn list_documents_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<DocPage>, HandledError> {
        self.load(
            Query::collection(DOCUMENTATION).where_eq("category", category),
            ErrorContext::new(COMPONENT, "list_documents_by_category").with("category", category),
        )
        .await
    }

    /// Case-insensitive substring match over title and content. The document
    /// database has no full-text search, so this filters client-side.
    pub async fn search_documents(&self, needle: &str) -> Result<Vec<DocPage>, HandledError> {
        let pages = self
            .load(
                Query::collection(DOCUMENTATION),
                ErrorContext::new(COMPONENT, "search_documents").with("query", needle),
            )
            .await?;
        let hits: Vec<DocPage> = pages.into_iter().filter(|p| p.matches(needle)).collect();
        debug!("search_documents: '{}' matched {} pages", needle, hits.len());
        Ok(hits)
    }

    pub async fn get_document(&self, id: &str) -> Result<Option<DocPage>, HandledError> {
        let doc = self.store.get(DOCUMENTATION, id).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "get_document").with("id", id),
                HandleOptions::default().user_message("Failed to load documentation page."),
            )
        })?;
        Ok(doc.map(normalize))
    }

    pub async fn add_document(&self, new: NewDocPage) -> Result<DocPage, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "add_document").with("title", new.title.as_str());
        let fail = |e: &StoreError| {
            self.errors.handle(
                e,
                &ctx,
                HandleOptions::default().user_message("Failed to add documentation page."),
            )
        };

        let mut write = DocumentWrite::from_record(&new).map_err(|e| fail(&e))?;
        write
            .fields
            .entry("category")
            .or_insert(DEFAULT_DOC_CATEGORY.into());
        let write = write
            .server_timestamp("created_at")
            .server_timestamp("updated_at");
        let id = self
            .store
            .create(DOCUMENTATION, write)
            .await
            .map_err(|e| fail(&e))?;
        info!("add_document: created '{}' ({})", new.title, id);

        let doc = self
            .store
            .get(DOCUMENTATION, &id)
            .await
            .map_err(|e| fail(&e))?
            .ok_or_else(|| fail(&StoreError::NotFound(format!("{DOCUMENTATION}/{id}"))))?;
        Ok(normalize(doc))
    }

    pub async fn update_document(
        &self,
        id: &str,
        update: UpdateDocPage,
    ) -> Result<bool, HandledError> {
        let ctx = ErrorContext::new(COMPONENT, "update_document").with("id", id);
        let opts = || HandleOptions::default().user_message("Failed to update documentation page.");

        let write = DocumentWrite::from_record(&update)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))?
            .server_timestamp("updated_at");
        existed(self.store.update(DOCUMENTATION, id, write).await)
            .map_err(|e| self.errors.handle(&e, &ctx, opts()))
    }

    pub async fn delete_document(&self, id: &str) -> Result<bool, HandledError> {
        existed(self.store.delete(DOCUMENTATION, id).await).map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "delete_document").with("id", id),
                HandleOptions::default().user_message("Failed to delete documentation page."),
            )
        })
    }
}
