use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

mod assets;
mod errors;
pub mod firestore;
pub mod memory;

pub use assets::AssetOperations;
pub use errors::{S3Error, StoreError};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{StoreBackend, StoreConfig};

pub mod collections {
    pub const USERS: &str = "users";
    pub const RESTAURANTS: &str = "restaurants";
    pub const DATA_MODELS: &str = "data_models";
    pub const ORDERS: &str = "orders";
    pub const DOCUMENTATION: &str = "documentation";
}

pub type Fields = Map<String, Value>;

/// A document as returned by the store: its id plus a loosely typed field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// Server-side field mutations applied atomically with a write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTransform {
    ServerTimestamp,
    Increment(i64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentWrite {
    pub fields: Fields,
    pub transforms: Vec<(String, FieldTransform)>,
}

impl DocumentWrite {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            transforms: Vec::new(),
        }
    }

    /// Serializes a `New*`/`Update*` record; it must serialize to a JSON object.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(record) {
            Ok(Value::Object(fields)) => Ok(Self::new(fields)),
            Ok(other) => Err(StoreError::Decode(format!(
                "expected a field map, got {other}"
            ))),
            Err(e) => Err(StoreError::Decode(e.to_string())),
        }
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn server_timestamp(mut self, field: &str) -> Self {
        self.transforms
            .push((field.to_string(), FieldTransform::ServerTimestamp));
        self
    }

    pub fn increment(mut self, field: &str, by: i64) -> Self {
        self.transforms
            .push((field.to_string(), FieldTransform::Increment(by)));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality filters, one optional ordering and a limit: the subset of the
/// document database's query language the dashboard uses.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Creates a document under a generated id and returns that id.
    async fn create(&self, collection: &str, write: DocumentWrite) -> Result<String, StoreError>;

    /// Merges `write` into an existing document. `NotFound` if it does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        write: DocumentWrite,
    ) -> Result<(), StoreError>;

    /// `NotFound` if the document does not exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

pub fn establish_store(cfg: &StoreConfig) -> Result<SharedStore, StoreError> {
    match &cfg.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Firestore(firestore_cfg) => {
            info!(
                "Using Firestore document store for project '{}' at {}",
                firestore_cfg.project_id, firestore_cfg.base_url
            );
            Ok(Arc::new(FirestoreStore::new(firestore_cfg.clone())?))
        }
    }
}
