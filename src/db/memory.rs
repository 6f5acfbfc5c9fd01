use crate::db::{
    Direction, Document, DocumentStore, DocumentWrite, FieldTransform, Fields, Query, StoreError,
};
use crate::utils::format::{parse_datetime, timestamp_wrapper};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local document store with the same query semantics as the
/// remote backend: equality filters never match a missing field, and an
/// ordered query skips documents that lack the ordering field.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document under a caller-chosen id.
    pub async fn put(&self, collection: &str, id: &str, fields: Fields) {
        let now = Utc::now();
        let mut w = self.collections.write().await;
        w.entry(collection.to_string()).or_default().insert(
            id.to_string(),
            Document {
                id: id.to_string(),
                fields,
                create_time: Some(now),
                update_time: Some(now),
            },
        );
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

fn apply_transforms(fields: &mut Fields, transforms: &[(String, FieldTransform)]) {
    let now = Utc::now();
    for (field, transform) in transforms {
        let next = match transform {
            FieldTransform::ServerTimestamp => timestamp_wrapper(now),
            FieldTransform::Increment(by) => match fields.get(field) {
                Some(Value::Number(n)) if n.is_i64() => {
                    Value::from(n.as_i64().unwrap_or(0).saturating_add(*by))
                }
                Some(Value::Number(n)) => Value::from(n.as_f64().unwrap_or(0.0) + *by as f64),
                _ => Value::from(*by),
            },
        };
        fields.insert(field.clone(), next);
    }
}

pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => left == right,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Object(_) if parse_datetime(value).is_some() => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

pub(crate) fn compare_values(left: &Value, right: &Value) -> Ordering {
    let by_rank = type_rank(left).cmp(&type_rank(right));
    if by_rank != Ordering::Equal {
        return by_rank;
    }
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Object(_), Value::Object(_)) => parse_datetime(left).cmp(&parse_datetime(right)),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let r = self.collections.read().await;
        Ok(r.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let r = self.collections.read().await;
        let Some(docs) = r.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = docs
            .values()
            .filter(|doc| {
                query.filters.iter().all(|(field, expected)| {
                    doc.fields
                        .get(field)
                        .map(|actual| values_equal(actual, expected))
                        .unwrap_or(false)
                })
            })
            .cloned()
            .collect();

        if let Some((field, direction)) = &query.order_by {
            matched.retain(|doc| doc.fields.contains_key(field));
            matched.sort_by(|a, b| {
                let ord = compare_values(&a.fields[field], &b.fields[field]);
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn create(&self, collection: &str, write: DocumentWrite) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let mut fields = write.fields;
        apply_transforms(&mut fields, &write.transforms);

        let mut w = self.collections.write().await;
        let docs = w.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::AlreadyExists(format!("{collection}/{id}")));
        }
        docs.insert(
            id.clone(),
            Document {
                id: id.clone(),
                fields,
                create_time: Some(now),
                update_time: Some(now),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        write: DocumentWrite,
    ) -> Result<(), StoreError> {
        let mut w = self.collections.write().await;
        let doc = w
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;

        for (field, value) in write.fields {
            doc.fields.insert(field, value);
        }
        apply_transforms(&mut doc.fields, &write.transforms);
        doc.update_time = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut w = self.collections.write().await;
        w.get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))
    }
}
