use crate::db::Document;
use crate::models::{FieldReader, FromDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const UNTITLED_PAGE: &str = "Untitled";
pub const DEFAULT_DOC_CATEGORY: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DocPage {
    pub id: String,
    pub title: String,
    pub category: String,
    /// Markdown source.
    pub content: String,
    pub order: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FromDocument for DocPage {
    fn from_document(doc: &Document) -> Self {
        let f = FieldReader::new(&doc.fields);
        DocPage {
            id: doc.id.clone(),
            title: f.str_or("title", UNTITLED_PAGE),
            category: f.str_or("category", DEFAULT_DOC_CATEGORY),
            content: f.str_or("content", ""),
            order: f.i64_or("order", 0),
            created_at: f.datetime("created_at").or(doc.create_time),
            updated_at: f.datetime("updated_at").or(doc.update_time),
        }
    }
}

impl DocPage {
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewDocPage {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDocPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}
