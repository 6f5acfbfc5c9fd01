use crate::db::Document;
use crate::models::{FieldReader, FromDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const UNTITLED_MODEL: &str = "Untitled Model";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Core,
    #[default]
    Extended,
}

impl ModelCategory {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "core" => Some(ModelCategory::Core),
            "extended" => Some(ModelCategory::Extended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::Core => "core",
            ModelCategory::Extended => "extended",
        }
    }
}

/// Catalog entry describing a data model. Never checked against a real schema.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DataModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ModelCategory,
    pub field_count: u64,
    pub usage_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FromDocument for DataModel {
    fn from_document(doc: &Document) -> Self {
        let f = FieldReader::new(&doc.fields);
        DataModel {
            id: doc.id.clone(),
            name: f.str_or("name", UNTITLED_MODEL),
            description: f.str_or("description", ""),
            category: f
                .str("category")
                .and_then(|c| ModelCategory::parse(&c))
                .unwrap_or_default(),
            field_count: f.u64_or("field_count", 0),
            usage_count: f.u64_or("usage_count", 0),
            created_at: f.datetime("created_at").or(doc.create_time),
            updated_at: f.datetime("updated_at").or(doc.update_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewDataModel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ModelCategory,
    #[serde(default)]
    pub field_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDataModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ModelCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<u64>,
}
