use crate::db::Document;
use crate::models::{FieldReader, FromDocument};
use crate::utils::format::{
    clamp_rating, format_address, star_rating, status_badge, StarRating, StatusBadge,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const UNNAMED_RESTAURANT: &str = "Unnamed Restaurant";
pub const DEFAULT_CUISINE: &str = "Uncategorized";
pub const DEFAULT_RESTAURANT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RestaurantDisplay {
    pub address: String,
    pub rating: f64,
    pub stars: StarRating,
    pub badge: StatusBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
    /// Stored as found: a string, a structured object, or null.
    #[schema(value_type = Object)]
    pub address: Value,
    pub status: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub has_image: bool,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub display: RestaurantDisplay,
}

impl FromDocument for Restaurant {
    fn from_document(doc: &Document) -> Self {
        let f = FieldReader::new(&doc.fields);
        let rating = f.f64_or("rating", 0.0);
        let address = f.raw("address");
        let status = f.str_or("status", DEFAULT_RESTAURANT_STATUS);

        Restaurant {
            id: doc.id.clone(),
            name: f.str_or("name", UNNAMED_RESTAURANT),
            // older documents carry the cuisine under `type`
            cuisine: f
                .str("cuisine")
                .or_else(|| f.str("type"))
                .unwrap_or_else(|| DEFAULT_CUISINE.to_string()),
            rating,
            display: RestaurantDisplay {
                address: format_address(&address),
                rating: clamp_rating(rating),
                stars: star_rating(rating),
                badge: status_badge(&status),
            },
            address,
            status,
            phone: f.str("phone"),
            email: f.str("email"),
            owner_id: f.str("owner_id"),
            description: f.str("description"),
            has_image: f.bool_or("has_image", false),
            image_url: f.str("image_url"),
            created_at: f.datetime("created_at").or(doc.create_time),
            updated_at: f.datetime("updated_at").or(doc.update_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRestaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
