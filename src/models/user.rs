use crate::db::Document;
use crate::models::{FieldReader, FromDocument};
use crate::utils::format::{star_rating, status_badge, StarRating, StatusBadge};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const UNKNOWN_USER: &str = "Unknown User";
pub const DEFAULT_DRIVER_STATUS: &str = "offline";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Owner,
    Admin,
    Customer,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "driver" => Role::Driver,
            "owner" => Role::Owner,
            "admin" => Role::Admin,
            "customer" => Role::Customer,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Customer => "customer",
            Role::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
}

impl GeoLocation {
    /// Accepts `{lat, lng}` as written by the dashboard and
    /// `{latitude, longitude}` as returned for geo points.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let pick = |a: &str, b: &str| {
            map.get(a)
                .or_else(|| map.get(b))
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
        };
        Some(GeoLocation {
            lat: pick("lat", "latitude")?,
            lng: pick("lng", "longitude")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserDisplay {
    pub stars: StarRating,
    pub badge: StatusBadge,
}

/// A platform user as the dashboard manages it: drivers, owners and the rest.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub verified: bool,
    pub rating: f64,
    pub completed_orders: u64,
    pub has_avatar: bool,
    pub avatar_url: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: String,
    pub location: Option<GeoLocation>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub display: UserDisplay,
}

impl FromDocument for UserProfile {
    fn from_document(doc: &Document) -> Self {
        let f = FieldReader::new(&doc.fields);
        let rating = f.f64_or("rating", 0.0);
        let verified = f.bool_or("verified", false);
        let status = f.str_or("status", DEFAULT_DRIVER_STATUS);

        UserProfile {
            id: doc.id.clone(),
            name: f
                .str("name")
                .or_else(|| f.str("display_name"))
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            email: f.str("email"),
            phone: f.str("phone"),
            role: f.str("role").map(|r| Role::parse(&r)).unwrap_or(Role::Unknown),
            verified,
            rating,
            completed_orders: f.u64_or("completed_orders", 0),
            has_avatar: f.bool_or("has_avatar", false),
            avatar_url: f.str("avatar_url"),
            vehicle_type: f.str("vehicle_type"),
            display: UserDisplay {
                stars: star_rating(rating),
                badge: status_badge(&status),
            },
            status,
            location: GeoLocation::from_value(&f.raw("location")),
            last_seen_at: f.datetime("last_seen_at"),
            created_at: f.datetime("created_at").or(doc.create_time),
            updated_at: f.datetime("updated_at").or(doc.update_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_orders: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
}
