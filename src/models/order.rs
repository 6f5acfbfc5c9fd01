use crate::db::Document;
use crate::models::{FieldReader, FromDocument};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Read-only view of an order, used by the analytics screens.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    pub id: String,
    pub total: f64,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FromDocument for Order {
    fn from_document(doc: &Document) -> Self {
        let f = FieldReader::new(&doc.fields);
        Order {
            id: doc.id.clone(),
            total: f.f64_or("total", 0.0),
            restaurant_id: f.str("restaurant_id").or_else(|| f.str("restaurantId")),
            restaurant_name: f.str("restaurant_name"),
            status: f.str("status"),
            created_at: f.datetime("created_at").or(doc.create_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub restaurant_count: usize,
    pub driver_count: usize,
    pub owner_count: usize,
    pub verified_driver_count: usize,
    pub order_count: usize,
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub total_revenue_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RestaurantRevenue {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub order_count: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub order_count: usize,
    pub revenue: f64,
}
