use crate::db::collections::{ORDERS, RESTAURANTS, USERS};
use crate::db::{Direction, Query, SharedStore, StoreError};
use crate::models::normalize_all;
use crate::models::order::{DailyRevenue, DashboardSummary, Order, RestaurantRevenue};
use crate::models::restaurant::Restaurant;
use crate::models::user::{Role, UserProfile};
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, HandledError};
use crate::utils::format::format_currency;
use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashMap;

const COMPONENT: &str = "AnalyticsService";

pub const UNASSIGNED_RESTAURANT: &str = "Unassigned";
pub const MAX_REVENUE_DAYS: u32 = 366;

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Read-only aggregates over orders, restaurants and users.
#[derive(Clone)]
pub struct AnalyticsOperations {
    store: SharedStore,
    errors: ErrorLog,
}

impl AnalyticsOperations {
    pub fn new(store: SharedStore, errors: ErrorLog) -> Self {
        Self { store, errors }
    }

    fn fail(&self, e: &StoreError, action: &str) -> HandledError {
        self.errors.handle(
            e,
            &ErrorContext::new(COMPONENT, action),
            HandleOptions::default().user_message("Failed to load analytics."),
        )
    }

    pub async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>, HandledError> {
        let query = Query::collection(ORDERS)
            .order_by("created_at", Direction::Descending)
            .limit(limit);
        let docs = self.store.query(&query).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "recent_orders").with("limit", limit),
                HandleOptions::default().user_message("Failed to load recent orders."),
            )
        })?;
        Ok(normalize_all(docs))
    }

    pub async fn orders_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Order>, HandledError> {
        let query = Query::collection(ORDERS).where_eq("restaurant_id", restaurant_id);
        let docs = self.store.query(&query).await.map_err(|e| {
            self.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "orders_for_restaurant")
                    .with("restaurant_id", restaurant_id),
                HandleOptions::default().user_message("Failed to load orders."),
            )
        })?;
        let mut orders: Vec<Order> = normalize_all(docs);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, HandledError> {
        let (restaurants_q, users_q, orders_q) = (
            Query::collection(RESTAURANTS),
            Query::collection(USERS),
            Query::collection(ORDERS),
        );
        let (restaurants, users, orders) = futures::try_join!(
            self.store.query(&restaurants_q),
            self.store.query(&users_q),
            self.store.query(&orders_q),
        )
        .map_err(|e| self.fail(&e, "dashboard_summary"))?;

        let users: Vec<UserProfile> = normalize_all(users);
        let orders: Vec<Order> = normalize_all(orders);
        Ok(summarize(restaurants.len(), &users, &orders))
    }

    pub async fn revenue_by_restaurant(&self) -> Result<Vec<RestaurantRevenue>, HandledError> {
        let (restaurants_q, orders_q) =
            (Query::collection(RESTAURANTS), Query::collection(ORDERS));
        let (restaurants, orders) = futures::try_join!(
            self.store.query(&restaurants_q),
            self.store.query(&orders_q),
        )
        .map_err(|e| self.fail(&e, "revenue_by_restaurant"))?;

        let restaurants: Vec<Restaurant> = normalize_all(restaurants);
        let orders: Vec<Order> = normalize_all(orders);
        Ok(revenue_by_restaurant(&orders, &restaurants))
    }

    /// Revenue per UTC day for the last `days` days including today.
    pub async fn daily_revenue(&self, days: u32) -> Result<Vec<DailyRevenue>, HandledError> {
        let docs = self
            .store
            .query(&Query::collection(ORDERS))
            .await
            .map_err(|e| self.fail(&e, "daily_revenue"))?;
        let orders: Vec<Order> = normalize_all(docs);
        Ok(daily_revenue(&orders, days, Utc::now().date_naive()))
    }
}

pub fn summarize(
    restaurant_count: usize,
    users: &[UserProfile],
    orders: &[Order],
) -> DashboardSummary {
    let drivers = users.iter().filter(|u| u.role == Role::Driver);
    let driver_count = drivers.clone().count();
    let verified_driver_count = drivers.filter(|u| u.verified).count();
    let owner_count = users.iter().filter(|u| u.role == Role::Owner).count();

    let total_revenue = round_cents(orders.iter().map(|o| o.total).sum());
    let average_order_value = if orders.is_empty() {
        0.0
    } else {
        round_cents(total_revenue / orders.len() as f64)
    };

    DashboardSummary {
        restaurant_count,
        driver_count,
        owner_count,
        verified_driver_count,
        order_count: orders.len(),
        total_revenue,
        average_order_value,
        total_revenue_display: format_currency(total_revenue),
    }
}

/// Groups orders by restaurant, highest revenue first. Names come from the
/// restaurant catalog, then the order's denormalized name.
pub fn revenue_by_restaurant(
    orders: &[Order],
    restaurants: &[Restaurant],
) -> Vec<RestaurantRevenue> {
    let names: HashMap<&str, &str> = restaurants
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str()))
        .collect();

    let mut groups: HashMap<String, RestaurantRevenue> = HashMap::new();
    for order in orders {
        let id = order.restaurant_id.clone().unwrap_or_default();
        let entry = groups.entry(id.clone()).or_insert_with(|| {
            let name = names
                .get(id.as_str())
                .map(|n| n.to_string())
                .or_else(|| order.restaurant_name.clone())
                .unwrap_or_else(|| UNASSIGNED_RESTAURANT.to_string());
            RestaurantRevenue {
                restaurant_id: id,
                restaurant_name: name,
                order_count: 0,
                revenue: 0.0,
            }
        });
        entry.order_count += 1;
        entry.revenue += order.total;
    }

    let mut rows: Vec<RestaurantRevenue> = groups
        .into_values()
        .map(|mut row| {
            row.revenue = round_cents(row.revenue);
            row
        })
        .collect();
    rows.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.restaurant_name.cmp(&b.restaurant_name))
    });
    rows
}

/// One row per day ending at `today`, zero-filled. Orders without a
/// timestamp or outside the window are ignored.
pub fn daily_revenue(orders: &[Order], days: u32, today: NaiveDate) -> Vec<DailyRevenue> {
    let days = days.clamp(1, MAX_REVENUE_DAYS);
    let start = today - Duration::days(i64::from(days) - 1);

    let mut rows: Vec<DailyRevenue> = (0..days)
        .map(|offset| DailyRevenue {
            date: start + Duration::days(i64::from(offset)),
            order_count: 0,
            revenue: 0.0,
        })
        .collect();

    for order in orders {
        let Some(created) = order.created_at else {
            continue;
        };
        let date = created.date_naive();
        if date < start || date > today {
            continue;
        }
        let row = &mut rows[(date - start).num_days() as usize];
        row.order_count += 1;
        row.revenue += order.total;
    }

    for row in &mut rows {
        row.revenue = round_cents(row.revenue);
    }
    rows
}
