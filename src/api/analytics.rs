use crate::api::errors::service_error;
use crate::enums::common::ApiResponse;
use crate::enums::queries::{DaysParam, LimitParam};
use crate::models::order::{DailyRevenue, DashboardSummary, Order, RestaurantRevenue};
use crate::services::AnalyticsOperations;
use actix_web::middleware::NormalizePath;
use actix_web::{get, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

const DEFAULT_RECENT_ORDERS: usize = 10;
const MAX_RECENT_ORDERS: usize = 100;
const DEFAULT_REVENUE_DAYS: u32 = 7;

pub(super) fn config(cfg: &mut ServiceConfig, analytics_ops: &AnalyticsOperations) {
    cfg.service(
        scope::scope("/analytics")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(analytics_ops.clone()))
            .service(get_summary)
            .service(get_recent_orders)
            .service(get_restaurant_orders)
            .service(get_revenue_by_restaurant)
            .service(get_daily_revenue),
    );
}

#[utoipa::path(
    get,
    tag = "Analytics",
    path = "/summary",
    responses(
        (
            status = 200,
            description = "Dashboard counters and revenue totals",
            body = ApiResponse<DashboardSummary>
        ),
        (status = 503, description = "Database unreachable", body = ApiResponse<String>)
    ),
    summary = "Dashboard summary"
)]
#[get("/summary")]
pub(super) async fn get_summary(analytics_ops: web::Data<AnalyticsOperations>) -> impl Responder {
    match analytics_ops.dashboard_summary().await {
        Ok(summary) => HttpResponse::Ok().json(ApiResponse::ok(summary)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Analytics",
    path = "/orders/recent",
    params(LimitParam),
    responses(
        (status = 200, description = "Newest orders first", body = ApiResponse<Vec<Order>>)
    ),
    summary = "Most recent orders"
)]
#[get("/orders/recent")]
pub(super) async fn get_recent_orders(
    analytics_ops: web::Data<AnalyticsOperations>,
    params: web::Query<LimitParam>,
) -> impl Responder {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_ORDERS)
        .clamp(1, MAX_RECENT_ORDERS);
    match analytics_ops.recent_orders(limit).await {
        Ok(orders) => HttpResponse::Ok().json(ApiResponse::ok(orders)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Analytics",
    path = "/orders/restaurant/{id}",
    params(("id", description = "Restaurant document id")),
    responses(
        (
            status = 200,
            description = "Orders of one restaurant, newest first",
            body = ApiResponse<Vec<Order>>
        )
    ),
    summary = "Orders for a restaurant"
)]
#[get("/orders/restaurant/{id}")]
pub(super) async fn get_restaurant_orders(
    analytics_ops: web::Data<AnalyticsOperations>,
    path: web::Path<String>,
) -> impl Responder {
    match analytics_ops.orders_for_restaurant(&path.into_inner()).await {
        Ok(orders) => HttpResponse::Ok().json(ApiResponse::ok(orders)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Analytics",
    path = "/revenue/restaurants",
    responses(
        (
            status = 200,
            description = "Revenue per restaurant, highest first",
            body = ApiResponse<Vec<RestaurantRevenue>>
        )
    ),
    summary = "Revenue grouped by restaurant"
)]
#[get("/revenue/restaurants")]
pub(super) async fn get_revenue_by_restaurant(
    analytics_ops: web::Data<AnalyticsOperations>,
) -> impl Responder {
    match analytics_ops.revenue_by_restaurant().await {
        Ok(rows) => HttpResponse::Ok().json(ApiResponse::ok(rows)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Analytics",
    path = "/revenue/daily",
    params(DaysParam),
    responses(
        (
            status = 200,
            description = "One row per day, oldest first",
            body = ApiResponse<Vec<DailyRevenue>>
        )
    ),
    summary = "Daily revenue over the last N days"
)]
#[get("/revenue/daily")]
pub(super) async fn get_daily_revenue(
    analytics_ops: web::Data<AnalyticsOperations>,
    params: web::Query<DaysParam>,
) -> impl Responder {
    let days = params.days.unwrap_or(DEFAULT_REVENUE_DAYS);
    match analytics_ops.daily_revenue(days).await {
        Ok(rows) => HttpResponse::Ok().json(ApiResponse::ok(rows)),
        Err(e) => service_error(&e),
    }
}
