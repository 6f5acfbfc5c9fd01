mod analytics;
mod data_models;
mod documentation;
mod error_log;
mod errors;
mod restaurants;
mod tracking;
mod users;

use crate::enums::common::HealthReport;
use crate::AppState;
use actix_web::guard::{Guard, GuardContext};
use actix_web::http::header;
use actix_web::{get, web, HttpResponse, Responder};
pub(crate) use errors::default_error_handler;
use utoipa::OpenApi;
use utoipa_actix_web::service_config::ServiceConfig;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(info(
    title = "BiziData Admin API",
    description = "Administration backend for the BiziData delivery platform"
))]
pub struct ApiDoc;

/// Matches `application/json` with or without parameters such as charset.
pub struct ContentTypeHeader;

impl Guard for ContentTypeHeader {
    fn check(&self, ctx: &GuardContext<'_>) -> bool {
        ctx.head()
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
    }
}

#[utoipa::path(
    get,
    tag = "Health",
    path = "/",
    responses((status = 200, description = "Server is up", body = String))
)]
#[get("/")]
pub(super) async fn root_endpoint() -> impl Responder {
    HttpResponse::Ok().body("Server up!")
}

#[utoipa::path(
    get,
    tag = "Health",
    path = "/health",
    responses((status = 200, description = "Backend and simulator state", body = HealthReport))
)]
#[get("/health")]
pub(super) async fn health_endpoint(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthReport {
        status: "ok".to_string(),
        store: state.store.backend_tag().to_string(),
        simulation_running: state.simulator.is_running(),
    })
}

#[get("/api-docs/openapi.json")]
pub(super) async fn openapi_json(openapi: web::Data<utoipa::openapi::OpenApi>) -> impl Responder {
    HttpResponse::Ok().json(openapi.get_ref())
}

pub(crate) fn configure(cfg: &mut ServiceConfig, state: &AppState) {
    cfg.service(root_endpoint)
        .service(health_endpoint)
        .configure(|cfg| restaurants::config(cfg, &state.restaurant_ops))
        .configure(|cfg| users::config(cfg, &state.user_ops))
        .configure(|cfg| data_models::config(cfg, &state.model_ops))
        .configure(|cfg| documentation::config(cfg, &state.doc_ops))
        .configure(|cfg| analytics::config(cfg, &state.analytics_ops))
        .configure(|cfg| tracking::config(cfg, &state.simulator))
        .configure(|cfg| error_log::config(cfg, &state.errors));
}
