use crate::api::errors::service_error;
use crate::auth::AdminPrincipal;
use crate::enums::common::ApiResponse;
use crate::enums::queries::LimitParam;
use crate::models::tracking::{SimulatorStatus, TrackingEvent};
use crate::services::DriverSimulator;
use actix_web::middleware::NormalizePath;
use actix_web::{get, post, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

const DEFAULT_EVENT_LIMIT: usize = 20;

pub(super) fn config(cfg: &mut ServiceConfig, simulator: &DriverSimulator) {
    cfg.service(
        scope::scope("/tracking")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(simulator.clone()))
            .service(get_status)
            .service(get_events)
            .service(start_simulation)
            .service(stop_simulation)
            .service(toggle_simulation)
            .service(run_tick),
    );
}

#[utoipa::path(
    get,
    tag = "Tracking",
    path = "/status",
    responses(
        (status = 200, description = "Simulator state", body = ApiResponse<SimulatorStatus>)
    ),
    summary = "Driver simulation status"
)]
#[get("/status")]
pub(super) async fn get_status(simulator: web::Data<DriverSimulator>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::ok(simulator.status()))
}

#[utoipa::path(
    get,
    tag = "Tracking",
    path = "/events",
    params(LimitParam),
    responses(
        (status = 200, description = "Newest events first", body = ApiResponse<Vec<TrackingEvent>>)
    ),
    summary = "Recent simulated driver events"
)]
#[get("/events")]
pub(super) async fn get_events(
    simulator: web::Data<DriverSimulator>,
    params: web::Query<LimitParam>,
) -> impl Responder {
    let limit = params.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    HttpResponse::Ok().json(ApiResponse::ok(simulator.recent_events(limit)))
}

#[utoipa::path(
    post,
    tag = "Tracking",
    path = "/start",
    responses(
        (status = 200, description = "Simulator running", body = ApiResponse<SimulatorStatus>),
        (status = 409, description = "Already running", body = ApiResponse<SimulatorStatus>)
    ),
    summary = "Start the driver simulation"
)]
#[post("/start")]
pub(super) async fn start_simulation(
    simulator: web::Data<DriverSimulator>,
    admin: AdminPrincipal,
) -> impl Responder {
    if simulator.start() {
        info!("Driver simulation started by {}", admin.uid());
        HttpResponse::Ok().json(ApiResponse::ok(simulator.status()))
    } else {
        HttpResponse::Conflict().json(ApiResponse::<SimulatorStatus> {
            status: "error".to_string(),
            data: Some(simulator.status()),
            error: Some("Simulation is already running".to_string()),
        })
    }
}

#[utoipa::path(
    post,
    tag = "Tracking",
    path = "/stop",
    responses(
        (status = 200, description = "Simulator stopped", body = ApiResponse<SimulatorStatus>),
        (status = 409, description = "Was not running", body = ApiResponse<SimulatorStatus>)
    ),
    summary = "Stop the driver simulation"
)]
#[post("/stop")]
pub(super) async fn stop_simulation(
    simulator: web::Data<DriverSimulator>,
    admin: AdminPrincipal,
) -> impl Responder {
    if simulator.stop() {
        info!("Driver simulation stopped by {}", admin.uid());
        HttpResponse::Ok().json(ApiResponse::ok(simulator.status()))
    } else {
        HttpResponse::Conflict().json(ApiResponse::<SimulatorStatus> {
            status: "error".to_string(),
            data: Some(simulator.status()),
            error: Some("Simulation is not running".to_string()),
        })
    }
}

#[utoipa::path(
    post,
    tag = "Tracking",
    path = "/toggle",
    responses(
        (status = 200, description = "State after toggling", body = ApiResponse<SimulatorStatus>)
    ),
    summary = "Start the simulation if stopped, stop it if running"
)]
#[post("/toggle")]
pub(super) async fn toggle_simulation(
    simulator: web::Data<DriverSimulator>,
    admin: AdminPrincipal,
) -> impl Responder {
    let running = simulator.toggle();
    info!("Driver simulation toggled to running={} by {}", running, admin.uid());
    HttpResponse::Ok().json(ApiResponse::ok(simulator.status()))
}

#[utoipa::path(
    post,
    tag = "Tracking",
    path = "/tick",
    responses(
        (status = 200, description = "Number of drivers moved", body = ApiResponse<usize>)
    ),
    summary = "Run a single simulation step now"
)]
#[post("/tick")]
pub(super) async fn run_tick(simulator: web::Data<DriverSimulator>) -> impl Responder {
    match simulator.tick().await {
        Ok(updated) => HttpResponse::Ok().json(ApiResponse::ok(updated)),
        Err(e) => service_error(&e),
    }
}
