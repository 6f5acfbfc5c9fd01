use crate::enums::common::{ApiResponse, GeneralResponse};
use crate::enums::queries::LimitParam;
use crate::utils::errors::{ErrorLog, HandledError};
use actix_web::middleware::NormalizePath;
use actix_web::{delete, get, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

pub(super) fn config(cfg: &mut ServiceConfig, errors: &ErrorLog) {
    cfg.service(
        scope::scope("/errors")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(errors.clone()))
            .service(get_recent_errors)
            .service(clear_errors),
    );
}

#[utoipa::path(
    get,
    tag = "Errors",
    path = "",
    params(LimitParam),
    responses(
        (
            status = 200,
            description = "Handled errors, newest first",
            body = ApiResponse<Vec<HandledError>>
        )
    ),
    summary = "Recently handled errors"
)]
#[get("")]
pub(super) async fn get_recent_errors(
    errors: web::Data<ErrorLog>,
    params: web::Query<LimitParam>,
) -> impl Responder {
    let limit = params.limit.unwrap_or(usize::MAX);
    HttpResponse::Ok().json(ApiResponse::ok(errors.recent(limit)))
}

#[utoipa::path(
    delete,
    tag = "Errors",
    path = "",
    responses(
        (status = 200, description = "Error log cleared", body = GeneralResponse)
    ),
    summary = "Clear the error log"
)]
#[delete("")]
pub(super) async fn clear_errors(errors: web::Data<ErrorLog>) -> impl Responder {
    errors.clear();
    HttpResponse::Ok().json(GeneralResponse::ok())
}
