use crate::enums::common::ApiResponse;
use crate::utils::errors::{Category, HandledError};
use actix_web::error::JsonPayloadError;
use actix_web::{Error, HttpRequest, HttpResponse};

pub(crate) fn default_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    error!("Error in request: {} \n Error: {}", req.full_url(), err);
    let body = ApiResponse::<()>::error(format!("Invalid request body: {err}"));
    actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
        .into()
}

/// 503 when the backend could not be reached, 500 for everything else.
pub(crate) fn service_error(err: &HandledError) -> HttpResponse {
    let mut builder = match err.category {
        Category::Network => HttpResponse::ServiceUnavailable(),
        _ => HttpResponse::InternalServerError(),
    };
    builder.json(ApiResponse::<()>::from(err))
}

pub(crate) fn not_found(what: &str, id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(format!("{what} '{id}' not found")))
}
