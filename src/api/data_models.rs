use crate::api::errors::{not_found, service_error};
use crate::api::ContentTypeHeader;
use crate::auth::AdminPrincipal;
use crate::enums::common::{ApiResponse, GeneralResponse};
use crate::enums::queries::ModelCategoryFilter;
use crate::models::data_model::{DataModel, NewDataModel, UpdateDataModel};
use crate::services::DataModelOperations;
use actix_web::middleware::NormalizePath;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

pub(super) fn config(cfg: &mut ServiceConfig, model_ops: &DataModelOperations) {
    cfg.service(
        scope::scope("/data-models")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(model_ops.clone()))
            .service(list_data_models)
            .service(get_data_model)
            .service(delete_data_model)
            .service(record_usage)
            .service(
                scope::scope("")
                    .guard(ContentTypeHeader)
                    .service(create_data_model)
                    .service(update_data_model),
            ),
    );
}

#[utoipa::path(
    get,
    tag = "Data Models",
    path = "",
    params(ModelCategoryFilter),
    responses(
        (
            status = 200,
            description = "Core models first, then by name",
            body = ApiResponse<Vec<DataModel>>
        )
    ),
    summary = "List data models"
)]
#[get("")]
pub(super) async fn list_data_models(
    model_ops: web::Data<DataModelOperations>,
    filter: web::Query<ModelCategoryFilter>,
) -> impl Responder {
    let result = match filter.into_inner().category {
        Some(category) => model_ops.list_data_models_by_category(category).await,
        None => model_ops.list_data_models().await,
    };
    match result {
        Ok(models) => HttpResponse::Ok().json(ApiResponse::ok(models)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Data Models",
    path = "/{id}",
    params(("id", description = "Data model document id")),
    responses(
        (status = 200, description = "Data model fetched", body = ApiResponse<DataModel>),
        (status = 404, description = "No such data model", body = ApiResponse<String>)
    ),
    summary = "Fetch one data model"
)]
#[get("/{id}")]
pub(super) async fn get_data_model(
    model_ops: web::Data<DataModelOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match model_ops.get_data_model(&id).await {
        Ok(Some(model)) => HttpResponse::Ok().json(ApiResponse::ok(model)),
        Ok(None) => not_found("Data model", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Data Models",
    path = "",
    request_body = NewDataModel,
    responses(
        (status = 200, description = "Data model created", body = ApiResponse<DataModel>)
    ),
    summary = "Create a data model"
)]
#[post("")]
pub(super) async fn create_data_model(
    model_ops: web::Data<DataModelOperations>,
    admin: AdminPrincipal,
    req_data: web::Json<NewDataModel>,
) -> impl Responder {
    match model_ops.add_data_model(req_data.into_inner()).await {
        Ok(model) => {
            info!("Data model created: {} by {}", model.id, admin.uid());
            HttpResponse::Ok().json(ApiResponse::ok(model))
        }
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    put,
    tag = "Data Models",
    path = "/{id}",
    params(("id", description = "Data model document id")),
    request_body = UpdateDataModel,
    responses(
        (status = 200, description = "Data model updated", body = GeneralResponse),
        (status = 404, description = "No such data model", body = ApiResponse<String>)
    ),
    summary = "Update fields of a data model"
)]
#[put("/{id}")]
pub(super) async fn update_data_model(
    model_ops: web::Data<DataModelOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
    req_data: web::Json<UpdateDataModel>,
) -> impl Responder {
    let id = path.into_inner();
    match model_ops.update_data_model(&id, req_data.into_inner()).await {
        Ok(true) => {
            info!("Data model updated: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("Data model", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    delete,
    tag = "Data Models",
    path = "/{id}",
    params(("id", description = "Data model document id")),
    responses(
        (status = 200, description = "Data model deleted", body = GeneralResponse),
        (status = 404, description = "No such data model", body = ApiResponse<String>)
    ),
    summary = "Delete a data model"
)]
#[delete("/{id}")]
pub(super) async fn delete_data_model(
    model_ops: web::Data<DataModelOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match model_ops.delete_data_model(&id).await {
        Ok(true) => {
            info!("Data model deleted: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("Data model", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Data Models",
    path = "/{id}/usage",
    params(("id", description = "Data model document id")),
    responses(
        (status = 200, description = "Usage counter incremented", body = GeneralResponse),
        (status = 404, description = "No such data model", body = ApiResponse<String>)
    ),
    summary = "Record one use of a data model"
)]
#[post("/{id}/usage")]
pub(super) async fn record_usage(
    model_ops: web::Data<DataModelOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match model_ops.record_usage(&id).await {
        Ok(true) => HttpResponse::Ok().json(GeneralResponse::ok()),
        Ok(false) => not_found("Data model", &id),
        Err(e) => service_error(&e),
    }
}
