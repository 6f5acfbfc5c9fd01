use crate::api::errors::{not_found, service_error};
use crate::api::ContentTypeHeader;
use crate::auth::AdminPrincipal;
use crate::enums::common::{ApiResponse, GeneralResponse};
use crate::enums::queries::DocFilter;
use crate::models::documentation::{DocPage, NewDocPage, UpdateDocPage};
use crate::services::DocumentationOperations;
use actix_web::middleware::NormalizePath;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

pub(super) fn config(cfg: &mut ServiceConfig, doc_ops: &DocumentationOperations) {
    cfg.service(
        scope::scope("/documentation")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(doc_ops.clone()))
            .service(list_documents)
            .service(get_document)
            .service(delete_document)
            .service(
                scope::scope("")
                    .guard(ContentTypeHeader)
                    .service(create_document)
                    .service(update_document),
            ),
    );
}

#[utoipa::path(
    get,
    tag = "Documentation",
    path = "",
    params(DocFilter),
    responses(
        (status = 200, description = "Pages in display order", body = ApiResponse<Vec<DocPage>>)
    ),
    summary = "List or search documentation pages"
)]
#[get("")]
pub(super) async fn list_documents(
    doc_ops: web::Data<DocumentationOperations>,
    filter: web::Query<DocFilter>,
) -> impl Responder {
    let filter = filter.into_inner();
    let result = match (filter.q, filter.category) {
        (Some(q), _) => doc_ops.search_documents(&q).await,
        (None, Some(category)) => doc_ops.list_documents_by_category(&category).await,
        (None, None) => doc_ops.list_documents().await,
    };
    match result {
        Ok(pages) => HttpResponse::Ok().json(ApiResponse::ok(pages)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Documentation",
    path = "/{id}",
    params(("id", description = "Documentation page id")),
    responses(
        (status = 200, description = "Page fetched", body = ApiResponse<DocPage>),
        (status = 404, description = "No such page", body = ApiResponse<String>)
    ),
    summary = "Fetch one documentation page"
)]
#[get("/{id}")]
pub(super) async fn get_document(
    doc_ops: web::Data<DocumentationOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match doc_ops.get_document(&id).await {
        Ok(Some(page)) => HttpResponse::Ok().json(ApiResponse::ok(page)),
        Ok(None) => not_found("Documentation page", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Documentation",
    path = "",
    request_body = NewDocPage,
    responses(
        (status = 200, description = "Page created", body = ApiResponse<DocPage>)
    ),
    summary = "Create a documentation page"
)]
#[post("")]
pub(super) async fn create_document(
    doc_ops: web::Data<DocumentationOperations>,
    admin: AdminPrincipal,
    req_data: web::Json<NewDocPage>,
) -> impl Responder {
    match doc_ops.add_document(req_data.into_inner()).await {
        Ok(page) => {
            info!("Documentation page created: {} by {}", page.id, admin.uid());
            HttpResponse::Ok().json(ApiResponse::ok(page))
        }
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    put,
    tag = "Documentation",
    path = "/{id}",
    params(("id", description = "Documentation page id")),
    request_body = UpdateDocPage,
    responses(
        (status = 200, description = "Page updated", body = GeneralResponse),
        (status = 404, description = "No such page", body = ApiResponse<String>)
    ),
    summary = "Update a documentation page"
)]
#[put("/{id}")]
pub(super) async fn update_document(
    doc_ops: web::Data<DocumentationOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
    req_data: web::Json<UpdateDocPage>,
) -> impl Responder {
    let id = path.into_inner();
    match doc_ops.update_document(&id, req_data.into_inner()).await {
        Ok(true) => {
            info!("Documentation page updated: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("Documentation page", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    delete,
    tag = "Documentation",
    path = "/{id}",
    params(("id", description = "Documentation page id")),
    responses(
        (status = 200, description = "Page deleted", body = GeneralResponse),
        (status = 404, description = "No such page", body = ApiResponse<String>)
    ),
    summary = "Delete a documentation page"
)]
#[delete("/{id}")]
pub(super) async fn delete_document(
    doc_ops: web::Data<DocumentationOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match doc_ops.delete_document(&id).await {
        Ok(true) => {
            info!("Documentation page deleted: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("Documentation page", &id),
        Err(e) => service_error(&e),
    }
}
