use crate::api::errors::{not_found, service_error};
use crate::api::ContentTypeHeader;
use crate::auth::AdminPrincipal;
use crate::enums::common::{ApiResponse, GeneralResponse, UploadUrl};
use crate::enums::queries::{RoleFilter, VerifyRequest};
use crate::models::user::{NewUser, UpdateUser, UserProfile};
use crate::services::UserOperations;
use crate::utils::errors::HandledError;
use actix_web::middleware::NormalizePath;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

pub(super) fn config(cfg: &mut ServiceConfig, user_ops: &UserOperations) {
    cfg.service(
        scope::scope("/users")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(user_ops.clone()))
            .service(list_users)
            .service(list_drivers)
            .service(list_owners)
            .service(get_user)
            .service(delete_user)
            .service(request_avatar_upload)
            .service(
                scope::scope("")
                    .guard(ContentTypeHeader)
                    .service(create_user)
                    .service(update_user)
                    .service(set_verified),
            ),
    );
}

fn list_response(result: Result<Vec<UserProfile>, HandledError>) -> HttpResponse {
    match result {
        Ok(users) => HttpResponse::Ok().json(ApiResponse::ok(users)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Users",
    path = "",
    params(RoleFilter),
    responses(
        (status = 200, description = "Users sorted by name", body = ApiResponse<Vec<UserProfile>>)
    ),
    summary = "List users, optionally filtered by role"
)]
#[get("")]
pub(super) async fn list_users(
    user_ops: web::Data<UserOperations>,
    filter: web::Query<RoleFilter>,
) -> impl Responder {
    list_response(match filter.into_inner().role {
        Some(role) => user_ops.list_users_by_role(role).await,
        None => user_ops.list_users().await,
    })
}

#[utoipa::path(
    get,
    tag = "Users",
    path = "/drivers",
    responses(
        (status = 200, description = "All drivers", body = ApiResponse<Vec<UserProfile>>)
    ),
    summary = "List drivers"
)]
#[get("/drivers")]
pub(super) async fn list_drivers(user_ops: web::Data<UserOperations>) -> impl Responder {
    list_response(user_ops.list_drivers().await)
}

#[utoipa::path(
    get,
    tag = "Users",
    path = "/owners",
    responses(
        (status = 200, description = "All restaurant owners", body = ApiResponse<Vec<UserProfile>>)
    ),
    summary = "List restaurant owners"
)]
#[get("/owners")]
pub(super) async fn list_owners(user_ops: web::Data<UserOperations>) -> impl Responder {
    list_response(user_ops.list_owners().await)
}

#[utoipa::path(
    get,
    tag = "Users",
    path = "/{id}",
    params(("id", description = "User document id")),
    responses(
        (status = 200, description = "User fetched", body = ApiResponse<UserProfile>),
        (status = 404, description = "No such user", body = ApiResponse<String>)
    ),
    summary = "Fetch one user"
)]
#[get("/{id}")]
pub(super) async fn get_user(
    user_ops: web::Data<UserOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match user_ops.get_user(&id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(ApiResponse::ok(user)),
        Ok(None) => not_found("User", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Users",
    path = "",
    request_body = NewUser,
    responses(
        (status = 200, description = "User created", body = ApiResponse<UserProfile>)
    ),
    summary = "Create a user"
)]
#[post("")]
pub(super) async fn create_user(
    user_ops: web::Data<UserOperations>,
    admin: AdminPrincipal,
    req_data: web::Json<NewUser>,
) -> impl Responder {
    match user_ops.add_user(req_data.into_inner()).await {
        Ok(user) => {
            info!("User created: {} by {}", user.id, admin.uid());
            HttpResponse::Ok().json(ApiResponse::ok(user))
        }
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    put,
    tag = "Users",
    path = "/{id}",
    params(("id", description = "User document id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = GeneralResponse),
        (status = 404, description = "No such user", body = ApiResponse<String>)
    ),
    summary = "Update fields of a user"
)]
#[put("/{id}")]
pub(super) async fn update_user(
    user_ops: web::Data<UserOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
    req_data: web::Json<UpdateUser>,
) -> impl Responder {
    let id = path.into_inner();
    match user_ops.update_user(&id, req_data.into_inner()).await {
        Ok(true) => {
            info!("User updated: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("User", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    put,
    tag = "Users",
    path = "/{id}/verified",
    params(("id", description = "User document id")),
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification status changed", body = GeneralResponse),
        (status = 404, description = "No such user", body = ApiResponse<String>)
    ),
    summary = "Verify or unverify a driver or owner"
)]
#[put("/{id}/verified")]
pub(super) async fn set_verified(
    user_ops: web::Data<UserOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
    req_data: web::Json<VerifyRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let verified = req_data.into_inner().verified;
    match user_ops.set_verified(&id, verified).await {
        Ok(true) => {
            info!("User {} verified={} by {}", id, verified, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("User", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    delete,
    tag = "Users",
    path = "/{id}",
    params(("id", description = "User document id")),
    responses(
        (status = 200, description = "User deleted", body = GeneralResponse),
        (status = 404, description = "No such user", body = ApiResponse<String>)
    ),
    summary = "Delete a user and their avatar"
)]
#[delete("/{id}")]
pub(super) async fn delete_user(
    user_ops: web::Data<UserOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match user_ops.delete_user(&id).await {
        Ok(true) => {
            info!("User deleted: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("User", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Users",
    path = "/{id}/avatar",
    params(("id", description = "User document id")),
    responses(
        (status = 200, description = "Presigned upload URL", body = ApiResponse<UploadUrl>),
        (status = 404, description = "No such user", body = ApiResponse<String>)
    ),
    summary = "Get a presigned URL for uploading the user's avatar"
)]
#[post("/{id}/avatar")]
pub(super) async fn request_avatar_upload(
    user_ops: web::Data<UserOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match user_ops.request_avatar_upload(&id).await {
        Ok(Some(upload_url)) => HttpResponse::Ok().json(ApiResponse::ok(UploadUrl { upload_url })),
        Ok(None) => not_found("User", &id),
        Err(e) => service_error(&e),
    }
}
