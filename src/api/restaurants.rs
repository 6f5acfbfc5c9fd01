use crate::api::errors::{not_found, service_error};
use crate::api::ContentTypeHeader;
use crate::auth::AdminPrincipal;
use crate::enums::common::{ApiResponse, GeneralResponse, UploadUrl};
use crate::enums::queries::StatusFilter;
use crate::models::restaurant::{NewRestaurant, Restaurant, UpdateRestaurant};
use crate::services::RestaurantOperations;
use actix_web::middleware::NormalizePath;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use utoipa_actix_web::scope;
use utoipa_actix_web::service_config::ServiceConfig;

pub(super) fn config(cfg: &mut ServiceConfig, restaurant_ops: &RestaurantOperations) {
    cfg.service(
        scope::scope("/restaurants")
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(restaurant_ops.clone()))
            .service(list_restaurants)
            .service(get_restaurant)
            .service(delete_restaurant)
            .service(request_image_upload)
            .service(
                scope::scope("")
                    .guard(ContentTypeHeader)
                    .service(create_restaurant)
                    .service(update_restaurant),
            ),
    );
}

#[utoipa::path(
    get,
    tag = "Restaurants",
    path = "",
    params(StatusFilter),
    responses(
        (
            status = 200,
            description = "Restaurants sorted by name",
            body = ApiResponse<Vec<Restaurant>>
        ),
        (status = 500, description = "Store failure", body = ApiResponse<String>)
    ),
    summary = "List restaurants, optionally filtered by status"
)]
#[get("")]
pub(super) async fn list_restaurants(
    restaurant_ops: web::Data<RestaurantOperations>,
    filter: web::Query<StatusFilter>,
) -> impl Responder {
    let result = match filter.into_inner().status {
        Some(status) => restaurant_ops.list_restaurants_by_status(&status).await,
        None => restaurant_ops.list_restaurants().await,
    };
    match result {
        Ok(restaurants) => HttpResponse::Ok().json(ApiResponse::ok(restaurants)),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    get,
    tag = "Restaurants",
    path = "/{id}",
    params(("id", description = "Restaurant document id")),
    responses(
        (status = 200, description = "Restaurant fetched", body = ApiResponse<Restaurant>),
        (status = 404, description = "No such restaurant", body = ApiResponse<String>)
    ),
    summary = "Fetch one restaurant"
)]
#[get("/{id}")]
pub(super) async fn get_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match restaurant_ops.get_restaurant(&id).await {
        Ok(Some(restaurant)) => HttpResponse::Ok().json(ApiResponse::ok(restaurant)),
        Ok(None) => not_found("Restaurant", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Restaurants",
    path = "",
    request_body = NewRestaurant,
    responses(
        (status = 200, description = "Restaurant created", body = ApiResponse<Restaurant>)
    ),
    summary = "Create a restaurant"
)]
#[post("")]
pub(super) async fn create_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    admin: AdminPrincipal,
    req_data: web::Json<NewRestaurant>,
) -> impl Responder {
    match restaurant_ops.add_restaurant(req_data.into_inner()).await {
        Ok(restaurant) => {
            info!("Restaurant created: {} by {}", restaurant.id, admin.uid());
            HttpResponse::Ok().json(ApiResponse::ok(restaurant))
        }
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    put,
    tag = "Restaurants",
    path = "/{id}",
    params(("id", description = "Restaurant document id")),
    request_body = UpdateRestaurant,
    responses(
        (status = 200, description = "Restaurant updated", body = GeneralResponse),
        (status = 404, description = "No such restaurant", body = ApiResponse<String>)
    ),
    summary = "Update fields of a restaurant"
)]
#[put("/{id}")]
pub(super) async fn update_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
    req_data: web::Json<UpdateRestaurant>,
) -> impl Responder {
    let id = path.into_inner();
    match restaurant_ops
        .update_restaurant(&id, req_data.into_inner())
        .await
    {
        Ok(true) => {
            info!("Restaurant updated: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("Restaurant", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    delete,
    tag = "Restaurants",
    path = "/{id}",
    params(("id", description = "Restaurant document id")),
    responses(
        (status = 200, description = "Restaurant deleted", body = GeneralResponse),
        (status = 404, description = "No such restaurant", body = ApiResponse<String>)
    ),
    summary = "Delete a restaurant and its image"
)]
#[delete("/{id}")]
pub(super) async fn delete_restaurant(
    restaurant_ops: web::Data<RestaurantOperations>,
    admin: AdminPrincipal,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match restaurant_ops.delete_restaurant(&id).await {
        Ok(true) => {
            info!("Restaurant deleted: {} by {}", id, admin.uid());
            HttpResponse::Ok().json(GeneralResponse::ok())
        }
        Ok(false) => not_found("Restaurant", &id),
        Err(e) => service_error(&e),
    }
}

#[utoipa::path(
    post,
    tag = "Restaurants",
    path = "/{id}/image",
    params(("id", description = "Restaurant document id")),
    responses(
        (status = 200, description = "Presigned upload URL", body = ApiResponse<UploadUrl>),
        (status = 404, description = "No such restaurant", body = ApiResponse<String>)
    ),
    summary = "Get a presigned URL for uploading the restaurant image"
)]
#[post("/{id}/image")]
pub(super) async fn request_image_upload(
    restaurant_ops: web::Data<RestaurantOperations>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match restaurant_ops.request_image_upload(&id).await {
        Ok(Some(upload_url)) => HttpResponse::Ok().json(ApiResponse::ok(UploadUrl { upload_url })),
        Ok(None) => not_found("Restaurant", &id),
        Err(e) => service_error(&e),
    }
}
