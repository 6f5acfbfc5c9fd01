mod common;

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::test;
use bizidata_admin::db::collections::RESTAURANTS;
use bizidata_admin::db::DocumentStore;
use common::auth_header;
use serde_json::{json, Value};

#[actix_rt::test]
async fn lists_restaurants_sorted_with_display_fields() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/restaurants")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");

    let data = body["data"].as_array().expect("data array");
    let names: Vec<&str> = data.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, ["Pizza Palace", "Sushi Stop", "Unnamed Restaurant"]);

    let pizza = &data[0];
    assert_eq!(pizza["display"]["address"], "1 Main St, Springfield");
    assert_eq!(pizza["display"]["stars"]["full"], 4);
    assert_eq!(pizza["display"]["stars"]["half"], 1);
    assert_eq!(pizza["display"]["badge"]["variant"], "success");

    let sushi = &data[1];
    assert_eq!(sushi["cuisine"], "Japanese");
    assert_eq!(sushi["display"]["badge"]["label"], "Pending");

    let bare = &data[2];
    assert_eq!(bare["cuisine"], "Uncategorized");
    assert_eq!(bare["rating"], 0.0);
    assert_eq!(bare["status"], "active");
    assert_eq!(bare["display"]["address"], "No address provided");
}

#[actix_rt::test]
async fn filters_restaurants_by_status() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/restaurants?status=pending")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "r-sushi");
}

#[actix_rt::test]
async fn get_restaurant_found_and_missing() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/restaurants/r-pizza")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "Pizza Palace");
    assert_eq!(body["data"]["address"]["city"], "Springfield");

    let req = test::TestRequest::get()
        .uri("/restaurants/nope")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Restaurant 'nope' not found");
}

#[actix_rt::test]
async fn create_restaurant_applies_defaults() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/restaurants")
        .insert_header(auth_header())
        .set_json(json!({
            "name": "Taco Town",
            "cuisine": "Mexican",
            "address": "5 Elm St"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let created = &body["data"];
    assert_eq!(created["name"], "Taco Town");
    assert_eq!(created["rating"], 0.0);
    assert_eq!(created["status"], "active");
    assert_eq!(created["has_image"], false);
    assert!(created["created_at"].is_string());

    let id = created["id"].as_str().expect("generated id");
    assert!(ctx.store.get(RESTAURANTS, id).await.expect("get").is_some());
    assert_eq!(ctx.store.count(RESTAURANTS).await, 4);
}

#[actix_rt::test]
async fn create_restaurant_requires_json_content_type() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/restaurants")
        .insert_header(auth_header())
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"name":"Plain"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.count(RESTAURANTS).await, 3);
}

#[actix_rt::test]
async fn create_restaurant_rejects_malformed_body() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/restaurants")
        .insert_header(auth_header())
        .set_json(json!({ "cuisine": "No Name" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(ctx.store.count(RESTAURANTS).await, 3);
}

#[actix_rt::test]
async fn update_restaurant_merges_fields() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::put()
        .uri("/restaurants/r-sushi")
        .insert_header(auth_header())
        .set_json(json!({ "status": "active", "rating": 4.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let doc = ctx
        .store
        .get(RESTAURANTS, "r-sushi")
        .await
        .expect("get")
        .expect("still there");
    assert_eq!(doc.fields["status"], "active");
    assert_eq!(doc.fields["rating"], 4.0);
    assert_eq!(doc.fields["name"], "Sushi Stop");
    assert!(doc.fields.contains_key("updated_at"));
}

#[actix_rt::test]
async fn update_missing_restaurant_returns_not_found() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::put()
        .uri("/restaurants/ghost")
        .insert_header(auth_header())
        .set_json(json!({ "name": "Ghost Kitchen" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(ctx.store.get(RESTAURANTS, "ghost").await.expect("get").is_none());
}

#[actix_rt::test]
async fn delete_restaurant_removes_document() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::delete()
        .uri("/restaurants/r-bare")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.store.count(RESTAURANTS).await, 2);

    let req = test::TestRequest::delete()
        .uri("/restaurants/r-bare")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn image_upload_returns_presigned_url_and_flags_restaurant() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/restaurants/r-pizza/image")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let url = body["data"]["upload_url"].as_str().expect("upload url");
    assert!(url.contains("test-bucket"), "unexpected url {url}");
    assert!(url.contains("r-pizza"), "unexpected url {url}");

    let doc = ctx
        .store
        .get(RESTAURANTS, "r-pizza")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(doc.fields["has_image"], true);

    let req = test::TestRequest::get()
        .uri("/restaurants/r-pizza")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["image_url"].is_string());
}

#[actix_rt::test]
async fn image_upload_for_missing_restaurant_returns_not_found() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/restaurants/ghost/image")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
