mod common;

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::test;
use base64::Engine;
use serde_json::Value;

#[actix_rt::test]
async fn rejects_missing_bearer_token() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get().uri("/restaurants").to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("request without a token should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn rejects_non_bearer_scheme() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/users")
        .insert_header((header::AUTHORIZATION, "Basic b3BzOnNlY3JldA=="))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("basic auth should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn rejects_invalid_bearer_token() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/analytics/summary")
        .insert_header((header::AUTHORIZATION, "Bearer invalid-token"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("garbage token should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn rejects_token_signed_with_unknown_key() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let token = format!(
        "{}.{}.fakesig",
        engine.encode(r#"{"alg":"RS256","typ":"JWT","kid":"nobody"}"#),
        engine.encode(r#"{"sub":"intruder","admin":true}"#)
    );
    let req = test::TestRequest::post()
        .uri("/tracking/start")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("unverifiable token should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert!(!ctx.state.simulator.is_running());
}

#[actix_rt::test]
async fn dev_bypass_token_is_accepted() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/restaurants")
        .insert_header(common::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn public_paths_ignore_bad_tokens() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::AUTHORIZATION, "Bearer invalid-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn rejected_tokens_show_up_in_error_log() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/restaurants")
        .insert_header((header::AUTHORIZATION, "Bearer invalid-token"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("garbage token should be rejected");
    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(ctx.state.errors.len(), 1);

    let req = test::TestRequest::get()
        .uri("/errors")
        .insert_header(common::auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let entries = body["data"].as_array().expect("data array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "auth");
    assert_eq!(entries[0]["severity"], "warning");
    assert_eq!(entries[0]["context"]["action"], "authenticate");
    assert_eq!(entries[0]["context"]["extra"]["path"], "/restaurants");
}
