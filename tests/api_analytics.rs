mod common;

use actix_web::test;
use common::auth_header;
use serde_json::Value;

#[actix_rt::test]
async fn dashboard_summary_counts_and_revenue() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/analytics/summary")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let summary = &body["data"];
    assert_eq!(summary["restaurant_count"], 3);
    assert_eq!(summary["driver_count"], 2);
    assert_eq!(summary["verified_driver_count"], 1);
    assert_eq!(summary["owner_count"], 1);
    assert_eq!(summary["order_count"], 3);
    assert_eq!(summary["total_revenue"], 45.75);
    assert_eq!(summary["average_order_value"], 15.25);
    assert_eq!(summary["total_revenue_display"], "$45.75");
}

#[actix_rt::test]
async fn recent_orders_newest_first_with_limit() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/analytics/orders/recent?limit=2")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|o| o["id"].as_str())
        .collect();
    assert_eq!(ids, ["o-1", "o-2"]);

    // zero is clamped up to a single order
    let req = test::TestRequest::get()
        .uri("/analytics/orders/recent?limit=0")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn orders_for_one_restaurant() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/analytics/orders/restaurant/r-pizza")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], "o-1");
    assert_eq!(data[0]["total"], 20.5);

    let req = test::TestRequest::get()
        .uri("/analytics/orders/restaurant/r-bare")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn revenue_grouped_by_restaurant() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/analytics/revenue/restaurants")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["restaurant_name"], "Pizza Palace");
    assert_eq!(rows[0]["order_count"], 2);
    assert_eq!(rows[0]["revenue"], 30.5);
    assert_eq!(rows[1]["restaurant_name"], "Sushi Stop");
    assert_eq!(rows[1]["revenue"], 15.25);
}

#[actix_rt::test]
async fn daily_revenue_window() {
    let ctx = common::setup_context().await;
    let app = test::init_service(bizidata_admin::build_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/analytics/revenue/daily?days=3")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let revenue: Vec<f64> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|row| row["revenue"].as_f64())
        .collect();
    assert_eq!(revenue, [15.25, 10.0, 20.5]);

    let req = test::TestRequest::get()
        .uri("/analytics/revenue/daily")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(7));
}
