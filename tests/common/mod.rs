//! Test conventions:
//! - Every API test gets its own seeded `MemoryStore`; nothing is shared
//!   between tests, so they run in parallel.
//! - Authenticate with the dev bypass token from `test_utils`.
//! - Build the app with `test::init_service(build_app(ctx.state.clone()))`.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::http::header;
use bizidata_admin::db::MemoryStore;
use bizidata_admin::test_utils::{
    build_test_state, seeded_store, TestFixtures, TEST_DEV_BYPASS_TOKEN,
};
use bizidata_admin::AppState;

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub fixtures: TestFixtures,
}

pub async fn setup_context() -> TestContext {
    let (store, shared, fixtures) = seeded_store().await;
    let state = build_test_state(shared).await.expect("build test state");
    TestContext {
        state,
        store,
        fixtures,
    }
}

pub fn auth_header() -> (header::HeaderName, String) {
    (
        header::AUTHORIZATION,
        format!("Bearer {}", TEST_DEV_BYPASS_TOKEN),
    )
}
