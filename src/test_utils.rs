use crate::auth::FirebaseAuthConfig;
use crate::config::{S3Config, SimulationConfig};
use crate::db::collections::{DATA_MODELS, DOCUMENTATION, ORDERS, RESTAURANTS, USERS};
use crate::db::{AssetOperations, Fields, MemoryStore, SharedStore};
use crate::utils::errors::ErrorLog;
use crate::utils::format::timestamp_wrapper;
use crate::{AppState, StartupError};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

// Fixture strategy:
// - Everything lives in a MemoryStore; no network services are needed.
// - Configs are built directly instead of through the environment, so tests
//   can run in parallel.
// - Fixtures keep has_image/has_avatar = false; presigning works offline but
//   keeps list responses stable.
pub const TEST_S3_ENDPOINT: &str = "http://localhost:9000";
pub const TEST_S3_BUCKET: &str = "test-bucket";
pub const TEST_DEV_BYPASS_TOKEN: &str = "test-bypass-token";
pub const TEST_FIREBASE_PROJECT_ID: &str = "test-project";
pub const TEST_SIMULATION_SEED: u64 = 42;

pub fn test_s3_config() -> S3Config {
    S3Config {
        endpoint: TEST_S3_ENDPOINT.to_string(),
        region: "us-east-1".to_string(),
        access_key_id: "test-access-key".to_string(),
        secret_key: "test-secret-key".to_string(),
        bucket_name: TEST_S3_BUCKET.to_string(),
        upload_ttl_secs: 300,
        download_ttl_secs: 3600,
    }
}

pub fn test_auth_config(jwks_url: &str) -> FirebaseAuthConfig {
    FirebaseAuthConfig {
        project_id: TEST_FIREBASE_PROJECT_ID.to_string(),
        jwks_url: jwks_url.to_string(),
        leeway_secs: 60,
        cache_ttl_secs: 3600,
        require_email_verified: true,
        allowed_domains: None,
        admin_emails: vec!["ops@bizidata.test".to_string()],
        dev_bypass_token: Some(TEST_DEV_BYPASS_TOKEN.to_string()),
    }
}

pub fn test_simulation_config() -> SimulationConfig {
    SimulationConfig {
        interval_secs: 1,
        seed: Some(TEST_SIMULATION_SEED),
        ..SimulationConfig::default()
    }
}

pub async fn test_assets() -> Result<AssetOperations, StartupError> {
    Ok(AssetOperations::new(&test_s3_config()).await?)
}

/// App state over `store` with test configs. JWKS points at an unroutable
/// address unless a test overrides the auth config.
pub async fn build_test_state(store: SharedStore) -> Result<AppState, StartupError> {
    Ok(AppState::from_parts(
        store,
        test_assets().await?,
        test_auth_config("http://127.0.0.1:9/jwks"),
        test_simulation_config(),
        ErrorLog::default(),
    ))
}

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

#[derive(Debug, Clone)]
pub struct TestFixtures {
    pub restaurant_ids: Vec<String>,
    pub driver_ids: Vec<String>,
    pub owner_id: String,
    pub customer_id: String,
    pub model_ids: Vec<String>,
    pub doc_ids: Vec<String>,
    pub order_ids: Vec<String>,
}

pub async fn seed_basic_fixtures(store: &MemoryStore) -> TestFixtures {
    let now = Utc::now();

    store
        .put(
            RESTAURANTS,
            "r-pizza",
            fields(json!({
                "name": "Pizza Palace",
                "cuisine": "Italian",
                "rating": 4.5,
                "address": { "street": "1 Main St", "city": "Springfield" },
                "status": "active",
                "has_image": false,
                "created_at": timestamp_wrapper(now - Duration::days(30)),
            })),
        )
        .await;
    store
        .put(
            RESTAURANTS,
            "r-sushi",
            fields(json!({
                "name": "Sushi Stop",
                "type": "Japanese",
                "rating": 3.2,
                "address": "22 Ocean Ave",
                "status": "pending",
            })),
        )
        .await;
    store.put(RESTAURANTS, "r-bare", Fields::new()).await;

    store
        .put(
            USERS,
            "u-driver-1",
            fields(json!({
                "name": "Dana Driver",
                "email": "dana@bizidata.test",
                "role": "driver",
                "verified": true,
                "rating": 4.8,
                "completed_orders": 12,
                "status": "available",
                "vehicle_type": "scooter",
                "location": { "lat": 40.71, "lng": -74.0 },
            })),
        )
        .await;
    store
        .put(
            USERS,
            "u-driver-2",
            fields(json!({
                "name": "Eli Wheels",
                "role": "driver",
                "verified": false,
            })),
        )
        .await;
    store
        .put(
            USERS,
            "u-owner-1",
            fields(json!({
                "name": "Olga Owner",
                "email": "olga@bizidata.test",
                "role": "owner",
                "verified": true,
            })),
        )
        .await;
    store
        .put(
            USERS,
            "u-customer",
            fields(json!({ "name": "Casey Customer", "role": "customer" })),
        )
        .await;

    store
        .put(
            DATA_MODELS,
            "m-users",
            fields(json!({
                "name": "User",
                "description": "Platform accounts",
                "category": "core",
                "field_count": 12,
                "usage_count": 3,
            })),
        )
        .await;
    store
        .put(
            DATA_MODELS,
            "m-promo",
            fields(json!({ "name": "Promotion", "category": "extended", "field_count": 4 })),
        )
        .await;

    store
        .put(
            DOCUMENTATION,
            "d-start",
            fields(json!({
                "title": "Getting Started",
                "category": "guides",
                "content": "Welcome to BiziData. Sign in with your admin account.",
                "order": 1,
            })),
        )
        .await;
    store
        .put(
            DOCUMENTATION,
            "d-api",
            fields(json!({
                "title": "API Reference",
                "category": "reference",
                "content": "Endpoints for restaurants, users and analytics.",
                "order": 2,
            })),
        )
        .await;

    let orders = [
        ("o-1", 20.5, "r-pizza", 0),
        ("o-2", 10.0, "r-pizza", 1),
        ("o-3", 15.25, "r-sushi", 2),
    ];
    for (id, total, restaurant_id, days_ago) in orders {
        store
            .put(
                ORDERS,
                id,
                fields(json!({
                    "total": total,
                    "restaurant_id": restaurant_id,
                    "status": "delivered",
                    "created_at": timestamp_wrapper(now - Duration::days(days_ago)),
                })),
            )
            .await;
    }

    TestFixtures {
        restaurant_ids: vec!["r-pizza".into(), "r-sushi".into(), "r-bare".into()],
        driver_ids: vec!["u-driver-1".into(), "u-driver-2".into()],
        owner_id: "u-owner-1".into(),
        customer_id: "u-customer".into(),
        model_ids: vec!["m-users".into(), "m-promo".into()],
        doc_ids: vec!["d-start".into(), "d-api".into()],
        order_ids: orders.iter().map(|(id, ..)| id.to_string()).collect(),
    }
}

/// A seeded in-memory store, returned both concretely and as the shared
/// trait object services use.
pub async fn seeded_store() -> (Arc<MemoryStore>, SharedStore, TestFixtures) {
    let store = Arc::new(MemoryStore::new());
    let fixtures = seed_basic_fixtures(&store).await;
    let shared: SharedStore = store.clone();
    (store, shared, fixtures)
}
