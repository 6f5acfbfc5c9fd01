use bizidata_admin::db::{Direction, DocumentStore, DocumentWrite, MemoryStore, Query};
use bizidata_admin::utils::format::timestamp_wrapper;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

fn fields(value: Value) -> bizidata_admin::db::Fields {
    value.as_object().cloned().unwrap_or_default()
}

async fn store_with_orders() -> MemoryStore {
    let store = MemoryStore::new();
    let now = Utc::now();
    store
        .put(
            "orders",
            "a",
            fields(json!({
                "status": "delivered",
                "total": 5,
                "created_at": timestamp_wrapper(now - Duration::hours(3))
            })),
        )
        .await;
    store
        .put(
            "orders",
            "b",
            fields(json!({
                "status": "pending",
                "total": 7.5,
                "created_at": timestamp_wrapper(now)
            })),
        )
        .await;
    store
        .put(
            "orders",
            "c",
            fields(json!({ "status": "delivered", "total": 5.0 })),
        )
        .await;
    store
}

#[actix_rt::test]
async fn equality_filters_never_match_missing_fields() {
    let store = store_with_orders().await;

    let delivered = store
        .query(&Query::collection("orders").where_eq("status", "delivered"))
        .await
        .expect("query");
    let ids: Vec<&str> = delivered.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);

    // integers and floats compare numerically
    let fives = store
        .query(&Query::collection("orders").where_eq("total", 5.0))
        .await
        .expect("query");
    assert_eq!(fives.len(), 2);

    let none = store
        .query(&Query::collection("orders").where_eq("restaurant_id", "r-1"))
        .await
        .expect("query");
    assert!(none.is_empty());
}

#[actix_rt::test]
async fn ordered_query_skips_documents_without_the_field() {
    let store = store_with_orders().await;

    let newest = store
        .query(
            &Query::collection("orders")
                .order_by("created_at", Direction::Descending)
                .limit(5),
        )
        .await
        .expect("query");
    let ids: Vec<&str> = newest.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);

    let oldest = store
        .query(
            &Query::collection("orders")
                .order_by("created_at", Direction::Ascending)
                .limit(1),
        )
        .await
        .expect("query");
    assert_eq!(oldest[0].id, "a");
}

#[actix_rt::test]
async fn unknown_collection_is_empty() {
    let store = MemoryStore::new();
    let docs = store
        .query(&Query::collection("nothing"))
        .await
        .expect("query");
    assert!(docs.is_empty());
    assert!(store.get("nothing", "x").await.expect("get").is_none());
}

#[actix_rt::test]
async fn create_applies_transforms() {
    let store = MemoryStore::new();
    let id = store
        .create(
            "data_models",
            DocumentWrite::default()
                .set("name", "Menu")
                .increment("usage_count", 2)
                .server_timestamp("created_at"),
        )
        .await
        .expect("create");

    let doc = store
        .get("data_models", &id)
        .await
        .expect("get")
        .expect("created");
    assert_eq!(doc.fields["name"], "Menu");
    assert_eq!(doc.fields["usage_count"], 2);
    assert!(doc.fields["created_at"]["seconds"].is_i64());
    assert_eq!(store.count("data_models").await, 1);
}

#[actix_rt::test]
async fn update_merges_and_increments() {
    let store = MemoryStore::new();
    store
        .put(
            "data_models",
            "m",
            fields(json!({ "name": "Menu", "usage_count": 1, "field_count": 3 })),
        )
        .await;

    store
        .update(
            "data_models",
            "m",
            DocumentWrite::default()
                .set("field_count", 4)
                .increment("usage_count", 1),
        )
        .await
        .expect("update");

    let doc = store.get("data_models", "m").await.expect("get").expect("doc");
    assert_eq!(doc.fields["name"], "Menu");
    assert_eq!(doc.fields["field_count"], 4);
    assert_eq!(doc.fields["usage_count"], 2);
}

#[actix_rt::test]
async fn update_and_delete_of_missing_document_are_not_found() {
    let store = MemoryStore::new();

    let err = store
        .update("users", "ghost", DocumentWrite::default().set("verified", true))
        .await
        .err()
        .expect("update should fail");
    assert!(err.is_not_found(), "got {:?}", err);
    // a failed update must not create the document
    assert!(store.get("users", "ghost").await.expect("get").is_none());

    let err = store
        .delete("users", "ghost")
        .await
        .err()
        .expect("delete should fail");
    assert!(err.is_not_found(), "got {:?}", err);
}

#[actix_rt::test]
async fn delete_removes_document() {
    let store = store_with_orders().await;
    store.delete("orders", "a").await.expect("delete");
    assert_eq!(store.count("orders").await, 2);
    assert!(store.get("orders", "a").await.expect("get").is_none());
}
