use bizidata_admin::config::SimulationConfig;
use bizidata_admin::db::collections::USERS;
use bizidata_admin::db::{DocumentStore, MemoryStore, SharedStore, StoreError};
use bizidata_admin::models::tracking::TrackingEventKind;
use bizidata_admin::models::user::UserProfile;
use bizidata_admin::models::{normalize, normalize_all};
use bizidata_admin::services::tracking::DRIVER_STATUSES;
use bizidata_admin::services::DriverSimulator;
use bizidata_admin::test_utils::{seeded_store, test_simulation_config};
use bizidata_admin::utils::errors::ErrorLog;
use std::sync::Arc;
use std::time::Duration;

async fn driver(store: &MemoryStore, id: &str) -> UserProfile {
    normalize(
        store
            .get(USERS, id)
            .await
            .expect("get")
            .expect("driver exists"),
    )
}

#[actix_rt::test]
async fn tick_moves_every_driver_within_jitter() {
    let (memory, store, fixtures) = seeded_store().await;
    let cfg = test_simulation_config();
    let simulator = DriverSimulator::new(store, ErrorLog::default(), cfg.clone());

    let updated = simulator.tick().await.expect("tick");
    assert_eq!(updated, fixtures.driver_ids.len());

    let dana = driver(&memory, "u-driver-1").await;
    let at = dana.location.expect("location");
    assert!((at.lat - 40.71).abs() <= cfg.jitter_deg + 1e-6);
    assert!((at.lng + 74.0).abs() <= cfg.jitter_deg + 1e-6);
    assert!(DRIVER_STATUSES.contains(&dana.status.as_str()));
    assert!(dana.last_seen_at.is_some());

    // no stored location: starts from the base coordinates
    let eli = driver(&memory, "u-driver-2").await;
    let at = eli.location.expect("location");
    assert!((at.lat - cfg.base_lat).abs() <= cfg.jitter_deg + 1e-6);
    assert!((at.lng - cfg.base_lng).abs() <= cfg.jitter_deg + 1e-6);

    // customers and owners are never touched
    let owner = driver(&memory, "u-owner-1").await;
    assert!(owner.location.is_none());
    assert_eq!(simulator.status().ticks, 1);
}

#[actix_rt::test]
async fn same_seed_gives_same_moves() {
    let (first_store, first, _) = seeded_store().await;
    let (second_store, second, _) = seeded_store().await;
    let cfg = test_simulation_config();

    DriverSimulator::new(first, ErrorLog::default(), cfg.clone())
        .tick()
        .await
        .expect("tick");
    DriverSimulator::new(second, ErrorLog::default(), cfg)
        .tick()
        .await
        .expect("tick");

    for id in ["u-driver-1", "u-driver-2"] {
        let a = driver(&first_store, id).await;
        let b = driver(&second_store, id).await;
        assert_eq!(a.location, b.location, "{id}");
        assert_eq!(a.status, b.status, "{id}");
    }
}

#[actix_rt::test]
async fn events_are_bounded_and_newest_first() {
    let (_, store, _) = seeded_store().await;
    let cfg = SimulationConfig {
        max_events: 3,
        ..test_simulation_config()
    };
    let simulator = DriverSimulator::new(store, ErrorLog::default(), cfg);

    for _ in 0..3 {
        simulator.tick().await.expect("tick");
    }

    let status = simulator.status();
    assert_eq!(status.ticks, 3);
    assert_eq!(status.buffered_events, 3);

    let events = simulator.recent_events(10);
    assert_eq!(events.len(), 3);
    assert!(events
        .windows(2)
        .all(|pair| pair[0].occurred_at >= pair[1].occurred_at));
    for event in &events {
        match event.kind {
            TrackingEventKind::StatusChanged => assert!(event.message.contains("is now")),
            TrackingEventKind::LocationUpdated => assert!(event.message.contains("moved to")),
        }
    }
    assert_eq!(simulator.recent_events(1).len(), 1);
}

#[actix_rt::test]
async fn driver_limit_caps_each_tick() {
    let (memory, store, _) = seeded_store().await;
    let cfg = SimulationConfig {
        driver_limit: 1,
        ..test_simulation_config()
    };
    let simulator = DriverSimulator::new(store, ErrorLog::default(), cfg);

    assert_eq!(simulator.tick().await.expect("tick"), 1);
    let drivers: Vec<UserProfile> = normalize_all(
        memory
            .query(&bizidata_admin::db::Query::collection(USERS).where_eq("role", "driver"))
            .await
            .expect("query"),
    );
    let moved = drivers.iter().filter(|d| d.last_seen_at.is_some()).count();
    assert_eq!(moved, 1);
}

#[actix_rt::test]
async fn tick_without_drivers_does_nothing() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let simulator = DriverSimulator::new(store, ErrorLog::default(), test_simulation_config());
    assert_eq!(simulator.tick().await.expect("tick"), 0);
    assert!(simulator.recent_events(5).is_empty());
}

#[actix_rt::test]
async fn failed_driver_query_is_logged() {
    struct Offline;

    #[async_trait::async_trait]
    impl DocumentStore for Offline {
        fn backend_tag(&self) -> &'static str {
            "offline"
        }
        async fn get(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Option<bizidata_admin::db::Document>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn query(
            &self,
            _: &bizidata_admin::db::Query,
        ) -> Result<Vec<bizidata_admin::db::Document>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn create(
            &self,
            _: &str,
            _: bizidata_admin::db::DocumentWrite,
        ) -> Result<String, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn update(
            &self,
            _: &str,
            _: &str,
            _: bizidata_admin::db::DocumentWrite,
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    let errors = ErrorLog::default();
    let simulator =
        DriverSimulator::new(Arc::new(Offline), errors.clone(), test_simulation_config());
    let err = simulator.tick().await.err().expect("should fail");
    assert_eq!(err.context.action, "tick");
    assert_eq!(errors.len(), 1);
    assert_eq!(simulator.status().ticks, 0);
}

#[actix_rt::test]
async fn background_loop_ticks_until_stopped() {
    let (_, store, _) = seeded_store().await;
    let simulator = DriverSimulator::new(store, ErrorLog::default(), test_simulation_config());

    assert!(simulator.start());
    assert!(!simulator.start());
    assert!(simulator.is_running());

    // the first interval tick fires immediately
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(simulator.status().ticks >= 1);

    assert!(simulator.stop());
    assert!(!simulator.is_running());
    assert!(!simulator.stop());

    let ticks = simulator.status().ticks;
    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(simulator.status().ticks, ticks);
}

#[actix_rt::test]
async fn toggle_starts_then_stops() {
    let (_, store, _) = seeded_store().await;
    let simulator = DriverSimulator::new(store, ErrorLog::default(), test_simulation_config());

    assert!(simulator.toggle());
    assert!(simulator.status().running);
    assert!(!simulator.toggle());
    assert!(!simulator.status().running);
}

/// Memory store whose queries take longer than one simulator interval.
struct SlowStore {
    inner: Arc<MemoryStore>,
    delay: Duration,
}

#[async_trait::async_trait]
impl DocumentStore for SlowStore {
    fn backend_tag(&self) -> &'static str {
        "slow"
    }
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<bizidata_admin::db::Document>, StoreError> {
        self.inner.get(collection, id).await
    }
    async fn query(
        &self,
        query: &bizidata_admin::db::Query,
    ) -> Result<Vec<bizidata_admin::db::Document>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.query(query).await
    }
    async fn create(
        &self,
        collection: &str,
        write: bizidata_admin::db::DocumentWrite,
    ) -> Result<String, StoreError> {
        self.inner.create(collection, write).await
    }
    async fn update(
        &self,
        collection: &str,
        id: &str,
        write: bizidata_admin::db::DocumentWrite,
    ) -> Result<(), StoreError> {
        self.inner.update(collection, id, write).await
    }
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }
}

#[actix_rt::test]
async fn stop_during_slow_tick_runs_no_further_ticks() {
    let (memory, _, _) = seeded_store().await;
    let store: SharedStore = Arc::new(SlowStore {
        inner: memory,
        delay: Duration::from_millis(1500),
    });
    let simulator = DriverSimulator::new(store, ErrorLog::default(), test_simulation_config());

    assert!(simulator.start());
    // the first tick is still waiting on its query
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(simulator.stop());

    // the in-flight tick finishes at ~1.5s, by then the next one is also due
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(simulator.status().ticks, 1);
}
