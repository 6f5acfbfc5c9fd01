use crate::config::SimulationConfig;
use crate::db::collections::USERS;
use crate::db::{DocumentWrite, Query, SharedStore};
use crate::models::normalize_all;
use crate::models::tracking::{SimulatorStatus, TrackingEvent, TrackingEventKind};
use crate::models::user::{GeoLocation, Role, UserProfile};
use crate::utils::errors::{ErrorContext, ErrorLog, HandleOptions, HandledError};
use chrono::Utc;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use uuid::Uuid;

const COMPONENT: &str = "DriverSimulationService";

pub const DRIVER_STATUSES: [&str; 4] = ["available", "busy", "delivering", "offline"];

struct RunningTask {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

struct SimulatorInner {
    store: SharedStore,
    errors: ErrorLog,
    cfg: SimulationConfig,
    task: Mutex<Option<RunningTask>>,
    events: Mutex<VecDeque<TrackingEvent>>,
    rng: Mutex<ChaCha8Rng>,
    ticks: AtomicU64,
}

/// Periodically moves drivers around and records what changed.
#[derive(Clone)]
pub struct DriverSimulator {
    inner: Arc<SimulatorInner>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

/// Uniform in [0, 1).
fn unit(rng: &mut ChaCha8Rng) -> f64 {
    (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

struct Move {
    driver: UserProfile,
    location: GeoLocation,
    status: &'static str,
}

impl DriverSimulator {
    pub fn new(store: SharedStore, errors: ErrorLog, cfg: SimulationConfig) -> Self {
        let seed = cfg.seed.unwrap_or_else(|| Uuid::new_v4().as_u128() as u64);
        Self {
            inner: Arc::new(SimulatorInner {
                store,
                errors,
                rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
                events: Mutex::new(VecDeque::with_capacity(cfg.max_events)),
                task: Mutex::new(None),
                ticks: AtomicU64::new(0),
                cfg,
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.task)
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Spawns the tick loop. Returns false if it was already running.
    pub fn start(&self) -> bool {
        let mut task = lock(&self.inner.task);
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return false;
        }

        let stop = Arc::new(Notify::new());
        let handle = tokio::spawn(self.clone().run(stop.clone()));
        *task = Some(RunningTask { stop, handle });
        info!(
            "Driver simulation started (every {}s, up to {} drivers)",
            self.inner.cfg.interval_secs, self.inner.cfg.driver_limit
        );
        true
    }

    /// Signals the loop to exit; a tick in progress completes first.
    /// Returns false if it was not running.
    pub fn stop(&self) -> bool {
        match lock(&self.inner.task).take() {
            Some(task) if !task.handle.is_finished() => {
                task.stop.notify_one();
                true
            }
            _ => false,
        }
    }

    /// Returns whether the simulator is running afterwards.
    pub fn toggle(&self) -> bool {
        if self.is_running() {
            self.stop();
            false
        } else {
            self.start()
        }
    }

    pub fn status(&self) -> SimulatorStatus {
        SimulatorStatus {
            running: self.is_running(),
            interval_secs: self.inner.cfg.interval_secs,
            ticks: self.inner.ticks.load(Ordering::Relaxed),
            buffered_events: lock(&self.inner.events).len(),
        }
    }

    /// Most recent first.
    pub fn recent_events(&self, limit: usize) -> Vec<TrackingEvent> {
        lock(&self.inner.events)
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    async fn run(self, stop: Arc<Notify>) {
        let mut timer = interval(Duration::from_secs(self.inner.cfg.interval_secs.max(1)));
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                _ = stop.notified() => break,
                _ = timer.tick() => {}
            }
            // already recorded in the error log
            let _ = self.tick().await;
        }
        info!("Driver simulation stopped");
    }

    fn plan(&self, drivers: Vec<UserProfile>) -> Vec<Move> {
        let cfg = &self.inner.cfg;
        let mut rng = lock(&self.inner.rng);
        drivers
            .into_iter()
            .map(|driver| {
                let origin = driver.location.unwrap_or(GeoLocation {
                    lat: cfg.base_lat,
                    lng: cfg.base_lng,
                });
                let lat = origin.lat + (unit(&mut rng) * 2.0 - 1.0) * cfg.jitter_deg;
                let lng = origin.lng + (unit(&mut rng) * 2.0 - 1.0) * cfg.jitter_deg;
                let status =
                    DRIVER_STATUSES[(rng.next_u32() as usize) % DRIVER_STATUSES.len()];
                Move {
                    driver,
                    location: GeoLocation {
                        lat: round6(lat.clamp(-90.0, 90.0)),
                        lng: round6(lng.clamp(-180.0, 180.0)),
                    },
                    status,
                }
            })
            .collect()
    }

    fn push_event(&self, event: TrackingEvent) {
        let mut events = lock(&self.inner.events);
        if events.len() >= self.inner.cfg.max_events.max(1) {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Runs one simulation step and returns how many drivers were updated.
    /// Per-driver write failures are logged and skipped.
    pub async fn tick(&self) -> Result<usize, HandledError> {
        let query = Query::collection(USERS)
            .where_eq("role", Role::Driver.as_str())
            .limit(self.inner.cfg.driver_limit);
        let docs = self.inner.store.query(&query).await.map_err(|e| {
            self.inner.errors.handle(
                &e,
                &ErrorContext::new(COMPONENT, "tick"),
                HandleOptions::default().user_message("Failed to load drivers for simulation."),
            )
        })?;
        let drivers: Vec<UserProfile> = normalize_all(docs);
        self.inner.ticks.fetch_add(1, Ordering::Relaxed);

        let mut updated = 0;
        for step in self.plan(drivers) {
            let write = DocumentWrite::default()
                .set(
                    "location",
                    json!({ "lat": step.location.lat, "lng": step.location.lng }),
                )
                .set("status", step.status)
                .server_timestamp("last_seen_at");

            if let Err(e) = self
                .inner
                .store
                .update(USERS, &step.driver.id, write)
                .await
            {
                self.inner.errors.handle(
                    &e,
                    &ErrorContext::new(COMPONENT, "update_driver")
                        .with("id", step.driver.id.as_str()),
                    HandleOptions::default(),
                );
                continue;
            }

            let (kind, message) = if step.driver.status != step.status {
                (
                    TrackingEventKind::StatusChanged,
                    format!(
                        "{} is now {} (was {})",
                        step.driver.name, step.status, step.driver.status
                    ),
                )
            } else {
                (
                    TrackingEventKind::LocationUpdated,
                    format!(
                        "{} moved to {:.4}, {:.4}",
                        step.driver.name, step.location.lat, step.location.lng
                    ),
                )
            };
            self.push_event(TrackingEvent {
                id: Uuid::new_v4().to_string(),
                driver_id: step.driver.id,
                driver_name: step.driver.name,
                kind,
                message,
                location: step.location,
                status: step.status.to_string(),
                occurred_at: Utc::now(),
            });
            updated += 1;
        }

        debug!("tick: updated {} drivers", updated);
        Ok(updated)
    }
}
