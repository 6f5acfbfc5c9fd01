use crate::models::user::GeoLocation;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrackingEventKind {
    LocationUpdated,
    StatusChanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TrackingEvent {
    pub id: String,
    pub driver_id: String,
    pub driver_name: String,
    pub kind: TrackingEventKind,
    pub message: String,
    pub location: GeoLocation,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SimulatorStatus {
    pub running: bool,
    pub interval_secs: u64,
    pub ticks: u64,
    pub buffered_events: usize,
}
