use dotenvy::var;
use std::str::FromStr;
use thiserror::Error;

use crate::auth::FirebaseAuthConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an unsupported value '{value}'")]
    Invalid { key: &'static str, value: String },
}

pub(crate) fn required(key: &'static str) -> Result<String, ConfigError> {
    var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

pub(crate) fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

pub(crate) fn flag(key: &str, default: bool) -> bool {
    var(key)
        .ok()
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub base_url: String,
    pub access_token: Option<String>,
}

impl FirestoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id =
            required("FIRESTORE_PROJECT_ID").or_else(|_| required("FIREBASE_PROJECT_ID"))?;
        let database = var("FIRESTORE_DATABASE").unwrap_or_else(|_| "(default)".to_string());

        // The emulator accepts the fixed "owner" token as an admin credential.
        if let Ok(host) = var("FIRESTORE_EMULATOR_HOST") {
            return Ok(Self {
                project_id,
                database,
                base_url: format!("http://{}/v1", host.trim()),
                access_token: Some(
                    var("FIRESTORE_ACCESS_TOKEN").unwrap_or_else(|_| "owner".to_string()),
                ),
            });
        }

        Ok(Self {
            project_id,
            database,
            base_url: var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string()),
            access_token: var("FIRESTORE_ACCESS_TOKEN").ok(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum StoreBackend {
    Memory,
    Firestore(FirestoreConfig),
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = var("STORE_BACKEND").unwrap_or_else(|_| "firestore".to_string());
        let backend = match raw.trim().to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "firestore" => StoreBackend::Firestore(FirestoreConfig::from_env()?),
            _ => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: raw,
                })
            }
        };
        Ok(Self { backend })
    }
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_key: String,
    pub bucket_name: String,
    pub upload_ttl_secs: u64,
    pub download_ttl_secs: u64,
}

impl S3Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: required("S3_ENDPOINT")?,
            region: required("S3_REGION")?,
            access_key_id: required("S3_ACCESS_KEY_ID")?,
            secret_key: required("S3_SECRET_KEY")?,
            bucket_name: required("S3_BUCKET_NAME")?,
            upload_ttl_secs: parse_or("S3_UPLOAD_URL_TTL_SECS", 5 * 60),
            // 12 hours, long enough for a dashboard session
            download_ttl_secs: parse_or("S3_DOWNLOAD_URL_TTL_SECS", 12 * 60 * 60),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub interval_secs: u64,
    pub driver_limit: usize,
    pub max_events: usize,
    pub seed: Option<u64>,
    pub base_lat: f64,
    pub base_lng: f64,
    pub jitter_deg: f64,
    /// Start the simulation loop when the server boots.
    pub autostart: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            driver_limit: 5,
            max_events: 50,
            seed: None,
            base_lat: 40.7128,
            base_lng: -74.0060,
            jitter_deg: 0.01,
            autostart: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_secs: parse_or("SIMULATION_INTERVAL_SECS", defaults.interval_secs).max(1),
            driver_limit: parse_or("SIMULATION_DRIVER_LIMIT", defaults.driver_limit),
            max_events: parse_or("SIMULATION_MAX_EVENTS", defaults.max_events).max(1),
            seed: var("SIMULATION_SEED").ok().and_then(|v| v.trim().parse().ok()),
            base_lat: parse_or("SIMULATION_BASE_LAT", defaults.base_lat),
            base_lng: parse_or("SIMULATION_BASE_LNG", defaults.base_lng),
            jitter_deg: parse_or("SIMULATION_JITTER_DEG", defaults.jitter_deg),
            autostart: flag("SIMULATION_AUTOSTART", defaults.autostart),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub s3: S3Config,
    pub auth: FirebaseAuthConfig,
    pub simulation: SimulationConfig,
    pub error_log_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            store: StoreConfig::from_env()?,
            s3: S3Config::from_env()?,
            auth: FirebaseAuthConfig::from_env()?,
            simulation: SimulationConfig::from_env(),
            error_log_capacity: parse_or("ERROR_LOG_CAPACITY", 100),
        })
    }
}
