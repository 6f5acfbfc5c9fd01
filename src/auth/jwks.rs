use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("key not found for kid: {0}")]
    NotFound(String),
}

#[derive(Deserialize)]
struct Jwk {
    kid: String,
    #[serde(default)]
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

struct KeySet {
    keys: HashMap<String, DecodingKey>,
    expires_at: Instant,
}

/// Signing keys for Firebase ID tokens, refreshed when the set expires or
/// an unknown `kid` shows up.
#[derive(Clone)]
pub struct JwksCache {
    url: String,
    client: reqwest::Client,
    state: Arc<RwLock<KeySet>>,
    default_ttl: Duration,
}

impl JwksCache {
    pub fn new(url: String, default_ttl_secs: u64) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
            state: Arc::new(RwLock::new(KeySet {
                keys: HashMap::new(),
                expires_at: Instant::now(),
            })),
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }

    async fn refresh(&self) -> Result<usize, JwksError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| JwksError::Network(e.to_string()))?;

        let ttl = resp
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        let body = resp
            .text()
            .await
            .map_err(|e| JwksError::Network(e.to_string()))?;
        let set: JwkSet =
            serde_json::from_str(&body).map_err(|e| JwksError::Parse(e.to_string()))?;

        let keys: HashMap<String, DecodingKey> = set
            .keys
            .into_iter()
            .filter(|k| k.kty.is_empty() || k.kty == "RSA")
            .filter_map(|k| {
                let (n, e) = (k.n?, k.e?);
                DecodingKey::from_rsa_components(&n, &e)
                    .ok()
                    .map(|key| (k.kid, key))
            })
            .collect();

        let count = keys.len();
        let mut w = self.state.write().await;
        w.keys = keys;
        w.expires_at = Instant::now() + ttl;
        Ok(count)
    }

    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        {
            let r = self.state.read().await;
            if Instant::now() < r.expires_at {
                if let Some(key) = r.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        // A failed refresh keeps whatever keys were cached before.
        if let Err(e) = self.refresh().await {
            debug!("jwks refresh from {} failed: {}", self.url, e);
        }

        let r = self.state.read().await;
        r.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| JwksError::NotFound(kid.to_string()))
    }
}

fn parse_max_age(header: &str) -> Option<u64> {
    header
        .split(',')
        .filter_map(|part| part.trim().strip_prefix("max-age="))
        .find_map(|v| v.parse::<u64>().ok())
}
