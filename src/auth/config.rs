use crate::config::{flag, parse_or, required, ConfigError};
use dotenvy::var;

pub const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

#[derive(Debug, Clone)]
pub struct FirebaseAuthConfig {
    pub project_id: String,
    pub jwks_url: String,
    pub leeway_secs: u64,
    pub cache_ttl_secs: u64,
    pub require_email_verified: bool,
    pub allowed_domains: Option<Vec<String>>,
    /// Emails granted dashboard access without an `admin` custom claim.
    pub admin_emails: Vec<String>,
    /// Static token accepted as an admin identity; local development only.
    pub dev_bypass_token: Option<String>,
}

fn csv_lowercase(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl FirebaseAuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let dev_bypass_token = var("DEV_BYPASS_TOKEN").ok().filter(|t| !t.trim().is_empty());
        if dev_bypass_token.is_some() {
            warn!("DEV_BYPASS_TOKEN is set; any request carrying it is treated as an admin");
        }
        Ok(Self {
            project_id: required("FIREBASE_PROJECT_ID")?,
            jwks_url: var("FIREBASE_JWKS_URL").unwrap_or_else(|_| SECURETOKEN_JWKS_URL.to_string()),
            leeway_secs: parse_or("FIREBASE_LEEWAY_SECS", 60),
            cache_ttl_secs: parse_or("FIREBASE_JWKS_CACHE_TTL_SECS", 3600),
            require_email_verified: flag("FIREBASE_REQUIRE_EMAIL_VERIFIED", true),
            allowed_domains: var("ALLOWED_EMAIL_DOMAINS").ok().map(|v| csv_lowercase(&v)),
            admin_emails: var("ADMIN_EMAILS")
                .map(|v| csv_lowercase(&v))
                .unwrap_or_default(),
            dev_bypass_token,
        })
    }
}
