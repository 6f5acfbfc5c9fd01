use crate::auth::config::FirebaseAuthConfig;
use crate::auth::jwks::JwksCache;
use crate::auth::principal::Principal;
use crate::utils::errors::{Category, Classify, Severity};
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum FirebaseAuthError {
    #[error("token header error: {0}")]
    Header(String),
    #[error("jwks error: {0}")]
    Jwks(String),
    #[error("verification error: {0}")]
    Verify(String),
    #[error("claim mismatch: {0}")]
    Claim(String),
    #[error("not an administrator: {0}")]
    Forbidden(String),
}

impl Classify for FirebaseAuthError {
    fn category(&self) -> Category {
        Category::Auth
    }

    fn severity(&self) -> Severity {
        match self {
            FirebaseAuthError::Forbidden(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Deserialize, Debug)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    #[serde(default)]
    admin: bool,
    role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VerifiedFirebaseUser {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub display_name: Option<String>,
    pub admin_claim: bool,
}

pub async fn verify_firebase_token(
    token: &str,
    cfg: &FirebaseAuthConfig,
    cache: &JwksCache,
) -> Result<VerifiedFirebaseUser, FirebaseAuthError> {
    let header = decode_header(token).map_err(|e| FirebaseAuthError::Header(e.to_string()))?;
    let kid = header
        .kid
        .ok_or_else(|| FirebaseAuthError::Header("kid missing".to_string()))?;
    if header.alg != Algorithm::RS256 {
        return Err(FirebaseAuthError::Claim("alg must be RS256".to_string()));
    }

    let key = cache
        .get_key(&kid)
        .await
        .map_err(|e| FirebaseAuthError::Jwks(e.to_string()))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[cfg.project_id.as_str()]);
    validation.set_issuer(&[&format!(
        "https://securetoken.google.com/{}",
        cfg.project_id
    )]);
    validation.leeway = cfg.leeway_secs;

    let claims = decode::<FirebaseClaims>(token, &key, &validation)
        .map_err(|e| FirebaseAuthError::Verify(e.to_string()))?
        .claims;

    if cfg.require_email_verified && !claims.email_verified {
        return Err(FirebaseAuthError::Claim("email not verified".to_string()));
    }

    if let (Some(domains), Some(email)) = (&cfg.allowed_domains, &claims.email) {
        let domain = email.split('@').nth(1).unwrap_or("").to_lowercase();
        if !domains.iter().any(|d| d == &domain) {
            return Err(FirebaseAuthError::Claim(
                "email domain not allowed".to_string(),
            ));
        }
    }

    let admin_claim = claims.admin || claims.role.as_deref() == Some("admin");
    Ok(VerifiedFirebaseUser {
        uid: claims.sub,
        email: claims.email,
        email_verified: claims.email_verified,
        display_name: claims.name,
        admin_claim,
    })
}

/// Dashboard access needs the `admin` custom claim or an allow-listed email.
pub fn authorize_admin(
    user: VerifiedFirebaseUser,
    cfg: &FirebaseAuthConfig,
) -> Result<Principal, FirebaseAuthError> {
    let listed = user
        .email
        .as_deref()
        .map(|e| cfg.admin_emails.iter().any(|a| a == &e.to_lowercase()))
        .unwrap_or(false);

    if !(user.admin_claim || listed) {
        return Err(FirebaseAuthError::Forbidden(user.uid));
    }
    Ok(Principal {
        uid: user.uid,
        email: user.email,
        display_name: user.display_name,
    })
}
