pub mod config;
pub mod extractors;
pub mod firebase;
pub mod jwks;
pub mod middleware;
pub mod principal;

pub use config::FirebaseAuthConfig;
pub use extractors::AdminPrincipal;
pub use jwks::JwksCache;
pub use middleware::AuthLayer;
pub use principal::Principal;
