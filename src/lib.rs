#[macro_use]
extern crate log;

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod enums;
pub mod models;
pub mod services;
pub mod test_utils;
pub mod traits;
pub mod utils;

use crate::auth::{AuthLayer, FirebaseAuthConfig, JwksCache};
use crate::config::{AppConfig, ConfigError, SimulationConfig};
use crate::db::{establish_store, AssetOperations, S3Error, SharedStore, StoreError};
use crate::services::{
    AnalyticsOperations, DataModelOperations, DocumentationOperations, DriverSimulator,
    RestaurantOperations, UserOperations,
};
use crate::utils::errors::ErrorLog;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use utoipa::OpenApi;
use utoipa_actix_web::AppExt;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("document store error: {0}")]
    Store(#[from] StoreError),
    #[error("object storage error: {0}")]
    Storage(#[from] S3Error),
}

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub errors: ErrorLog,
    pub restaurant_ops: RestaurantOperations,
    pub user_ops: UserOperations,
    pub model_ops: DataModelOperations,
    pub doc_ops: DocumentationOperations,
    pub analytics_ops: AnalyticsOperations,
    pub simulator: DriverSimulator,
    pub auth: FirebaseAuthConfig,
    pub jwks: JwksCache,
}

impl AppState {
    pub async fn new(cfg: &AppConfig) -> Result<Self, StartupError> {
        let store = establish_store(&cfg.store)?;
        let assets = AssetOperations::new(&cfg.s3).await?;
        Ok(Self::from_parts(
            store,
            assets,
            cfg.auth.clone(),
            cfg.simulation.clone(),
            ErrorLog::new(cfg.error_log_capacity),
        ))
    }

    pub fn from_parts(
        store: SharedStore,
        assets: AssetOperations,
        auth: FirebaseAuthConfig,
        simulation: SimulationConfig,
        errors: ErrorLog,
    ) -> Self {
        let jwks = JwksCache::new(auth.jwks_url.clone(), auth.cache_ttl_secs);
        AppState {
            restaurant_ops: RestaurantOperations::new(
                store.clone(),
                assets.clone(),
                errors.clone(),
            ),
            user_ops: UserOperations::new(store.clone(), assets, errors.clone()),
            model_ops: DataModelOperations::new(store.clone(), errors.clone()),
            doc_ops: DocumentationOperations::new(store.clone(), errors.clone()),
            analytics_ops: AnalyticsOperations::new(store.clone(), errors.clone()),
            simulator: DriverSimulator::new(store.clone(), errors.clone(), simulation),
            store,
            errors,
            auth,
            jwks,
        }
    }
}

/// The full application: every API scope behind the auth layer, plus the
/// generated OpenAPI document.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let (app, openapi) = App::new()
        .into_utoipa_app()
        .openapi(api::ApiDoc::openapi())
        .configure(|cfg| api::configure(cfg, &state))
        .split_for_parts();

    app.app_data(web::JsonConfig::default().error_handler(api::default_error_handler))
        .app_data(web::Data::new(openapi))
        .app_data(web::Data::new(state.clone()))
        .service(api::openapi_json)
        .wrap(AuthLayer::new(
            state.auth.clone(),
            state.jwks.clone(),
            state.errors.clone(),
        ))
}
