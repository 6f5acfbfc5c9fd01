#[macro_use]
extern crate log;
extern crate pretty_env_logger;

use actix_web::HttpServer;
use bizidata_admin::config::AppConfig;
use bizidata_admin::{build_app, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = dotenv() {
        eprintln!("Failed to load .env file: {}", e);
    }

    // Setup logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let cfg = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    info!("Initializing application state...");
    let state = AppState::new(&cfg).await.map_err(|e| {
        error!("Startup failed: {}", e);
        std::io::Error::other(e)
    })?;

    if cfg.simulation.autostart {
        state.simulator.start();
    }

    info!("Starting server at http://{}:{}", cfg.host, cfg.port);

    let server_state = state.clone();
    let result = HttpServer::new(move || build_app(server_state.clone()))
        .bind((cfg.host.as_str(), cfg.port))?
        .run()
        .await;

    state.simulator.stop();
    result
}
