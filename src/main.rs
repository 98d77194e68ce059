use domain::encryption::SecretCipher;
use log::*;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();

    Logger::init_logger(&config);

    info!(
        "Starting LinkedIn webhook relay ({} environment)",
        config.runtime_env()
    );

    // Fail fast on a missing or malformed encryption key rather than on the
    // first registration request
    if let Err(err) = SecretCipher::new(config.encryption_key()) {
        error!("Invalid encryption key: {err}");
        std::process::exit(1);
    }

    if config.cleanup_secret().is_none() {
        warn!("No cleanup secret configured; the retention sweep endpoint is disabled");
    }

    let database_connection = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(err) => {
            error!("Failed to connect to the database: {err}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(config, &database_connection);

    if let Err(err) = web::init_server(app_state).await {
        error!("Server error: {err}");
        std::process::exit(1);
    }
}
