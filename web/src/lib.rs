//! HTTP surface of the webhook relay: the management API, the public
//! LinkedIn delivery endpoints, and the retention cleanup endpoint.

use axum::http::{header, HeaderValue, Method};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use error::{Error, Result};
pub use service::AppState;

pub(crate) mod controller;
pub mod error;
pub(crate) mod extractors;
pub(crate) mod params;
pub(crate) mod response;
pub mod router;

/// Binds the configured interface and serves the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping unparseable allowed origin: {origin}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-version"),
        ])
        .allow_origin(AllowOrigin::list(allowed_origins));

    let router = router::define_routes(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("{interface}:{port}")).await?;
    info!("Server starting... listening for connections on http://{interface}:{port}");

    axum::serve(listener, router).await
}
