use crate::{params, response, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::controller::{
    cleanup_controller, delivery_controller, event_controller, health_check_controller,
    webhook_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "LinkedIn Webhook Relay API"
        ),
        paths(
            webhook_controller::create,
            webhook_controller::index,
            webhook_controller::read,
            webhook_controller::delete,
            event_controller::index,
            delivery_controller::receive,
            delivery_controller::verify,
            cleanup_controller::cleanup,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::webhooks::Model,
                domain::events::Model,
                domain::event_type::EventType,
                domain::validation_status::ValidationStatus,
                params::webhook::CreateParams,
                response::webhook::WebhookView,
                cleanup_controller::CleanupResult,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "linkedin_webhook_relay", description = "LinkedIn Webhook Relay API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the bearer token requirement for the cleanup endpoint for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Token configured as the cleanup secret"))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(webhook_routes(app_state.clone()))
        .merge(event_routes(app_state.clone()))
        .merge(delivery_routes(app_state.clone()))
        .merge(cleanup_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhooks", post(webhook_controller::create))
        .route("/webhooks", get(webhook_controller::index))
        .route("/webhooks/:id", get(webhook_controller::read))
        .route("/webhooks/:id", delete(webhook_controller::delete))
        .with_state(app_state)
}

fn event_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhooks/:id/events", get(event_controller::index))
        .with_state(app_state)
}

/// Routes for LinkedIn deliveries (no authentication - validated by HMAC signature)
fn delivery_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/linkedin-webhook/:path", post(delivery_controller::receive))
        .route("/linkedin-webhook/:path", get(delivery_controller::verify))
        .with_state(app_state)
}

/// Routes for the retention sweep (bearer token authorized)
fn cleanup_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/cleanup", get(cleanup_controller::cleanup))
        .with_state(app_state)
}
