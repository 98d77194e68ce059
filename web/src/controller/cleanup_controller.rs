//! Bearer-token protected retention sweep trigger, intended to be called by
//! an external scheduler.

use crate::{controller::ApiResponse, AppState, Error};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use domain::error::Error as DomainError;
use domain::retention as RetentionApi;
use serde::Serialize;
use utoipa::ToSchema;

use log::*;

/// Outcome of a retention sweep run.
#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResult {
    /// Number of idle webhooks deleted, with their events
    pub deleted: u64,
}

/// GET trigger the idle-webhook retention sweep
#[utoipa::path(
    get,
    path = "/cleanup",
    responses(
        (status = 200, description = "Sweep completed", body = CleanupResult),
        (status = 401, description = "Missing or incorrect bearer token, or no token configured"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub(crate) async fn cleanup(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    // Fail closed: with no configured token nobody can trigger the sweep
    let expected = match app_state.config.cleanup_secret() {
        Some(secret) => secret,
        None => {
            warn!("Cleanup endpoint called but no cleanup secret is configured");
            return Err(DomainError::unauthorized().into());
        }
    };

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);

    if !authorized {
        warn!("Cleanup endpoint called with a missing or incorrect bearer token");
        return Err(DomainError::unauthorized().into());
    }

    let deleted = RetentionApi::sweep(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        CleanupResult { deleted },
    )))
}
