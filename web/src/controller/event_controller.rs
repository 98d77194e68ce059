//! Read access to the per-webhook event log.

use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{controller::ApiResponse, AppState, Error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::event as EventApi;
use domain::Id;
use service::config::ApiVersion;

/// INDEX the retained events for a Webhook, newest first
#[utoipa::path(
    get,
    path = "/webhooks/{id}/events",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "The ID of the webhook whose events to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the retained events", body = [domain::events::Model]),
        (status = 404, description = "Webhook not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let events = EventApi::list_recent(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), events)))
}
