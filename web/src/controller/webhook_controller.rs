//! Management API for registered webhooks.

use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::webhook::{CreateParams, IndexParams};
use crate::response::webhook::WebhookView;
use crate::{controller::ApiResponse, AppState, Error};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::encryption::SecretCipher;
use domain::webhook as WebhookApi;
use domain::webhook::CreateWebhook;
use domain::Id;
use service::config::ApiVersion;

use log::*;

/// CREATE a Webhook
#[utoipa::path(
    post,
    path = "/webhooks",
    params(
        ApiVersion,
    ),
    request_body = crate::params::webhook::CreateParams,
    responses(
        (status = 201, description = "Webhook created successfully", body = WebhookView),
        (status = 400, description = "Quota exceeded, invalid custom path, or path already taken"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    let cipher = SecretCipher::new(app_state.config.encryption_key())?;
    let webhook = WebhookApi::create(
        app_state.db_conn_ref(),
        &cipher,
        CreateWebhook {
            client_id: params.client_id,
            client_secret: params.client_secret,
            custom_path: params.custom_path,
        },
    )
    .await?;

    info!(
        "Webhook {} created at path {}",
        webhook.id, webhook.webhook_path
    );

    let view = WebhookView::from_model(webhook, app_state.config.base_url());
    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), view)))
}

/// INDEX all Webhooks owned by a client ID
#[utoipa::path(
    get,
    path = "/webhooks",
    params(
        ApiVersion,
        IndexParams,
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Webhooks for the client", body = [WebhookView]),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    let webhooks = WebhookApi::list_by_client_id(app_state.db_conn_ref(), &params.client_id).await?;

    let views: Vec<WebhookView> = webhooks
        .into_iter()
        .map(|webhook| WebhookView::from_model(webhook, app_state.config.base_url()))
        .collect();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), views)))
}

/// GET a Webhook by its ID
#[utoipa::path(
    get,
    path = "/webhooks/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "The ID of the webhook to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Webhook", body = WebhookView),
        (status = 404, description = "Webhook not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let webhook = WebhookApi::find_by_id(app_state.db_conn_ref(), id).await?;

    let view = WebhookView::from_model(webhook, app_state.config.base_url());
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), view)))
}

/// DELETE a Webhook by its ID
#[utoipa::path(
    delete,
    path = "/webhooks/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "The ID of the webhook to delete")
    ),
    responses(
        (status = 200, description = "Webhook deleted successfully"),
        (status = 404, description = "Webhook not found"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("Deleting webhook: {id}");
    WebhookApi::delete(app_state.db_conn_ref(), id).await?;
    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
