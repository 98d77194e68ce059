//! Public LinkedIn delivery endpoints.
//!
//! These handlers sit on the unauthenticated ingestion surface at
//! `/linkedin-webhook/{path}`. Challenge handshakes are answered immediately
//! and recorded on a detached task so LinkedIn's verification never waits on
//! the database; notification deliveries are validated and persisted inline.

use crate::params::webhook::ChallengeParams;
use crate::{AppState, Error};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::encryption::SecretCipher;
use domain::event as EventApi;
use domain::event::InboundEvent;
use domain::signature;
use domain::validation_status::ValidationStatus;
use domain::webhook as WebhookApi;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use log::*;

/// Header LinkedIn signs notification deliveries with.
const SIGNATURE_HEADER: &str = "x-li-signature";

/// POST a LinkedIn delivery (challenge handshake or notification)
#[utoipa::path(
    post,
    path = "/linkedin-webhook/{path}",
    params(
        ("path" = String, Path, description = "The public path of the receiving webhook")
    ),
    request_body = String,
    responses(
        (status = 200, description = "Challenge echoed, or notification accepted"),
        (status = 401, description = "Notification signature did not match (event stored regardless)"),
        (status = 404, description = "No webhook registered at this path"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn receive(
    State(app_state): State<AppState>,
    Path(webhook_path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, Error> {
    // An unparseable body is stored as an empty object; the signature check
    // runs over the raw bytes either way
    let parsed: Value = serde_json::from_slice(&body).unwrap_or_else(|err| {
        debug!("Unparseable delivery body at {webhook_path}: {err}");
        json!({})
    });

    match EventApi::classify(parsed) {
        InboundEvent::Challenge(code) => {
            // Echo first; persistence is fire-and-forget so the handshake
            // cannot time out on a slow database
            spawn_challenge_recording(
                &app_state,
                webhook_path,
                headers_to_json(&headers),
                json!({"challenge": code}),
            );

            Ok((StatusCode::OK, signature::handle_challenge(&code).to_string()).into_response())
        }
        InboundEvent::Notification(payload) => {
            let webhook =
                match WebhookApi::find_by_path(app_state.db_conn_ref(), &webhook_path).await? {
                    Some(webhook) => webhook,
                    None => {
                        debug!("Notification for unknown path: {webhook_path}");
                        return Ok(not_found());
                    }
                };

            let signature_header = headers
                .get(SIGNATURE_HEADER)
                .and_then(|value| value.to_str().ok());

            let cipher = SecretCipher::new(app_state.config.encryption_key())?;
            let status = EventApi::ingest_notification(
                app_state.db_conn_ref(),
                &cipher,
                &webhook,
                headers_to_json(&headers),
                &body,
                payload,
                signature_header,
            )
            .await?;

            if status == ValidationStatus::Invalid {
                warn!("Invalid signature on delivery to {webhook_path}");
                return Ok((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Invalid signature", "stored": true})),
                )
                    .into_response());
            }

            Ok((
                StatusCode::OK,
                Json(json!({"success": true, "message": "Event received"})),
            )
                .into_response())
        }
    }
}

/// GET the LinkedIn verification handshake, or a liveness probe
#[utoipa::path(
    get,
    path = "/linkedin-webhook/{path}",
    params(
        ("path" = String, Path, description = "The public path of the receiving webhook"),
        ChallengeParams,
    ),
    responses(
        (status = 200, description = "Challenge response pair, or liveness message when no challengeCode is given"),
        (status = 404, description = "No webhook registered at this path"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub(crate) async fn verify(
    State(app_state): State<AppState>,
    Path(webhook_path): Path<String>,
    headers: HeaderMap,
    Query(params): Query<ChallengeParams>,
) -> Result<Response, Error> {
    let challenge_code = match params.challenge_code {
        Some(code) => code,
        None => {
            return Ok((
                StatusCode::OK,
                Json(json!({"message": "Webhook endpoint active"})),
            )
                .into_response());
        }
    };

    let webhook = match WebhookApi::find_by_path(app_state.db_conn_ref(), &webhook_path).await? {
        Some(webhook) => webhook,
        None => {
            debug!("Verification for unknown path: {webhook_path}");
            return Ok(not_found());
        }
    };

    let cipher = SecretCipher::new(app_state.config.encryption_key())?;
    let secret = cipher.decrypt(&webhook.encrypted_secret)?;
    let challenge_response = signature::challenge_response(&challenge_code, &secret);

    let response_body = json!({
        "challengeCode": challenge_code,
        "challengeResponse": challenge_response,
    });

    spawn_challenge_recording(
        &app_state,
        webhook_path,
        headers_to_json(&headers),
        response_body.clone(),
    );

    Ok((StatusCode::OK, Json(response_body)).into_response())
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Webhook not found"})),
    )
        .into_response()
}

/// Records a challenge event on a detached task. Lookup failures and write
/// failures are logged, never surfaced to LinkedIn.
fn spawn_challenge_recording(
    app_state: &AppState,
    webhook_path: String,
    headers: Value,
    payload: Value,
) {
    let db = Arc::clone(&app_state.database_connection);

    tokio::spawn(async move {
        let webhook = match WebhookApi::find_by_path(db.as_ref(), &webhook_path).await {
            Ok(Some(webhook)) => webhook,
            Ok(None) => {
                debug!("Challenge for unknown path {webhook_path} not recorded");
                return;
            }
            Err(err) => {
                warn!("Failed to resolve webhook for challenge at {webhook_path}: {err:?}");
                return;
            }
        };

        if let Err(err) = EventApi::record_challenge(db.as_ref(), webhook.id, headers, payload).await
        {
            warn!("Failed to record challenge event for {webhook_path}: {err:?}");
        }
    });
}

/// Flattens request headers into a JSON object for storage with the event.
fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            map.insert(name.as_str().to_string(), Value::String(value.to_string()));
        }
    }
    Value::Object(map)
}
