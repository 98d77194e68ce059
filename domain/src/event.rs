//! Event ingestion pipeline: classifies inbound deliveries, validates
//! notification signatures, persists the results, and holds each webhook's
//! event log at its cap.

use crate::encryption::SecretCipher;
use crate::error::Error;
use crate::signature;
use entity::event_type::EventType;
use entity::validation_status::ValidationStatus;
use entity::{events, webhooks};
use entity_api::{event, webhook, Id};
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::Value;

/// Retained events per webhook. The oldest events beyond this are evicted
/// after every insert.
pub const MAX_EVENTS_PER_WEBHOOK: u64 = 50;

/// An inbound POST delivery, classified by shape rather than headers.
#[derive(Debug, PartialEq)]
pub enum InboundEvent {
    /// Body carried a top-level string `challenge` field to echo back.
    Challenge(String),
    /// Anything else is treated as a notification to validate and store.
    Notification(Value),
}

/// Classifies a parsed POST body. LinkedIn's challenge handshake is a JSON
/// object with a string `challenge` field; everything else, including bodies
/// where `challenge` is present but not a string, is a notification.
pub fn classify(body: Value) -> InboundEvent {
    match body.get("challenge").and_then(Value::as_str) {
        Some(code) => InboundEvent::Challenge(code.to_string()),
        None => InboundEvent::Notification(body),
    }
}

/// Validates and persists a notification delivery, returning the signature
/// outcome. The signature covers the raw body bytes as received, not the
/// re-serialized JSON. Persistence happens regardless of the outcome so the
/// event log shows failed deliveries too.
pub async fn ingest_notification(
    db: &DatabaseConnection,
    cipher: &SecretCipher,
    webhook: &webhooks::Model,
    headers: Value,
    raw_body: &[u8],
    payload: Value,
    signature_header: Option<&str>,
) -> Result<ValidationStatus, Error> {
    let secret = cipher.decrypt(&webhook.encrypted_secret)?;
    let status = signature::validate(raw_body, signature_header, &secret);

    debug!(
        "Notification for webhook {} validated as {status}",
        webhook.id
    );

    event::create(
        db,
        webhook.id,
        EventType::Notification,
        headers,
        payload,
        Some(status),
    )
    .await?;
    evict_overflow(db, webhook.id).await?;

    Ok(status)
}

/// Persists a challenge handshake as an event. The HTTP response has already
/// been decided by the time this runs; challenge events are bookkeeping only
/// and carry no validation status. The payload is the flow-specific challenge
/// record: `{challenge}` for the POST echo, `{challengeCode,
/// challengeResponse}` for the GET handshake.
pub async fn record_challenge(
    db: &DatabaseConnection,
    webhook_id: Id,
    headers: Value,
    payload: Value,
) -> Result<(), Error> {
    event::create(db, webhook_id, EventType::Challenge, headers, payload, None).await?;
    evict_overflow(db, webhook_id).await?;

    Ok(())
}

/// Returns a webhook's retained events, newest first. Fails with a not-found
/// error when the webhook itself does not exist, so callers can distinguish
/// an unknown webhook from an empty log.
pub async fn list_recent(db: &DatabaseConnection, webhook_id: Id) -> Result<Vec<events::Model>, Error> {
    webhook::find_by_id(db, webhook_id).await?;
    Ok(event::find_recent_by_webhook_id(db, webhook_id, MAX_EVENTS_PER_WEBHOOK).await?)
}

/// Post-insert eviction: deletes the oldest events beyond the cap. A webhook
/// can momentarily exceed the cap between the insert and this pass.
async fn evict_overflow(db: &DatabaseConnection, webhook_id: Id) -> Result<(), Error> {
    let count = event::count_by_webhook_id(db, webhook_id).await?;
    if count > MAX_EVENTS_PER_WEBHOOK {
        let excess = count - MAX_EVENTS_PER_WEBHOOK;
        let deleted = event::delete_oldest(db, webhook_id, excess).await?;
        debug!("Evicted {deleted} events for webhook {webhook_id}");
    }

    Ok(())
}
