use super::error::Error;
use chrono::Utc;
use entity::{event_type::EventType, events::*, validation_status::ValidationStatus, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, QuerySelect,
};

use log::*;

/// Events are immutable: this is the only write path besides bulk deletion.
pub async fn create(
    db: &DatabaseConnection,
    webhook_id: Id,
    event_type: EventType,
    headers: serde_json::Value,
    payload: serde_json::Value,
    validation_status: Option<ValidationStatus>,
) -> Result<Model, Error> {
    debug!("New {event_type} event to be inserted for webhook {webhook_id}");

    let event_active_model: ActiveModel = ActiveModel {
        webhook_id: Set(webhook_id),
        event_type: Set(event_type),
        headers: Set(headers),
        payload: Set(payload),
        received_at: Set(Utc::now().into()),
        validation_status: Set(validation_status),
        ..Default::default()
    };

    Ok(event_active_model.insert(db).await?)
}

pub async fn find_recent_by_webhook_id(
    db: &DatabaseConnection,
    webhook_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::WebhookId.eq(webhook_id))
        .order_by_desc(Column::ReceivedAt)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn count_by_webhook_id(db: &DatabaseConnection, webhook_id: Id) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::WebhookId.eq(webhook_id))
        .count(db)
        .await?)
}

/// Delete the `excess` oldest events (by `received_at` ascending) for a
/// webhook. Used by the post-insert eviction pass to hold the per-webhook
/// event log at its cap.
pub async fn delete_oldest(
    db: &DatabaseConnection,
    webhook_id: Id,
    excess: u64,
) -> Result<u64, Error> {
    let oldest_ids: Vec<Id> = Entity::find()
        .filter(Column::WebhookId.eq(webhook_id))
        .order_by_asc(Column::ReceivedAt)
        .limit(excess)
        .all(db)
        .await?
        .into_iter()
        .map(|event| event.id)
        .collect();

    if oldest_ids.is_empty() {
        return Ok(0);
    }

    let result = Entity::delete_many()
        .filter(Column::Id.is_in(oldest_ids))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
