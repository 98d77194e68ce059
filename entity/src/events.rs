use crate::event_type::EventType;
use crate::validation_status::ValidationStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One recorded inbound delivery for a webhook, either a challenge handshake
/// or a notification, with its raw headers/payload and validation outcome.
/// Events are immutable once written; they are only ever inserted, evicted in
/// bulk when a webhook's log exceeds its cap, or cascade-deleted with the
/// owning webhook.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(schema_name = "webhook_relay", table_name = "events")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[schema(value_type = Uuid)]
    pub webhook_id: Id,
    pub event_type: EventType,
    /// Inbound request headers captured verbatim as a JSON object.
    #[schema(value_type = Object)]
    pub headers: Json,
    /// Parsed JSON request body, or the challenge code/response pair for
    /// GET challenge deliveries.
    #[schema(value_type = Object)]
    pub payload: Json,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub received_at: DateTimeWithTimeZone,
    /// Tri-state signature outcome. `None` for challenge events.
    pub validation_status: Option<ValidationStatus>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::webhooks::Entity",
        from = "Column::WebhookId",
        to = "super::webhooks::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Webhooks,
}

impl Related<super::webhooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Webhooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
