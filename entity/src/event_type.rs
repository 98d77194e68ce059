use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Classification of an inbound delivery.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_type")]
pub enum EventType {
    /// A liveness/ownership-proof handshake initiated by LinkedIn
    #[sea_orm(string_value = "challenge")]
    Challenge,
    /// An actual push notification delivery
    #[sea_orm(string_value = "notification")]
    Notification,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Challenge => write!(fmt, "challenge"),
            EventType::Notification => write!(fmt, "notification"),
        }
    }
}
