use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of the HMAC signature check for a notification delivery.
///
/// A missing signature header is a distinct, expected outcome rather than a
/// failure: the event is still recorded, just tagged `no_signature`.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "validation_status")]
pub enum ValidationStatus {
    /// Signature present and matched the computed digest
    #[sea_orm(string_value = "valid")]
    Valid,
    /// Signature present but did not match
    #[sea_orm(string_value = "invalid")]
    Invalid,
    /// No signature header on the request
    #[sea_orm(string_value = "no_signature")]
    NoSignature,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Valid => write!(fmt, "valid"),
            ValidationStatus::Invalid => write!(fmt, "invalid"),
            ValidationStatus::NoSignature => write!(fmt, "no_signature"),
        }
    }
}
