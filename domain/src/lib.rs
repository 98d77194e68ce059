//! Business rules for the webhook relay: secret encryption, LinkedIn
//! signature validation, path allocation, the webhook registry, the event
//! ingestion pipeline, and the idle-webhook retention sweep.
//!
//! This crate re-exports the entity types consumers need so that the `web`
//! layer does not depend on `entity`/`entity_api` directly.

// Re-exports from the `entity` crate via `entity_api`
pub use entity_api::{event_type, events, validation_status, webhooks, Id};

pub mod encryption;
pub mod error;
pub mod event;
pub mod retention;
pub mod signature;
pub mod webhook;
pub mod webhook_path;
