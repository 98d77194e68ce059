pub use entity::{event_type, events, validation_status, webhooks, Id};

pub mod error;
pub mod event;
pub mod webhook;
