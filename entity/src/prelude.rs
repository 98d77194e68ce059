pub use super::events::Entity as Events;
pub use super::webhooks::Entity as Webhooks;
