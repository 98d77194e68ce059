//! Webhook response DTOs.
//!
//! Registry responses carry the full public URL for each webhook so callers
//! can paste it straight into the LinkedIn developer console. The URL is
//! derived from the configured base URL at response time rather than stored.

use domain::webhooks::Model as WebhookModel;
use serde::Serialize;
use utoipa::ToSchema;

/// A stored webhook enriched with its public delivery URL. The encrypted
/// secret is skipped by the model's own serialization.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookView {
    #[serde(flatten)]
    pub webhook: WebhookModel,

    /// Full URL LinkedIn should deliver to
    pub webhook_url: String,
}

impl WebhookView {
    pub fn from_model(webhook: WebhookModel, base_url: &str) -> Self {
        let webhook_url = format!("{base_url}/linkedin-webhook/{}", webhook.webhook_path);
        Self {
            webhook,
            webhook_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::Id;

    fn model() -> WebhookModel {
        let now = Utc::now();
        WebhookModel {
            id: Id::new_v4(),
            client_id: "86ir74wnzwpx0h".to_owned(),
            encrypted_secret: "bm9uY2UtY2lwaGVydGV4dA==".to_owned(),
            webhook_path: "dancing-penguin-42".to_owned(),
            created_at: now.into(),
            last_accessed_at: now.into(),
        }
    }

    #[test]
    fn view_builds_the_public_delivery_url() {
        let view = WebhookView::from_model(model(), "https://relay.example.com");
        assert_eq!(
            view.webhook_url,
            "https://relay.example.com/linkedin-webhook/dancing-penguin-42"
        );
    }

    #[test]
    fn serialized_view_never_contains_the_encrypted_secret() {
        let view = WebhookView::from_model(model(), "https://relay.example.com");
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("encrypted_secret").is_none());
        assert!(json.get("webhook_url").is_some());
    }
}
