//! Webhook registry rules: ownership quota, path allocation, and secret
//! handling around the raw entity operations.

use crate::encryption::SecretCipher;
use crate::error::{Error, ValidationErrorKind};
use crate::webhook_path;
use entity::webhooks::Model;
use entity_api::error::EntityApiErrorKind;
use entity_api::{webhook, Id};
use log::*;
use sea_orm::DatabaseConnection;

/// Each client ID may own at most this many webhooks.
pub const MAX_WEBHOOKS_PER_CLIENT: u64 = 3;

/// Collision retries when allocating a generated path.
const GENERATED_PATH_ATTEMPTS: usize = 3;

/// Inputs to webhook registration. The clear client secret passes through
/// here exactly once, on its way into the cipher; it is deliberately not
/// `Debug` so it cannot end up in logs.
pub struct CreateWebhook {
    pub client_id: String,
    pub client_secret: String,
    pub custom_path: Option<String>,
}

/// Registers a new webhook: enforces the per-client quota, allocates or
/// validates the public path, and stores the client secret encrypted.
pub async fn create(
    db: &DatabaseConnection,
    cipher: &SecretCipher,
    params: CreateWebhook,
) -> Result<Model, Error> {
    if params.client_id.trim().is_empty() {
        return Err(Error::validation(ValidationErrorKind::MissingField(
            "clientId".to_string(),
        )));
    }
    if params.client_secret.is_empty() {
        return Err(Error::validation(ValidationErrorKind::MissingField(
            "clientSecret".to_string(),
        )));
    }

    let existing = webhook::count_by_client_id(db, &params.client_id).await?;
    if existing >= MAX_WEBHOOKS_PER_CLIENT {
        return Err(Error::validation(ValidationErrorKind::QuotaExceeded));
    }

    let path = allocate_path(db, params.custom_path).await?;
    let encrypted_secret = cipher.encrypt(&params.client_secret)?;

    info!(
        "Registering webhook at path {path} for client {}",
        params.client_id
    );

    match webhook::create(db, params.client_id, encrypted_secret, path).await {
        Ok(model) => Ok(model),
        // A concurrent registration can win the path between our existence
        // check and the insert; the unique index is the arbiter.
        Err(err) if err.error_kind == EntityApiErrorKind::UniqueViolation => {
            Err(Error::validation(ValidationErrorKind::PathTaken))
        }
        Err(err) => Err(err.into()),
    }
}

async fn allocate_path(
    db: &DatabaseConnection,
    custom_path: Option<String>,
) -> Result<String, Error> {
    if let Some(path) = custom_path {
        if !webhook_path::is_valid(&path) {
            return Err(Error::validation(ValidationErrorKind::InvalidPath));
        }
        if webhook::exists_by_path(db, &path).await? {
            return Err(Error::validation(ValidationErrorKind::PathTaken));
        }
        return Ok(path);
    }

    for _ in 0..GENERATED_PATH_ATTEMPTS {
        let candidate = webhook_path::generate();
        if !webhook::exists_by_path(db, &candidate).await? {
            return Ok(candidate);
        }
        debug!("Generated path {candidate} already taken, retrying");
    }

    Err(Error::validation(ValidationErrorKind::PathTaken))
}

/// Resolves the webhook owning a public delivery path. Unknown paths are an
/// expected outcome on the ingestion surface, so this returns `None` rather
/// than an error. Deliveries do not count as registry accesses, so
/// `last_accessed_at` is left untouched.
pub async fn find_by_path(
    db: &DatabaseConnection,
    webhook_path: &str,
) -> Result<Option<Model>, Error> {
    Ok(webhook::find_by_path(db, webhook_path).await?)
}

/// Fetches a webhook by ID, recording the access for retention purposes.
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let model = webhook::find_by_id(db, id).await?;
    webhook::touch_last_accessed(db, vec![model.id]).await?;
    Ok(model)
}

/// Lists a client's webhooks newest first, recording the access for
/// retention purposes.
pub async fn list_by_client_id(db: &DatabaseConnection, client_id: &str) -> Result<Vec<Model>, Error> {
    let models = webhook::find_by_client_id(db, client_id).await?;
    let ids: Vec<Id> = models.iter().map(|model| model.id).collect();
    webhook::touch_last_accessed(db, ids).await?;
    Ok(models)
}

/// Deletes a webhook. Its event log goes with it through the FK cascade.
pub async fn delete(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    webhook::delete_by_id(db, id).await?;
    info!("Deleted webhook {id}");
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use chrono::Utc;
    use entity::webhooks;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn cipher() -> SecretCipher {
        SecretCipher::new(TEST_KEY).unwrap()
    }

    fn count_row(num_items: i64) -> BTreeMap<&'static str, Value> {
        let mut row = BTreeMap::new();
        row.insert("num_items", num_items.into());
        row
    }

    fn stored_webhook(webhook_path: &str) -> webhooks::Model {
        let now = Utc::now();
        webhooks::Model {
            id: Id::new_v4(),
            client_id: "86ir74wnzwpx0h".to_owned(),
            encrypted_secret: "bm9uY2UtY2lwaGVydGV4dA==".to_owned(),
            webhook_path: webhook_path.to_owned(),
            created_at: now.into(),
            last_accessed_at: now.into(),
        }
    }

    fn create_params(custom_path: Option<&str>) -> CreateWebhook {
        CreateWebhook {
            client_id: "86ir74wnzwpx0h".to_owned(),
            client_secret: "WPL_AP1.x7kPt3mQzR9vJwYc".to_owned(),
            custom_path: custom_path.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn create_requires_a_client_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let params = CreateWebhook {
            client_id: "  ".to_owned(),
            client_secret: "secret".to_owned(),
            custom_path: None,
        };

        let err = create(&db, &cipher(), params).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::MissingField("clientId".to_string()))
        );
    }

    #[tokio::test]
    async fn create_requires_a_client_secret() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let params = CreateWebhook {
            client_id: "86ir74wnzwpx0h".to_owned(),
            client_secret: String::new(),
            custom_path: None,
        };

        let err = create(&db, &cipher(), params).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::MissingField(
                "clientSecret".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn create_enforces_the_per_client_quota() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(3)]])
            .into_connection();

        let err = create(&db, &cipher(), create_params(None)).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::QuotaExceeded)
        );
    }

    #[tokio::test]
    async fn create_rejects_a_malformed_custom_path() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .into_connection();

        let err = create(&db, &cipher(), create_params(Some("ABC-123")))
            .await
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::InvalidPath)
        );
    }

    #[tokio::test]
    async fn create_rejects_a_taken_custom_path() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .append_query_results(vec![vec![stored_webhook("my-hook")]])
            .into_connection();

        let err = create(&db, &cipher(), create_params(Some("my-hook")))
            .await
            .unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::PathTaken)
        );
    }

    #[tokio::test]
    async fn generated_path_allocation_gives_up_after_three_collisions() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .append_query_results(vec![vec![stored_webhook("collision-1")]])
            .append_query_results(vec![vec![stored_webhook("collision-2")]])
            .append_query_results(vec![vec![stored_webhook("collision-3")]])
            .into_connection();

        let err = create(&db, &cipher(), create_params(None)).await.unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Validation(ValidationErrorKind::PathTaken)
        );
    }
}
