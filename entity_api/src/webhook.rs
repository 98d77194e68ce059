use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::{webhooks::*, Id};
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveValue::Set, DatabaseConnection, QueryOrder,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    client_id: String,
    encrypted_secret: String,
    webhook_path: String,
) -> Result<Model, Error> {
    debug!("New webhook to be inserted at path: {webhook_path}");

    let now = Utc::now();

    let webhook_active_model: ActiveModel = ActiveModel {
        client_id: Set(client_id),
        encrypted_secret: Set(encrypted_secret),
        webhook_path: Set(webhook_path),
        created_at: Set(now.into()),
        last_accessed_at: Set(now.into()),
        ..Default::default()
    };

    Ok(webhook_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Resolve the webhook owning a public path. Unknown paths are an expected
/// outcome on the ingestion surface, so this returns `None` rather than an error.
pub async fn find_by_path(
    db: &DatabaseConnection,
    webhook_path: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::WebhookPath.eq(webhook_path))
        .one(db)
        .await?)
}

pub async fn find_by_client_id(
    db: &DatabaseConnection,
    client_id: &str,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn count_by_client_id(db: &DatabaseConnection, client_id: &str) -> Result<u64, Error> {
    Ok(Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .count(db)
        .await?)
}

pub async fn exists_by_path(db: &DatabaseConnection, webhook_path: &str) -> Result<bool, Error> {
    Ok(find_by_path(db, webhook_path).await?.is_some())
}

/// Record that the given webhooks were read through the registry. Drives the
/// idle-webhook retention sweep.
pub async fn touch_last_accessed(db: &DatabaseConnection, ids: Vec<Id>) -> Result<(), Error> {
    if ids.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    Entity::update_many()
        .col_expr(Column::LastAccessedAt, Expr::value(now))
        .filter(Column::Id.is_in(ids))
        .exec(db)
        .await?;

    Ok(())
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let webhook_model = find_by_id(db, id).await?;
    webhook_model.delete(db).await?;
    Ok(())
}

/// Delete every webhook whose `last_accessed_at` is older than `threshold`,
/// returning the number of rows removed. Events go with them via the FK cascade.
pub async fn delete_last_accessed_before(
    db: &DatabaseConnection,
    threshold: DateTimeWithTimeZone,
) -> Result<u64, Error> {
    let result = Entity::delete_many()
        .filter(Column::LastAccessedAt.lt(threshold))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::webhooks;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn webhook_with_path(webhook_path: &str) -> webhooks::Model {
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

    #[tokio::test]
    async fn find_by_path_returns_the_matching_record() -> Result<(), Error> {
        let webhook = webhook_with_path("dancing-penguin-42");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![webhook.clone()]])
            .into_connection();

        assert_eq!(
            find_by_path(&db, "dancing-penguin-42").await?,
            Some(webhook)
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_by_path_returns_none_when_absent() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<webhooks::Model>::new()])
            .into_connection();

        assert_eq!(find_by_path(&db, "missing-path-1").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_client_id_orders_newest_first() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<webhooks::Model>::new()])
            .into_connection();

        let _ = find_by_client_id(&db, "86ir74wnzwpx0h").await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "webhooks"."id", "webhooks"."client_id", "webhooks"."encrypted_secret", "webhooks"."webhook_path", "webhooks"."created_at", "webhooks"."last_accessed_at" FROM "webhook_relay"."webhooks" WHERE "webhooks"."client_id" = $1 ORDER BY "webhooks"."created_at" DESC"#,
                ["86ir74wnzwpx0h".into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_last_accessed_before_reports_rows_affected() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();

        let deleted = delete_last_accessed_before(&db, Utc::now().into()).await?;
        assert_eq!(deleted, 3);

        Ok(())
    }

    #[tokio::test]
    async fn touch_last_accessed_with_no_ids_issues_no_queries() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        touch_last_accessed(&db, Vec::new()).await?;

        assert_eq!(db.into_transaction_log(), Vec::<Transaction>::new());

        Ok(())
    }
}
