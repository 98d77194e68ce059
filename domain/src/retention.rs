//! Retention sweep for idle webhooks.

use crate::error::Error;
use chrono::{Duration, Utc};
use entity_api::webhook;
use log::*;
use sea_orm::DatabaseConnection;

/// Webhooks unread for this many days are deleted by the sweep.
pub const RETENTION_DAYS: i64 = 30;

/// Deletes every webhook whose `last_accessed_at` is older than the retention
/// window, returning how many were removed. Event logs go with their webhooks
/// through the FK cascade. Idempotent: a second sweep finds nothing.
pub async fn sweep(db: &DatabaseConnection) -> Result<u64, Error> {
    let threshold = Utc::now() - Duration::days(RETENTION_DAYS);
    let deleted = webhook::delete_last_accessed_before(db, threshold.into()).await?;

    info!("Retention sweep removed {deleted} webhooks idle for over {RETENTION_DAYS} days");

    Ok(deleted)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn sweep_reports_the_number_of_webhooks_removed() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        assert_eq!(sweep(&db).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn sweep_with_nothing_idle_removes_nothing() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        assert_eq!(sweep(&db).await?, 0);

        Ok(())
    }
}
