use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE webhook_relay.event_type AS ENUM ('challenge', 'notification')",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE webhook_relay.validation_status AS ENUM ('valid', 'invalid', 'no_signature')",
            )
            .await?;

        // Secrets are encrypted at the application layer via domain::encryption
        // (AES-256-GCM); the clear secret is never stored.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS webhook_relay.webhooks (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    client_id VARCHAR(255) NOT NULL,
                    encrypted_secret TEXT NOT NULL,
                    webhook_path VARCHAR(50) NOT NULL UNIQUE,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    last_accessed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE IF NOT EXISTS webhook_relay.events (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    webhook_id UUID NOT NULL REFERENCES webhook_relay.webhooks(id) ON DELETE CASCADE,

                    event_type webhook_relay.event_type NOT NULL,
                    headers JSONB NOT NULL DEFAULT '{}',
                    payload JSONB NOT NULL DEFAULT '{}',
                    validation_status webhook_relay.validation_status,

                    received_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
            "#,
            )
            .await?;

        // Quota checks and listings filter on client_id
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_webhooks_client_id
                 ON webhook_relay.webhooks(client_id)",
            )
            .await?;

        // The retention sweep filters on last_accessed_at
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_webhooks_last_accessed_at
                 ON webhook_relay.webhooks(last_accessed_at)",
            )
            .await?;

        // Event listings and eviction both order by received_at per webhook
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_events_webhook_id_received_at
                 ON webhook_relay.events(webhook_id, received_at)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS webhook_relay.events")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS webhook_relay.webhooks")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS webhook_relay.validation_status")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS webhook_relay.event_type")
            .await?;

        Ok(())
    }
}
