use crate::errors::QueryResult;
use sqlx::PgPool;
use tracing::info;

/// Shared-secret API key verification plus usage logging, backed by Postgres.
#[derive(Clone)]
pub struct ApiKeyStore {
    pool: PgPool,
}

impl ApiKeyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the key and usage tables when they do not exist yet.
    pub async fn ensure_schema(&self) -> QueryResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS api_keys (
                id BIGSERIAL PRIMARY KEY,
                "user" TEXT NOT NULL,
                api_key TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS api_key_usage (
                id BIGSERIAL PRIMARY KEY,
                api_key TEXT NOT NULL,
                endpoint TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                request_body TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("✅ API key tables ready");
        Ok(())
    }

    pub async fn verify(&self, api_key: &str) -> QueryResult<bool> {
        let found = sqlx::query("SELECT 1 FROM api_keys WHERE api_key = $1")
            .bind(api_key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn log_usage(
        &self,
        api_key: &str,
        endpoint: &str,
        request_body: &str,
    ) -> QueryResult<()> {
        sqlx::query(
            "INSERT INTO api_key_usage (api_key, endpoint, request_body) VALUES ($1, $2, $3)",
        )
        .bind(api_key)
        .bind(endpoint)
        .bind(request_body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
