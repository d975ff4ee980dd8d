//! Email log repository (append-only)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::EmailLogStore;
use crate::{error::AppResult, models::EmailLog};

#[derive(Clone)]
pub struct EmailLogsRepository {
    pool: Pool<Postgres>,
}

impl EmailLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailLogStore for EmailLogsRepository {
    async fn append(&self, entry: EmailLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO email_logs (id, reservation_id, recipient, email_type, status, error_message, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.reservation_id)
        .bind(&entry.recipient)
        .bind(&entry.email_type)
        .bind(entry.status)
        .bind(&entry.error_message)
        .bind(entry.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self, limit: i64) -> AppResult<Vec<EmailLog>> {
        let rows = sqlx::query_as::<_, EmailLog>(
            "SELECT * FROM email_logs ORDER BY sent_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
