use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::Notification;

/// Announcements pushed by admins and read by candidates, either as a plain
/// list or through `poll`, a bounded long-poll. The ingestion and scoring
/// core knows nothing about this transport.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    poll_wait: Duration,
}

const POLL_INTERVAL: Duration = Duration::from_millis(1000);

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            poll_wait: Duration::from_secs(25),
        }
    }

    pub async fn create(&self, title: &str, body: &str) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"INSERT INTO notifications (id, title, body)
               VALUES ($1, $2, $3)
               RETURNING id, title, body, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"SELECT id, title, body, created_at FROM notifications
               ORDER BY created_at DESC LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let outcome = sqlx::query(r#"DELETE FROM notifications WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if outcome.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Notification {} does not exist", id)));
        }
        Ok(())
    }

    /// Holds the request open until something newer than `since` lands or
    /// the wait budget runs out, then returns whatever is there (possibly
    /// nothing). Clients re-poll with the newest timestamp they have seen.
    pub async fn poll(&self, since: DateTime<Utc>) -> Result<Vec<Notification>> {
        let deadline = tokio::time::Instant::now() + self.poll_wait;
        loop {
            let fresh = sqlx::query_as::<_, Notification>(
                r#"SELECT id, title, body, created_at FROM notifications
                   WHERE created_at > $1 ORDER BY created_at ASC"#,
            )
            .bind(since)
            .fetch_all(&self.pool)
            .await?;
            if !fresh.is_empty() || tokio::time::Instant::now() >= deadline {
                return Ok(fresh);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
