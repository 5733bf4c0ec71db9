//! Redirect repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::redirect::{NewRedirect, RedirectRule};

/// Storage operations on redirect rules
#[async_trait]
pub trait RedirectStore: Send + Sync {
    /// Rule whose source path is exactly `path`
    async fn find_by_source(&self, path: &str) -> Result<Option<RedirectRule>>;

    async fn list(&self) -> Result<Vec<RedirectRule>>;

    /// Insert a rule. `None` when a rule for the same source already exists.
    async fn create(&self, new: &NewRedirect) -> Result<Option<RedirectRule>>;

    /// Delete a rule, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// PostgreSQL-backed redirect repository
#[derive(Clone)]
pub struct RedirectRepository {
    pool: PgPool,
}

impl RedirectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: PgRow) -> Result<RedirectRule> {
    let redirect_type: String = row.try_get("type")?;

    Ok(RedirectRule {
        id: row.try_get("id")?,
        source_path: row.try_get("source_path")?,
        destination_path: row.try_get("destination_path")?,
        redirect_type: redirect_type.parse().map_err(anyhow::Error::msg)?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl RedirectStore for RedirectRepository {
    async fn find_by_source(&self, path: &str) -> Result<Option<RedirectRule>> {
        let row = sqlx::query(
            r#"
            SELECT id, source_path, destination_path, type, created_at
            FROM redirects
            WHERE source_path = $1
            "#,
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_row).transpose()
    }

    async fn list(&self) -> Result<Vec<RedirectRule>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_path, destination_path, type, created_at
            FROM redirects
            ORDER BY source_path
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_row).collect()
    }

    async fn create(&self, new: &NewRedirect) -> Result<Option<RedirectRule>> {
        let row = sqlx::query(
            r#"
            INSERT INTO redirects (source_path, destination_path, type)
            VALUES ($1, $2, $3)
            ON CONFLICT (source_path) DO NOTHING
            RETURNING id, source_path, destination_path, type, created_at
            "#,
        )
        .bind(&new.source_path)
        .bind(&new.destination_path)
        .bind(new.redirect_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
