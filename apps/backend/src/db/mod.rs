//! PostgreSQL database operations

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url.parse()?).await
    }

    /// Connect with options built by the caller (e.g. a schema search path)
    pub async fn connect_with(options: PgConnectOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    // === Log Repository ===

    /// Get all entries, most recently watched first
    pub async fn list_entries(&self) -> Result<Vec<WatchLogEntry>> {
        let rows = sqlx::query_as::<_, DbEntry>(
            r#"
            SELECT id, title, type, release_year, rating, date_watched, is_rewatch,
                   season, episode, total_episodes, notes, status, created_at
            FROM logs
            ORDER BY date_watched DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        to_api_entries(rows)
    }

    /// Case-insensitive title substring search
    pub async fn search_entries(&self, term: &str) -> Result<Vec<WatchLogEntry>> {
        let rows = sqlx::query_as::<_, DbEntry>(
            r#"
            SELECT id, title, type, release_year, rating, date_watched, is_rewatch,
                   season, episode, total_episodes, notes, status, created_at
            FROM logs
            WHERE title ILIKE $1
            ORDER BY date_watched DESC, created_at DESC
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        to_api_entries(rows)
    }

    /// Get entry by ID
    pub async fn get_entry(&self, id: EntryId) -> Result<Option<WatchLogEntry>> {
        let row = sqlx::query_as::<_, DbEntry>(
            r#"
            SELECT id, title, type, release_year, rating, date_watched, is_rewatch,
                   season, episode, total_episodes, notes, status, created_at
            FROM logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(DbEntry::to_api_entry).transpose()
    }

    /// Get the stored status of an entry, `None` if the entry does not exist
    pub async fn get_entry_status(&self, id: EntryId) -> Result<Option<WatchStatus>> {
        let status: Option<Option<String>> =
            sqlx::query_scalar("SELECT status FROM logs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match status {
            None => Ok(None),
            Some(None) => Ok(Some(WatchStatus::default())),
            Some(Some(value)) => value
                .parse()
                .map(Some)
                .map_err(|e| ApiError::Internal(format!("column status: {}", e))),
        }
    }

    /// Insert a new entry and return its ID
    pub async fn create_entry(&self, draft: &EntryDraft) -> Result<EntryId> {
        let id: EntryId = sqlx::query_scalar(
            r#"
            INSERT INTO logs (title, type, release_year, rating, date_watched, is_rewatch,
                              season, episode, total_episodes, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(draft.title.trim())
        .bind(draft.media_type.as_str())
        .bind(&draft.release_year)
        .bind(draft.rating.as_str())
        .bind(draft.date_watched)
        .bind(draft.is_rewatch)
        .bind(non_zero(draft.season))
        .bind(non_zero(draft.episode))
        .bind(non_zero(draft.total_episodes))
        .bind(&draft.notes)
        .bind(draft.effective_status().as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Replace every field of an entry; returns false if it does not exist
    pub async fn update_entry(&self, id: EntryId, draft: &EntryDraft) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE logs
            SET title = $1, type = $2, release_year = $3, rating = $4, date_watched = $5,
                is_rewatch = $6, season = $7, episode = $8, total_episodes = $9,
                notes = $10, status = $11
            WHERE id = $12
            "#,
        )
        .bind(draft.title.trim())
        .bind(draft.media_type.as_str())
        .bind(&draft.release_year)
        .bind(draft.rating.as_str())
        .bind(draft.date_watched)
        .bind(draft.is_rewatch)
        .bind(non_zero(draft.season))
        .bind(non_zero(draft.episode))
        .bind(non_zero(draft.total_episodes))
        .bind(&draft.notes)
        .bind(draft.effective_status().as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an entry; returns false if it does not exist
    pub async fn delete_entry(&self, id: EntryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Zero counts are stored as NULL
fn non_zero(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != 0)
}

/// ILIKE pattern matching `term` anywhere, with wildcards in `term` taken literally
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
