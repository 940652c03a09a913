//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{ApiError, Result};

// Re-export shared types from watchlog-core
pub use watchlog_core::types::{
    EntryDraft, EntryId, MediaType, Rating, WatchLogEntry, WatchStatus,
};
pub use watchlog_core::view::{View, ViewCounts, ViewFilters, ViewState};

// === Database Entity Types ===

/// Log entry row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbEntry {
    pub id: i64,
    pub title: String,
    #[sqlx(rename = "type")]
    pub media_type: String,
    pub release_year: Option<String>,
    pub rating: String,
    pub date_watched: NaiveDate,
    pub is_rewatch: Option<bool>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    pub total_episodes: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbEntry {
    /// Convert to API entry type
    pub fn to_api_entry(&self) -> Result<WatchLogEntry> {
        Ok(WatchLogEntry {
            id: self.id,
            title: self.title.clone(),
            media_type: parse_column("type", &self.media_type)?,
            release_year: self.release_year.clone(),
            rating: parse_column("rating", &self.rating)?,
            status: self
                .status
                .as_deref()
                .map(|s| parse_column("status", s))
                .transpose()?,
            date_watched: self.date_watched,
            is_rewatch: self.is_rewatch.unwrap_or(false),
            season: self.season,
            episode: self.episode,
            total_episodes: self.total_episodes,
            notes: self.notes.clone(),
            created_at: self.created_at,
        })
    }
}

/// Parse a stored enum column; a bad value means the table was edited by hand.
fn parse_column<T>(column: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr<Err = watchlog_core::ParseError>,
{
    value
        .parse()
        .map_err(|e| ApiError::Internal(format!("column {}: {}", column, e)))
}

/// Convert a batch of rows, failing on the first unreadable one.
pub fn to_api_entries(rows: Vec<DbEntry>) -> Result<Vec<WatchLogEntry>> {
    rows.iter().map(DbEntry::to_api_entry).collect()
}

// === API Request/Response Types ===

/// Response for POST /api/logs
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: EntryId,
}

/// Response for PUT and DELETE /api/logs/:id
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Query for GET /api/search
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Query for GET /api/view
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub q: Option<String>,
    pub mode: Option<String>,
    pub range: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub rating: Option<String>,
    pub status: Option<String>,
}

impl ViewQuery {
    /// Search term, if any non-blank one was given.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Parse the view parameters; absent values mean "all".
    pub fn to_view_state(&self) -> Result<ViewState> {
        let param = |value: &Option<String>| value.clone().unwrap_or_default();

        Ok(ViewState {
            mode: param(&self.mode).parse()?,
            range: param(&self.range).parse()?,
            filters: ViewFilters {
                release_year: ViewFilters::year(&param(&self.year)),
                media_type: param(&self.media_type).parse()?,
                rating: param(&self.rating).parse()?,
                status: param(&self.status).parse()?,
            },
        })
    }
}
