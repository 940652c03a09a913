//! Test fixtures and factory functions for creating test data.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use watchlog_backend::models::{EntryDraft, MediaType, Rating, WatchStatus};

/// Generate a unique title to avoid collisions between tests.
pub fn unique_title(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a movie request body the way the form submits it.
pub fn movie_request(title: &str, date_watched: &str) -> serde_json::Value {
    json!({
        "title": title,
        "type": "MOVIE",
        "release_year": "2021",
        "rating": "GO_FOR_IT",
        "date_watched": date_watched,
        "is_rewatch": false,
        "season": "",
        "episode": "",
        "notes": "watched in theatre"
    })
}

/// Create a series request body with progress fields.
pub fn series_request(
    title: &str,
    status: &str,
    episode: Option<i32>,
    total_episodes: Option<i32>,
) -> serde_json::Value {
    json!({
        "title": title,
        "type": "SERIES",
        "release_year": 2019,
        "rating": "LISAN_AL_GAIB",
        "status": status,
        "date_watched": "2024-05-01",
        "is_rewatch": false,
        "season": 1,
        "episode": episode,
        "total_episodes": total_episodes,
        "notes": null
    })
}

/// A series draft for inserting directly through the database.
pub fn series_draft(
    title: &str,
    status: WatchStatus,
    episode: Option<i32>,
    total_episodes: Option<i32>,
    date_watched: NaiveDate,
) -> EntryDraft {
    let mut draft = EntryDraft::new(title, MediaType::Series, Rating::GoForIt, date_watched);
    draft.status = Some(status);
    draft.episode = episode;
    draft.total_episodes = total_episodes;
    draft
}

/// A movie draft for inserting directly through the database.
pub fn movie_draft(title: &str, date_watched: NaiveDate) -> EntryDraft {
    EntryDraft::new(title, MediaType::Movie, Rating::Timepass, date_watched)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
