//! Core types for the watch log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValidationError};

/// Store-assigned identifier of a log entry.
pub type EntryId = i64;

/// Uppercase, with `-` and spaces folded into `_`, so "go for it" parses as GO_FOR_IT.
fn normalize_token(s: &str) -> String {
    s.trim()
        .to_ascii_uppercase()
        .replace(|c: char| c == '-' || c == ' ', "_")
}

/// Kind of title that was watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [Self::Movie, Self::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "MOVIE",
            Self::Series => "SERIES",
        }
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self::Movie
    }
}

impl FromStr for MediaType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "MOVIE" => Ok(Self::Movie),
            "SERIES" | "TV" | "TV_SERIES" => Ok(Self::Series),
            _ => Err(ParseError::invalid("media type", s)),
        }
    }
}

/// Verdict given to a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Skip,
    Timepass,
    GoForIt,
    LisanAlGaib,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Self::Skip, Self::Timepass, Self::GoForIt, Self::LisanAlGaib];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "SKIP",
            Self::Timepass => "TIMEPASS",
            Self::GoForIt => "GO_FOR_IT",
            Self::LisanAlGaib => "LISAN_AL_GAIB",
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::GoForIt
    }
}

impl FromStr for Rating {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "SKIP" => Ok(Self::Skip),
            "TIMEPASS" => Ok(Self::Timepass),
            "GO_FOR_IT" => Ok(Self::GoForIt),
            "LISAN_AL_GAIB" => Ok(Self::LisanAlGaib),
            _ => Err(ParseError::invalid("rating", s)),
        }
    }
}

/// Progress state of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchStatus {
    Watching,
    Completed,
    Dropped,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 3] = [Self::Watching, Self::Completed, Self::Dropped];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watching => "WATCHING",
            Self::Completed => "COMPLETED",
            Self::Dropped => "DROPPED",
        }
    }

    /// Sort weight; higher sorts first.
    pub fn weight(self) -> u8 {
        match self {
            Self::Watching => 3,
            Self::Completed => 2,
            Self::Dropped => 1,
        }
    }
}

/// Records written before statuses existed are treated as completed.
impl Default for WatchStatus {
    fn default() -> Self {
        Self::Completed
    }
}

impl FromStr for WatchStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "WATCHING" => Ok(Self::Watching),
            "COMPLETED" => Ok(Self::Completed),
            "DROPPED" => Ok(Self::Dropped),
            _ => Err(ParseError::invalid("watch status", s)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(MediaType, Rating, WatchStatus);

/// A persisted watch-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchLogEntry {
    pub id: EntryId,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub release_year: Option<String>,
    pub rating: Rating,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    pub date_watched: NaiveDate,
    #[serde(default)]
    pub is_rewatch: bool,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub episode: Option<i32>,
    #[serde(default)]
    pub total_episodes: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WatchLogEntry {
    /// Status with the legacy default applied.
    pub fn effective_status(&self) -> WatchStatus {
        self.status.unwrap_or_default()
    }

    /// `episode / total_episodes`, or 0 when either is missing or zero.
    pub fn completion_fraction(&self) -> f64 {
        match (self.episode, self.total_episodes) {
            (Some(episode), Some(total)) if episode > 0 && total > 0 => {
                f64::from(episode) / f64::from(total)
            }
            _ => 0.0,
        }
    }
}

/// Fields submitted to create or fully replace an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub release_year: Option<String>,
    pub rating: Rating,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    pub date_watched: NaiveDate,
    #[serde(default)]
    pub is_rewatch: bool,
    #[serde(default, deserialize_with = "lenient::int")]
    pub season: Option<i32>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub episode: Option<i32>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub total_episodes: Option<i32>,
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    pub notes: Option<String>,
}

impl EntryDraft {
    /// Minimal draft with every optional field empty.
    pub fn new(
        title: impl Into<String>,
        media_type: MediaType,
        rating: Rating,
        date_watched: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            media_type,
            release_year: None,
            rating,
            status: None,
            date_watched,
            is_rewatch: false,
            season: None,
            episode: None,
            total_episodes: None,
            notes: None,
        }
    }

    /// Check the fields the store cannot be trusted to reject.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        for (field, value) in [
            ("season", self.season),
            ("episode", self.episode),
            ("total_episodes", self.total_episodes),
        ] {
            if let Some(value) = value {
                if value < 0 {
                    return Err(ValidationError::NegativeNumber { field, value });
                }
            }
        }

        Ok(())
    }

    /// Status with the legacy default applied.
    pub fn effective_status(&self) -> WatchStatus {
        self.status.unwrap_or_default()
    }
}

impl From<&WatchLogEntry> for EntryDraft {
    fn from(entry: &WatchLogEntry) -> Self {
        Self {
            title: entry.title.clone(),
            media_type: entry.media_type,
            release_year: entry.release_year.clone(),
            rating: entry.rating,
            status: entry.status,
            date_watched: entry.date_watched,
            is_rewatch: entry.is_rewatch,
            season: entry.season,
            episode: entry.episode,
            total_episodes: entry.total_episodes,
            notes: entry.notes.clone(),
        }
    }
}

/// Form-style input: numbers may arrive as strings, and blank means absent.
mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub fn int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Loose>::deserialize(deserializer)?;
        Ok(match value {
            Some(Loose::Int(n)) => i32::try_from(n).ok(),
            Some(Loose::Float(f)) if f.is_finite() => Some(f.trunc() as i32),
            Some(Loose::Text(s)) => s.trim().parse::<i32>().ok(),
            _ => None,
        })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Loose>::deserialize(deserializer)?;
        Ok(match value {
            Some(Loose::Int(n)) => Some(n.to_string()),
            Some(Loose::Float(f)) => Some(f.to_string()),
            Some(Loose::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
    }

    /// Free text kept as written; only an all-blank value is absent.
    pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|s| !s.trim().is_empty()))
    }
}
