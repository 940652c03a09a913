use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use watchlog_core::{
    DateRange, EntryDraft, EntryId, FieldFilter, MediaType, ParseError, Rating, ViewFilters,
    ViewMode, ViewState, WatchStatus,
};

pub const DEFAULT_SERVER: &str = "http://localhost:3001";

#[derive(Parser, Debug)]
#[command(name = "watchlog")]
#[command(about = "Log the movies and series you watch", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the watch log server
    #[arg(long, global = true, env = "WATCHLOG_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Access password, overrides the stored one
    #[arg(long, global = true, env = "WATCHLOG_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the password against the server and remember it
    Login {
        /// Password, prompted for without echo if omitted. Shell history
        /// keeps arguments; prefer the prompt, `--token` or WATCHLOG_TOKEN
        password: Option<String>,
    },

    /// Forget the stored password
    Logout,

    /// List entries
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Search titles, then list the matches
    Search {
        term: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show one entry
    Show { id: EntryId },

    /// Log a new entry
    #[command(alias = "new")]
    Add(AddArgs),

    /// Replace fields of an existing entry
    #[command(alias = "e")]
    Edit {
        id: EntryId,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete { id: EntryId },

    /// Interactive view: change filters without refetching
    Browse {
        #[command(flatten)]
        view: ViewArgs,
    },
}

/// View selection shared by list, search and browse.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Only series currently being watched
    #[arg(long, conflicts_with = "mode")]
    pub ongoing: bool,

    /// all | ongoing
    #[arg(long)]
    pub mode: Option<String>,

    /// all | this-month | last-month
    #[arg(long)]
    pub range: Option<String>,

    /// Release year, matched exactly
    #[arg(long)]
    pub year: Option<String>,

    /// all | movie | series
    #[arg(long = "type")]
    pub media_type: Option<String>,

    /// all | skip | timepass | go-for-it | lisan-al-gaib
    #[arg(long)]
    pub rating: Option<String>,

    /// all | watching | completed | dropped
    #[arg(long)]
    pub status: Option<String>,
}

impl ViewArgs {
    pub fn to_view_state(&self) -> Result<ViewState, ParseError> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        let mode = if self.ongoing {
            ViewMode::Ongoing
        } else {
            text(&self.mode).parse()?
        };
        let range: DateRange = text(&self.range).parse()?;

        let filters = ViewFilters {
            release_year: ViewFilters::year(&text(&self.year)),
            media_type: text(&self.media_type).parse::<FieldFilter<MediaType>>()?,
            rating: text(&self.rating).parse::<FieldFilter<Rating>>()?,
            status: text(&self.status).parse::<FieldFilter<WatchStatus>>()?,
        };

        Ok(ViewState::default()
            .with_mode(mode)
            .with_range(range)
            .with_filters(filters))
    }
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    pub title: String,

    /// movie | series
    #[arg(long = "type", default_value = "movie")]
    pub media_type: MediaType,

    /// skip | timepass | go-for-it | lisan-al-gaib
    #[arg(long)]
    pub rating: Rating,

    /// watching | completed | dropped
    #[arg(long)]
    pub status: Option<WatchStatus>,

    /// Date watched, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub year: Option<String>,

    /// Mark as a rewatch
    #[arg(long)]
    pub rewatch: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub season: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub episode: Option<i32>,

    /// Total episodes in the season
    #[arg(long, allow_negative_numbers = true)]
    pub total: Option<i32>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl AddArgs {
    pub fn into_draft(self, today: NaiveDate) -> EntryDraft {
        let mut draft = EntryDraft::new(
            self.title,
            self.media_type,
            self.rating,
            self.date.unwrap_or(today),
        );
        draft.status = self.status;
        draft.release_year = self.year;
        draft.is_rewatch = self.rewatch;
        draft.season = self.season;
        draft.episode = self.episode;
        draft.total_episodes = self.total;
        draft.notes = self.notes;
        draft
    }
}

/// Fields to change on edit; anything not given keeps its stored value.
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long = "type")]
    pub media_type: Option<MediaType>,

    #[arg(long)]
    pub rating: Option<Rating>,

    #[arg(long)]
    pub status: Option<WatchStatus>,

    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub rewatch: Option<bool>,

    #[arg(long, allow_negative_numbers = true)]
    pub season: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub episode: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub total: Option<i32>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl EditArgs {
    pub fn apply(self, draft: &mut EntryDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(media_type) = self.media_type {
            draft.media_type = media_type;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if self.status.is_some() {
            draft.status = self.status;
        }
        if let Some(date) = self.date {
            draft.date_watched = date;
        }
        if self.year.is_some() {
            draft.release_year = self.year;
        }
        if let Some(rewatch) = self.rewatch {
            draft.is_rewatch = rewatch;
        }
        if self.season.is_some() {
            draft.season = self.season;
        }
        if self.episode.is_some() {
            draft.episode = self.episode;
        }
        if self.total.is_some() {
            draft.total_episodes = self.total;
        }
        if self.notes.is_some() {
            draft.notes = self.notes;
        }
    }
}
