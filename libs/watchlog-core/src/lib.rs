//! Core watch-log library shared by the backend and the terminal client.
//!
//! Provides:
//! - Entry types (WatchLogEntry, EntryDraft, Rating, WatchStatus, etc.)
//! - The view pipeline: filtering, status-aware ordering and counts
//! - Status/episode reconciliation applied before an entry is saved
//! - A memoized view cache and display metadata for clients

pub mod cache;
pub mod display;
pub mod error;
pub mod reconcile;
pub mod types;
pub mod view;

pub use cache::ViewCache;
pub use display::{progress_label, Badge, Badged, Tone};
pub use error::{ParseError, ValidationError};
pub use reconcile::{reconcile, Progress, SaveKind};
pub use types::{EntryDraft, EntryId, MediaType, Rating, WatchLogEntry, WatchStatus};
pub use view::{
    build_view, build_view_now, compare_entries, sort_entries, DateRange, FieldFilter, View,
    ViewCounts, ViewFilters, ViewMode, ViewState,
};
