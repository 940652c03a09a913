//! Filter, sort and count pipeline that turns the full entry list into what
//! the user is looking at.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{MediaType, Rating, WatchLogEntry, WatchStatus};

/// Completion fractions closer than this are treated as equal.
pub const FRACTION_TOLERANCE: f64 = 0.01;

fn is_all(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("all")
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_uppercase()
        .replace(|c: char| c == '-' || c == ' ', "_")
}

/// Which entries the list shows by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    #[default]
    All,
    /// Only titles currently being watched.
    Ongoing,
}

impl FromStr for ViewMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_all(s) {
            return Ok(Self::All);
        }
        match normalize(s).as_str() {
            "ONGOING" | "WATCHING" => Ok(Self::Ongoing),
            _ => Err(ParseError::invalid("view mode", s)),
        }
    }
}

/// Calendar bucket on `date_watched`, relative to today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateRange {
    #[default]
    All,
    ThisMonth,
    LastMonth,
}

impl DateRange {
    /// Whether `date` falls in this range as seen on `today`.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        let (year, month) = match self {
            Self::All => return true,
            Self::ThisMonth => (today.year(), today.month()),
            Self::LastMonth => previous_month(today.year(), today.month()),
        };
        date.year() == year && date.month() == month
    }
}

/// The month before `(year, month)`, rolling January back into December.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

impl FromStr for DateRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_all(s) {
            return Ok(Self::All);
        }
        match normalize(s).as_str() {
            "THIS_MONTH" => Ok(Self::ThisMonth),
            "LAST_MONTH" => Ok(Self::LastMonth),
            _ => Err(ParseError::invalid("date range", s)),
        }
    }
}

/// Equality filter on one field; `All` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldFilter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> FieldFilter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for FieldFilter<T>
where
    T: FromStr<Err = ParseError>,
{
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_all(s) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Per-field filters. Release years compare as exact strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewFilters {
    pub release_year: FieldFilter<String>,
    pub media_type: FieldFilter<MediaType>,
    pub rating: FieldFilter<Rating>,
    pub status: FieldFilter<WatchStatus>,
}

impl ViewFilters {
    /// Release-year filter from free text; blank or "all" disables it.
    pub fn year(value: &str) -> FieldFilter<String> {
        if is_all(value) {
            FieldFilter::All
        } else {
            FieldFilter::Only(value.trim().to_string())
        }
    }

    pub fn matches(&self, entry: &WatchLogEntry) -> bool {
        let year_ok = match &self.release_year {
            FieldFilter::All => true,
            FieldFilter::Only(year) => entry.release_year.as_deref() == Some(year.as_str()),
        };

        year_ok
            && self.media_type.matches(&entry.media_type)
            && self.rating.matches(&entry.rating)
            && self.status.matches(&entry.effective_status())
    }
}

/// Everything the user selected that shapes the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ViewMode,
    pub range: DateRange,
    pub filters: ViewFilters,
}

impl ViewState {
    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_filters(mut self, filters: ViewFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Conjunction of the date range, view mode and every active field filter.
    pub fn matches(&self, entry: &WatchLogEntry, today: NaiveDate) -> bool {
        if !self.range.contains(entry.date_watched, today) {
            return false;
        }
        if self.mode == ViewMode::Ongoing && entry.effective_status() != WatchStatus::Watching {
            return false;
        }
        self.filters.matches(entry)
    }
}

/// Aggregate counts over a filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    pub total: usize,
    pub movies: usize,
    pub series: usize,
}

impl ViewCounts {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a WatchLogEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut counts, entry| {
                counts.total += 1;
                match entry.media_type {
                    MediaType::Movie => counts.movies += 1,
                    MediaType::Series => counts.series += 1,
                }
                counts
            })
    }
}

/// The ordered, filtered list plus its counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub entries: Vec<WatchLogEntry>,
    pub counts: ViewCounts,
}

/// Display order: status weight, then progress among watching entries, then
/// most recently watched.
pub fn compare_entries(a: &WatchLogEntry, b: &WatchLogEntry) -> Ordering {
    let (status_a, status_b) = (a.effective_status(), b.effective_status());

    let by_weight = status_b.weight().cmp(&status_a.weight());
    if by_weight != Ordering::Equal {
        return by_weight;
    }

    if status_a == WatchStatus::Watching {
        let (frac_a, frac_b) = (a.completion_fraction(), b.completion_fraction());
        if (frac_a - frac_b).abs() > FRACTION_TOLERANCE {
            return frac_b.partial_cmp(&frac_a).unwrap_or(Ordering::Equal);
        }
    }

    b.date_watched.cmp(&a.date_watched)
}

/// Stable sort by [`compare_entries`].
///
/// The fraction tolerance makes the comparison non-transitive, which the
/// standard library sorts are allowed to panic on, so this is an insertion
/// sort that only moves an element past strictly greater neighbours.
pub fn sort_entries(entries: &mut [WatchLogEntry]) {
    for i in 1..entries.len() {
        let mut j = i;
        while j > 0 && compare_entries(&entries[j - 1], &entries[j]) == Ordering::Greater {
            entries.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Filter `entries` by `state`, order them, and count the result.
pub fn build_view(entries: &[WatchLogEntry], state: &ViewState, today: NaiveDate) -> View {
    let mut selected: Vec<WatchLogEntry> = entries
        .iter()
        .filter(|entry| state.matches(entry, today))
        .cloned()
        .collect();

    sort_entries(&mut selected);
    let counts = ViewCounts::of(&selected);

    View {
        entries: selected,
        counts,
    }
}

/// [`build_view`] evaluated against the local calendar date.
pub fn build_view_now(entries: &[WatchLogEntry], state: &ViewState) -> View {
    build_view(entries, state, chrono::Local::now().date_naive())
}
