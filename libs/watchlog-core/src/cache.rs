//! Memoized view over an entry list that changes from time to time.

use chrono::{Datelike, NaiveDate};

use crate::types::WatchLogEntry;
use crate::view::{build_view, View, ViewState};

#[derive(Debug, Clone)]
struct Computed {
    generation: u64,
    state: ViewState,
    month: (i32, u32),
    view: View,
}

/// Holds the fetched entries and the last view built from them.
///
/// The view is rebuilt only when the entries are replaced, the view state
/// changes, or the calendar month of "today" moves on.
#[derive(Debug, Clone, Default)]
pub struct ViewCache {
    entries: Vec<WatchLogEntry>,
    generation: u64,
    computed: Option<Computed>,
    rebuilds: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<WatchLogEntry>) -> Self {
        let mut cache = Self::new();
        cache.replace_entries(entries);
        cache
    }

    /// Swap in a freshly fetched entry list.
    pub fn replace_entries(&mut self, entries: Vec<WatchLogEntry>) {
        self.entries = entries;
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of times a view has actually been built.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn is_fresh(&self, state: &ViewState, today: NaiveDate) -> bool {
        self.computed.as_ref().is_some_and(|c| {
            c.generation == self.generation
                && c.month == (today.year(), today.month())
                && &c.state == state
        })
    }

    /// The view for `state`, rebuilt only if an input changed.
    pub fn view(&mut self, state: &ViewState, today: NaiveDate) -> &View {
        if !self.is_fresh(state, today) {
            self.computed = None;
        }

        let Self {
            entries,
            generation,
            computed,
            rebuilds,
        } = self;

        let computed = computed.get_or_insert_with(|| {
            *rebuilds += 1;
            Computed {
                generation: *generation,
                state: state.clone(),
                month: (today.year(), today.month()),
                view: build_view(entries.as_slice(), state, today),
            }
        });
        &computed.view
    }
}
