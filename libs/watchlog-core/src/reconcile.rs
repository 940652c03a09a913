//! Status/episode reconciliation applied to an entry right before it is saved.
//!
//! A series can be submitted in a contradictory state, e.g. marked completed
//! while the episode counter is still behind the total. The rules here settle
//! that into a consistent `(status, episode)` pair:
//!
//! - dropped titles and titles with an unknown total are left alone
//! - reaching the last episode completes the title
//! - "completed" with episodes remaining is read as "I finished it" unless an
//!   already-completed entry had its episode count lowered, which reopens it

use crate::types::{EntryDraft, WatchStatus};

/// Whether the save creates a new entry or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Create,
    Update { previous: WatchStatus },
}

/// The fields reconciliation reads and may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub status: WatchStatus,
    pub episode: i32,
    pub total_episodes: i32,
}

impl Progress {
    pub fn new(status: WatchStatus, episode: i32, total_episodes: i32) -> Self {
        Self {
            status,
            episode,
            total_episodes,
        }
    }

    /// Reads a draft the way the form submits it: blank numbers count as 0.
    pub fn from_draft(draft: &EntryDraft) -> Self {
        Self::new(
            draft.effective_status(),
            draft.episode.unwrap_or(0),
            draft.total_episodes.unwrap_or(0),
        )
    }
}

/// Settle `progress` into a consistent state for the given save.
pub fn reconcile(progress: Progress, kind: SaveKind) -> Progress {
    let Progress {
        status,
        episode,
        total_episodes,
    } = progress;

    if status == WatchStatus::Dropped || total_episodes == 0 {
        return progress;
    }

    if episode == total_episodes {
        return Progress::new(WatchStatus::Completed, episode, total_episodes);
    }

    if episode < total_episodes && status == WatchStatus::Completed {
        let finishing = match kind {
            SaveKind::Create => true,
            SaveKind::Update { previous } => previous != WatchStatus::Completed,
        };

        if finishing || episode == 0 {
            return Progress::new(WatchStatus::Completed, total_episodes, total_episodes);
        }
        return Progress::new(WatchStatus::Watching, episode, total_episodes);
    }

    progress
}

impl EntryDraft {
    /// Apply [`reconcile`] to this draft in place.
    ///
    /// The status is always made explicit. An episode of 0 is stored as empty.
    pub fn reconcile(&mut self, kind: SaveKind) {
        let settled = reconcile(Progress::from_draft(self), kind);
        self.status = Some(settled.status);
        self.episode = (settled.episode != 0).then_some(settled.episode);
    }

    /// Owned variant of [`EntryDraft::reconcile`].
    pub fn reconciled(mut self, kind: SaveKind) -> Self {
        self.reconcile(kind);
        self
    }
}
