//! Labels and colors for showing entries. Presentation only.

use crate::types::{MediaType, Rating, WatchLogEntry, WatchStatus};

/// Color family a badge is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Stone,
    Blue,
    Amber,
    Yellow,
    Green,
    Cyan,
    Magenta,
}

/// Human-facing label plus tone for an enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    const fn new(label: &'static str, tone: Tone) -> Self {
        Self { label, tone }
    }
}

/// Values that have a badge.
pub trait Badged {
    fn badge(&self) -> Badge;
}

impl Badged for Rating {
    fn badge(&self) -> Badge {
        match self {
            Self::Skip => Badge::new("SKIP", Tone::Red),
            Self::Timepass => Badge::new("TIMEPASS", Tone::Stone),
            Self::GoForIt => Badge::new("GO FOR IT", Tone::Blue),
            Self::LisanAlGaib => Badge::new("LISAN AL GAIB", Tone::Amber),
        }
    }
}

impl Badged for WatchStatus {
    fn badge(&self) -> Badge {
        match self {
            Self::Watching => Badge::new("WATCHING", Tone::Yellow),
            Self::Completed => Badge::new("COMPLETED", Tone::Green),
            Self::Dropped => Badge::new("DROPPED", Tone::Red),
        }
    }
}

impl Badged for MediaType {
    fn badge(&self) -> Badge {
        match self {
            Self::Movie => Badge::new("Movie", Tone::Cyan),
            Self::Series => Badge::new("TV Series", Tone::Magenta),
        }
    }
}

/// "S2 · E5/10" style progress for series, `None` when nothing is known.
pub fn progress_label(entry: &WatchLogEntry) -> Option<String> {
    let season = entry.season.filter(|s| *s > 0).map(|s| format!("S{s}"));
    let episode = match (entry.episode.filter(|e| *e > 0), entry.total_episodes.filter(|t| *t > 0)) {
        (Some(e), Some(t)) => Some(format!("E{e}/{t}")),
        (Some(e), None) => Some(format!("E{e}")),
        (None, Some(t)) => Some(format!("{t} eps")),
        (None, None) => None,
    };

    match (season, episode) {
        (Some(s), Some(e)) => Some(format!("{s} · {e}")),
        (Some(s), None) => Some(s),
        (None, Some(e)) => Some(e),
        (None, None) => None,
    }
}
