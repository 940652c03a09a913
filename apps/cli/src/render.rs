//! Terminal rendering of entries and views.

use colored::{Color, ColoredString, Colorize};

use watchlog_core::{progress_label, Badge, Badged, Tone, View, ViewCounts, WatchLogEntry};

fn color(tone: Tone) -> Color {
    match tone {
        Tone::Red => Color::Red,
        Tone::Stone => Color::BrightBlack,
        Tone::Blue => Color::Blue,
        Tone::Amber => Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        },
        Tone::Yellow => Color::Yellow,
        Tone::Green => Color::Green,
        Tone::Cyan => Color::Cyan,
        Tone::Magenta => Color::Magenta,
    }
}

pub fn paint(badge: Badge) -> ColoredString {
    badge.label.color(color(badge.tone)).bold()
}

/// One-line summary used in lists.
pub fn entry_line(entry: &WatchLogEntry) -> String {
    let mut line = format!("{:>5}  {}", format!("#{}", entry.id).dimmed(), entry.title.bold());

    if let Some(year) = entry.release_year.as_deref().filter(|y| !y.is_empty()) {
        line.push_str(&format!(" ({})", year));
    }

    line.push_str(&format!(
        "  {}  {}  {}",
        paint(entry.media_type.badge()),
        paint(entry.rating.badge()),
        paint(entry.effective_status().badge()),
    ));

    if let Some(progress) = progress_label(entry) {
        line.push_str(&format!("  {}", progress));
    }

    line.push_str(&format!("  {}", entry.date_watched.to_string().dimmed()));

    if entry.is_rewatch {
        line.push_str(&format!("  {}", "rewatch".italic()));
    }

    line
}

pub fn counts_line(counts: &ViewCounts) -> String {
    format!(
        "{} entries · {} movies · {} series",
        counts.total, counts.movies, counts.series
    )
}

pub fn print_view(view: &View) {
    println!("{}", counts_line(&view.counts).bold());

    if view.entries.is_empty() {
        println!("{}", "No entries match.".dimmed());
        return;
    }

    for entry in &view.entries {
        println!("{}", entry_line(entry));
    }
}

pub fn print_detail(entry: &WatchLogEntry) {
    println!("{}", entry.title.bold());
    println!("  id:       {}", entry.id);
    println!("  type:     {}", paint(entry.media_type.badge()));
    if let Some(year) = &entry.release_year {
        println!("  released: {}", year);
    }
    println!("  rating:   {}", paint(entry.rating.badge()));
    println!("  status:   {}", paint(entry.effective_status().badge()));
    if let Some(progress) = progress_label(entry) {
        println!("  progress: {}", progress);
    }
    println!("  watched:  {}", entry.date_watched);
    if entry.is_rewatch {
        println!("  rewatch:  yes");
    }
    if let Some(notes) = entry.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("  notes:    {}", notes);
    }
}
