//! Interactive browse mode.
//!
//! Entries are fetched once (and again on `search`/`refresh`); every filter
//! change is answered from the local [`ViewCache`].

use std::io::Write;

use chrono::Local;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use watchlog_core::{
    MediaType, ParseError, Rating, ViewCache, ViewFilters, ViewState, WatchStatus,
};

use crate::client::ApiClient;
use crate::render;

/// `all|a|b|c` in the spelling the commands accept.
fn choices(values: impl IntoIterator<Item = &'static str>) -> String {
    std::iter::once("all".to_string())
        .chain(
            values
                .into_iter()
                .map(|v| v.to_ascii_lowercase().replace('_', "-")),
        )
        .collect::<Vec<_>>()
        .join("|")
}

fn help_text() -> String {
    format!(
        "commands:
  mode all|ongoing
  range all|this-month|last-month
  year <year>|all
  type {}
  rating {}
  status {}
  search <term>     search (clears the search)
  reset             refresh
  help              quit",
        choices(MediaType::ALL.iter().map(MediaType::as_str)),
        choices(Rating::ALL.iter().map(Rating::as_str)),
        choices(WatchStatus::ALL.iter().map(WatchStatus::as_str)),
    )
}

/// What a browse command asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Redraw with a new view state.
    Show(ViewState),
    /// Refetch with a new search term (`None` lists everything).
    Search(Option<String>),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error(transparent)]
    Value(#[from] ParseError),
}

/// Interpret one line of input against the current view state.
pub fn parse_command(line: &str, state: &ViewState) -> Result<Action, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let mut next = state.clone();
    match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Action::Show(next)),
        "q" | "quit" | "exit" => return Ok(Action::Quit),
        "h" | "help" | "?" => return Ok(Action::Help),
        "refresh" => return Ok(Action::Refresh),
        "reset" => return Ok(Action::Show(ViewState::default())),
        "search" | "/" => {
            let term = Some(rest.to_string()).filter(|t| !t.is_empty());
            return Ok(Action::Search(term));
        }
        "mode" => next.mode = rest.parse()?,
        "range" => next.range = rest.parse()?,
        "year" => next.filters.release_year = ViewFilters::year(rest),
        "type" => next.filters.media_type = rest.parse()?,
        "rating" => next.filters.rating = rest.parse()?,
        "status" => next.filters.status = rest.parse()?,
        _ => return Err(CommandError::Unknown(word.to_string())),
    }

    Ok(Action::Show(next))
}

pub async fn run(
    client: &ApiClient,
    mut state: ViewState,
    mut search: Option<String>,
) -> anyhow::Result<()> {
    let mut cache = ViewCache::with_entries(client.fetch(search.as_deref()).await?);

    println!("{}", "Type `help` for commands, `quit` to leave.".dimmed());
    draw(&mut cache, &state, search.as_deref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line, &state) {
            Ok(Action::Show(next)) => {
                state = next;
                draw(&mut cache, &state, search.as_deref());
            }
            Ok(Action::Search(term)) => {
                search = term;
                refetch(client, &mut cache, search.as_deref()).await;
                draw(&mut cache, &state, search.as_deref());
            }
            Ok(Action::Refresh) => {
                refetch(client, &mut cache, search.as_deref()).await;
                draw(&mut cache, &state, search.as_deref());
            }
            Ok(Action::Help) => println!("{}", help_text()),
            Ok(Action::Quit) => break,
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    Ok(())
}

/// A failed refetch keeps the entries already on screen.
async fn refetch(client: &ApiClient, cache: &mut ViewCache, search: Option<&str>) {
    match client.fetch(search).await {
        Ok(entries) => cache.replace_entries(entries),
        Err(e) => eprintln!("{}", e.to_string().red()),
    }
}

fn draw(cache: &mut ViewCache, state: &ViewState, search: Option<&str>) {
    let today = Local::now().date_naive();
    tracing::debug!(
        rebuild = !cache.is_fresh(state, today),
        generation = cache.generation(),
        "drawing view"
    );

    if let Some(term) = search {
        println!("{} {}", "search:".dimmed(), term);
    }
    render::print_view(cache.view(state, today));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use watchlog_core::{DateRange, FieldFilter, ViewMode};

    #[test]
    fn test_filter_commands_update_state() {
        let state = ViewState::default();

        let Ok(Action::Show(state)) = parse_command("mode ongoing", &state) else {
            panic!("expected show");
        };
        let Ok(Action::Show(state)) = parse_command("range last-month", &state) else {
            panic!("expected show");
        };
        let Ok(Action::Show(state)) = parse_command("type series", &state) else {
            panic!("expected show");
        };
        let Ok(Action::Show(state)) = parse_command("rating lisan al gaib", &state) else {
            panic!("expected show");
        };
        let Ok(Action::Show(state)) = parse_command("year 2019", &state) else {
            panic!("expected show");
        };

        assert_eq!(state.mode, ViewMode::Ongoing);
        assert_eq!(state.range, DateRange::LastMonth);
        assert_eq!(state.filters.media_type, FieldFilter::Only(MediaType::Series));
        assert_eq!(state.filters.rating, FieldFilter::Only(Rating::LisanAlGaib));
        assert_eq!(state.filters.release_year, FieldFilter::Only("2019".to_string()));
    }

    #[test]
    fn test_all_clears_a_filter() {
        let state = ViewState::default().with_mode(ViewMode::Ongoing);
        let action = parse_command("mode all", &state).unwrap();
        assert_eq!(action, Action::Show(ViewState::default()));
    }

    #[test]
    fn test_reset() {
        let state = ViewState::default().with_range(DateRange::ThisMonth);
        assert_eq!(
            parse_command("reset", &state).unwrap(),
            Action::Show(ViewState::default())
        );
    }

    #[test]
    fn test_search_commands() {
        let state = ViewState::default();
        assert_eq!(
            parse_command("search  the bear ", &state).unwrap(),
            Action::Search(Some("the bear".to_string()))
        );
        assert_eq!(parse_command("search", &state).unwrap(), Action::Search(None));
    }

    #[test]
    fn test_blank_line_redraws() {
        let state = ViewState::default().with_mode(ViewMode::Ongoing);
        assert_eq!(parse_command("   ", &state).unwrap(), Action::Show(state));
    }

    #[test]
    fn test_quit_and_help() {
        let state = ViewState::default();
        assert_eq!(parse_command("QUIT", &state).unwrap(), Action::Quit);
        assert_eq!(parse_command("help", &state).unwrap(), Action::Help);
        assert_eq!(parse_command("refresh", &state).unwrap(), Action::Refresh);
    }

    #[test]
    fn test_help_lists_every_value() {
        let help = help_text();
        assert!(help.contains("type all|movie|series"));
        assert!(help.contains("rating all|skip|timepass|go-for-it|lisan-al-gaib"));
        assert!(help.contains("status all|watching|completed|dropped"));
    }

    #[test]
    fn test_help_values_parse_back() {
        let state = ViewState::default();
        for rating in Rating::ALL {
            let spelled = rating.as_str().to_ascii_lowercase().replace('_', "-");
            let Ok(Action::Show(next)) = parse_command(&format!("rating {}", spelled), &state)
            else {
                panic!("rating {} did not parse", spelled);
            };
            assert_eq!(next.filters.rating, FieldFilter::Only(rating));
        }
    }

    #[test]
    fn test_bad_input() {
        let state = ViewState::default();
        assert_eq!(
            parse_command("sort title", &state),
            Err(CommandError::Unknown("sort".to_string()))
        );
        assert!(matches!(
            parse_command("range next-week", &state),
            Err(CommandError::Value(_))
        ));
    }
}
