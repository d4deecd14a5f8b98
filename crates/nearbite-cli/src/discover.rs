//! `search` and `swipe` command handlers.

use std::sync::Arc;

use nearbite_core::{distance_meters, AppConfig, Candidate, Coordinate};
use nearbite_search::SearchError;
use nearbite_session::{AddOutcome, DeckPhase, DiscoverySession, FixedLocation, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app;

fn fmt_distance(meters: f64) -> String {
    if meters < 1_000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.1} km", meters / 1_000.0)
    }
}

fn fmt_candidate(origin: Coordinate, candidate: &Candidate) -> String {
    let mut line = format!(
        "{} ({}, {} away, {:.1}\u{2605} from {} reviews)",
        candidate.name,
        candidate.price_tier.symbols(),
        fmt_distance(distance_meters(origin, candidate.coordinate)),
        candidate.rating,
        candidate.review_count,
    );
    if let Some(address) = &candidate.address {
        line.push_str("\n    ");
        line.push_str(address);
    }
    if !candidate.categories.is_empty() {
        line.push_str("\n    ");
        line.push_str(&candidate.categories.join(", "));
    }
    line
}

/// Print nearby restaurants, nearest first.
///
/// # Errors
///
/// Returns an error if the sources cannot be built or every source failed.
/// Finding nothing is reported on stdout, not as an error.
pub(crate) async fn run_search(config: &AppConfig, origin: Coordinate) -> anyhow::Result<()> {
    let orchestrator = app::build_orchestrator(config)?;

    let results = match orchestrator.find_nearby(origin).await {
        Ok(results) => results,
        Err(SearchError::NoResults) => {
            println!("no restaurants found near {origin}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let header = format!("{:<4}{:<10}{:<7}{:<8}NAME", "#", "DISTANCE", "PRICE", "RATING");
    println!("{header}");
    for (i, candidate) in results.iter().enumerate() {
        println!(
            "{:<4}{:<10}{:<7}{:<8.1}{}",
            i + 1,
            fmt_distance(distance_meters(origin, candidate.coordinate)),
            candidate.price_tier.symbols(),
            candidate.rating,
            candidate.name,
        );
    }
    println!("{} result(s)", results.len());
    Ok(())
}

/// A line of input in the swipe loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwipeInput {
    Left,
    Right,
    Undo,
    Refresh,
    Quit,
}

impl SwipeInput {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "l" | "left" | "n" | "no" => Some(Self::Left),
            "r" | "right" | "y" | "yes" | "save" => Some(Self::Right),
            "u" | "undo" => Some(Self::Undo),
            "f" | "refresh" => Some(Self::Refresh),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

const SWIPE_HELP: &str = "[r]ight to save, [l]eft to pass, [u]ndo, re[f]resh, [q]uit";

fn show_current(session: &DiscoverySession, origin: Coordinate) {
    match session.phase() {
        DeckPhase::HasCurrent => {
            if let Some(candidate) = session.current() {
                println!();
                println!("{} left", session.remaining());
                println!("{}", fmt_candidate(origin, &candidate));
                println!("{SWIPE_HELP}");
            }
        }
        DeckPhase::Exhausted => {
            println!("that's everything nearby; [u]ndo, re[f]resh, or [q]uit");
        }
        DeckPhase::Empty => println!("nothing to show; re[f]resh or [q]uit"),
    }
}

fn report_load(result: Result<usize, SessionError>) -> anyhow::Result<()> {
    match result {
        Ok(count) => {
            println!("found {count} place(s)");
            Ok(())
        }
        Err(SessionError::Search(SearchError::NoResults)) => {
            println!("no restaurants found nearby");
            Ok(())
        }
        Err(SessionError::Search(e)) => {
            println!("search failed: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Interactive swipe loop over stdin.
///
/// # Errors
///
/// Returns an error if components cannot be built or stdin fails. Search and
/// save failures are reported inline and the loop continues.
pub(crate) async fn run_swipe(
    config: &AppConfig,
    database_url: &str,
    origin: Coordinate,
) -> anyhow::Result<()> {
    let orchestrator = Arc::new(app::build_orchestrator(config)?);
    let favorites = app::open_favorites(database_url).await?;
    let session = DiscoverySession::new(
        Arc::new(FixedLocation::new(origin)),
        orchestrator,
        favorites,
    );

    report_load(session.load_nearby().await)?;
    show_current(&session, origin);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(input) = SwipeInput::parse(&line) else {
            println!("{SWIPE_HELP}");
            continue;
        };

        match input {
            SwipeInput::Left => {
                session.swipe_left().await;
            }
            SwipeInput::Right => match session.swipe_right().await {
                Ok(Some(AddOutcome::Inserted(record))) => {
                    println!("saved {}", record.candidate.name);
                }
                Ok(Some(AddOutcome::AlreadyExists)) => println!("already in favorites"),
                Ok(None) => {}
                Err(e) => println!("could not save: {e}; [u]ndo to try again"),
            },
            SwipeInput::Undo => match session.undo().await {
                Ok(Some(_)) => {}
                Ok(None) => println!("nothing to undo"),
                Err(e) => println!("undo could not update favorites: {e}"),
            },
            SwipeInput::Refresh => report_load(session.refresh().await)?,
            SwipeInput::Quit => break,
        }
        show_current(&session, origin);
    }

    Ok(())
}
