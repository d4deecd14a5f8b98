//! `favorites` command handlers.

use clap::Subcommand;
use nearbite_session::FavoritesStore;

/// Sub-commands available under `favorites`.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// List saved places, most recent first
    List,
    /// Remove a saved place by candidate id
    Remove {
        /// Candidate id as shown by `favorites list`
        id: String,
    },
    /// Delete duplicate records, keeping the earliest save of each place
    Dedupe,
}

/// # Errors
///
/// Returns an error if the favorites store fails.
pub(crate) async fn run(store: &FavoritesStore, command: FavoritesCommands) -> anyhow::Result<()> {
    match command {
        FavoritesCommands::List => {
            let records = store.all().await?;
            if records.is_empty() {
                println!("no favorites yet; run `swipe` to find some");
                return Ok(());
            }

            let header = format!("{:<18}{:<7}{:<32}ID", "SAVED", "PRICE", "NAME");
            println!("{header}");
            for record in &records {
                let name: String = record.candidate.name.chars().take(30).collect();
                println!(
                    "{:<18}{:<7}{:<32}{}",
                    record.saved_at.format("%Y-%m-%d %H:%M"),
                    record.candidate.price_tier.symbols(),
                    name,
                    record.candidate.id,
                );
            }
        }
        FavoritesCommands::Remove { id } => {
            let removed = store.remove(&id).await?;
            if removed == 0 {
                println!("no favorite with id '{id}'");
            } else {
                println!("removed {removed} record(s) for '{id}'");
            }
        }
        FavoritesCommands::Dedupe => {
            let removed = store.remove_duplicates().await?;
            println!("removed {removed} duplicate record(s)");
        }
    }
    Ok(())
}
