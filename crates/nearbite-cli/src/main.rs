use clap::{Parser, Subcommand};
use nearbite_core::Coordinate;
use tracing_subscriber::EnvFilter;

mod app;
mod discover;
mod favorites;

use favorites::FavoritesCommands;

#[derive(Debug, Parser)]
#[command(name = "nearbite")]
#[command(about = "Find nearby restaurants and keep the ones you like")]
struct Cli {
    /// SQLite database holding saved favorites
    #[arg(
        long,
        global = true,
        env = "NEARBITE_DATABASE_URL",
        default_value = "sqlite://nearbite.db"
    )]
    database_url: String,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, global = true, env = "NEARBITE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to search from.
#[derive(Debug, Clone, Copy, clap::Args)]
struct OriginArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
}

impl OriginArgs {
    fn coordinate(self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List restaurants near a location, nearest first
    Search {
        #[command(flatten)]
        origin: OriginArgs,
    },
    /// Browse nearby restaurants one at a time and save the ones you like
    Swipe {
        #[command(flatten)]
        origin: OriginArgs,
    },
    /// Manage saved favorites
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database can be opened
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search { origin }) => {
            let config = nearbite_core::load_app_config_from_env()?;
            discover::run_search(&config, origin.coordinate()).await?;
        }
        Some(Commands::Swipe { origin }) => {
            let config = nearbite_core::load_app_config_from_env()?;
            discover::run_swipe(&config, &cli.database_url, origin.coordinate()).await?;
        }
        Some(Commands::Favorites { command }) => {
            let store = app::open_favorites(&cli.database_url).await?;
            favorites::run(&store, command).await?;
        }
        Some(Commands::Db {
            command: DbCommands::Ping,
        }) => {
            let pool = app::connect(&cli.database_url).await?;
            nearbite_db::ping(&pool).await?;
            println!("database ok: {}", cli.database_url);
        }
        Some(Commands::Db {
            command: DbCommands::Migrate,
        }) => {
            let pool = app::connect(&cli.database_url).await?;
            let applied = nearbite_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        None => {
            println!("nothing to do; run `nearbite --help` for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
