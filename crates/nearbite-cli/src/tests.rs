use super::*;
use crate::discover::SwipeInput;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["nearbite"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_search_with_negative_longitude() {
    let cli = Cli::try_parse_from(["nearbite", "search", "--lat", "37.7749", "--lng", "-122.4194"])
        .expect("expected valid cli args");

    let Some(Commands::Search { origin }) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(origin.coordinate(), Coordinate::new(37.7749, -122.4194));
}

#[test]
fn search_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["nearbite", "search", "--lat", "37.7749"]).is_err());
}

#[test]
fn parses_swipe_command() {
    let cli = Cli::try_parse_from(["nearbite", "swipe", "--lat", "40.7128", "--lng", "-74.006"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Swipe { .. })));
}

#[test]
fn parses_favorites_remove() {
    let cli = Cli::try_parse_from(["nearbite", "favorites", "remove", "zuni-cafe-sf"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Favorites {
            command: FavoritesCommands::Remove { ref id }
        }) if id == "zuni-cafe-sf"
    ));
}

#[test]
fn parses_favorites_list_and_dedupe() {
    let list = Cli::try_parse_from(["nearbite", "favorites", "list"]).unwrap();
    let dedupe = Cli::try_parse_from(["nearbite", "favorites", "dedupe"]).unwrap();

    assert!(matches!(
        list.command,
        Some(Commands::Favorites {
            command: FavoritesCommands::List
        })
    ));
    assert!(matches!(
        dedupe.command,
        Some(Commands::Favorites {
            command: FavoritesCommands::Dedupe
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["nearbite", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn database_url_flag_is_global() {
    let cli = Cli::try_parse_from([
        "nearbite",
        "favorites",
        "list",
        "--database-url",
        "sqlite://elsewhere.db",
    ])
    .unwrap();
    assert_eq!(cli.database_url, "sqlite://elsewhere.db");
}

#[test]
fn swipe_input_accepts_short_and_long_forms() {
    assert_eq!(SwipeInput::parse("r"), Some(SwipeInput::Right));
    assert_eq!(SwipeInput::parse("  Save \n"), Some(SwipeInput::Right));
    assert_eq!(SwipeInput::parse("left"), Some(SwipeInput::Left));
    assert_eq!(SwipeInput::parse("U"), Some(SwipeInput::Undo));
    assert_eq!(SwipeInput::parse("refresh"), Some(SwipeInput::Refresh));
    assert_eq!(SwipeInput::parse("q"), Some(SwipeInput::Quit));
    assert_eq!(SwipeInput::parse("maybe"), None);
}
