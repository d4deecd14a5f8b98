//! Swipe deck, favorites, and session wiring for nearbite.

pub mod deck;
pub mod error;
pub mod favorites;
pub mod location;
pub mod session;

pub use deck::{DeckController, DeckPhase, SwipeDirection};
pub use error::{FavoritesError, SessionError};
pub use favorites::{AddOutcome, FavoritesStore};
pub use location::{Authorization, FixedLocation, LocationProvider};
pub use session::DiscoverySession;
