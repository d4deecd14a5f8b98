use nearbite_db::RepositoryError;
use nearbite_search::SearchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("could not persist favorites: {0}")]
    PersistenceFailed(#[source] RepositoryError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("current location is unavailable")]
    LocationUnavailable,

    #[error("a nearby search is already in progress")]
    SearchInProgress,

    #[error("the search was cancelled")]
    Cancelled,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Favorites(#[from] FavoritesError),
}
