use thiserror::Error;

/// Failure of a single candidate source call.
///
/// An empty result is never an error; these variants cover transport and
/// provider failures only.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} rejected the request credentials (HTTP {status})")]
    NotAuthorized {
        source_name: &'static str,
        status: u16,
    },

    #[error("unexpected HTTP status {status} from {source_name}")]
    UnexpectedStatus {
        source_name: &'static str,
        status: u16,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a full orchestrated search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Every provider that was tried failed at the transport/provider level.
    #[error("search failed: {0}")]
    SearchFailed(#[source] SourceError),

    /// Providers answered but nothing survived dedup, ranking, and the
    /// distance bound.
    #[error("no restaurants found nearby")]
    NoResults,
}
