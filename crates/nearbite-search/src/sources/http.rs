//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Build a `reqwest::Client` with the configured timeout and user agent.
///
/// Provider timeouts surface as [`SourceError::Http`]; nothing above this
/// layer adds its own timer.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SourceError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Parse a base URL, normalised to end in exactly one slash so relative
/// joins append to the path rather than replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, SourceError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, SourceError> {
    base_url
        .join(path.trim_start_matches('/'))
        .map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })
}

/// Send `request`, map non-2xx statuses to typed errors, and decode the JSON
/// body into `T`.
///
/// 401/403 become [`SourceError::NotAuthorized`]; every other non-2xx status
/// becomes [`SourceError::UnexpectedStatus`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    source_name: &'static str,
    request: RequestBuilder,
    context: &str,
) -> Result<T, SourceError> {
    let response = request.send().await?;
    let status = response.status();

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(SourceError::NotAuthorized {
            source_name,
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            source_name,
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Trim a provider string, mapping blank values to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
