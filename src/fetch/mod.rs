//! HTTP plumbing for the upstream price API.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use reqwest::Url;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Issues a GET for `url` through `client` and returns the raw body.
///
/// Any non-2xx status is reported as [`FetchError::Status`] together with
/// whatever body the upstream sent back.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: Url) -> Result<Vec<u8>, FetchError> {
    debug!(host = url.host_str().unwrap_or(""), path = url.path(), "GET");
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await.map_err(redact)?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Upstream returned non-success status");
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await.map_err(redact)?;
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes.to_vec())
}

// The auth wrapper puts the key in the URL, so it must not reach error text.
fn redact(e: reqwest::Error) -> FetchError {
    FetchError::Transport(e.without_url())
}
