//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

/// User-Agent sent to the lookup and bot services.
const CLIENT_USER_AGENT: &str = concat!("notigram/", env!("CARGO_PKG_VERSION"));

/// Initializes the HTTP client shared by the three remote calls.
///
/// Creates a `reqwest::Client` configured with:
/// - A per-request timeout, so a hung service fails instead of stalling the dispatch
/// - A connect timeout capped at the same value
/// - A crate User-Agent header
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(timeout: Duration) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(CLIENT_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
