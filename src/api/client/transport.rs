//! HTTP transport helpers.

use std::time::{Duration, SystemTime};

use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::error::ApiError;

/// Build an HTTP client with the configured timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    let user_agent = concat!("czds-request/", env!("CARGO_PKG_VERSION"));
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Send one request and turn non-2xx responses into `ApiError::Status`.
pub(super) async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let response = request.send().await?;
    if response.status().is_success() {
        return Ok(response);
    }
    let code = response.status().as_u16();
    let retry_after_secs = parse_retry_after_secs(response.headers());
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::status(code, body.trim().to_string(), retry_after_secs))
}

/// Read `Retry-After` as either delta-seconds or an HTTP date.
pub(super) fn parse_retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }
    let at = httpdate::parse_http_date(value).ok()?;
    let wait = at
        .duration_since(SystemTime::now())
        .unwrap_or(Duration::ZERO);
    Some(wait.as_secs())
}
