//! Shared single-shot JSON GET used by the upstream clients.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use wikilink_core::Error;

/// Build an HTTP client with a per-request timeout.
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .use_rustls_tls()
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// Send `request` once and decode a JSON body.
///
/// Transport failures and non-2xx statuses are `Error::UpstreamTransport`;
/// a body that does not decode as `T` is `Error::UpstreamDecode`.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder, upstream: &str) -> Result<T, Error> {
    let start = Instant::now();

    let response = request
        .header(header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| transport_error(upstream, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::UpstreamTransport(format!("{upstream} returned status {}", status.as_u16())));
    }

    let bytes = response.bytes().await.map_err(|e| transport_error(upstream, &e))?;

    tracing::debug!("{} responded in {:?} ({} bytes)", upstream, start.elapsed(), bytes.len());

    serde_json::from_slice(&bytes).map_err(|e| Error::UpstreamDecode(format!("{upstream}: {e}")))
}

fn transport_error(upstream: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::UpstreamTransport(format!("{upstream} timed out"))
    } else {
        Error::UpstreamTransport(format!("{upstream} unreachable: {err}"))
    }
}
