//! Shared HTTP request plumbing.
//!
//! Every client in this crate funnels its round trips through
//! [`execute`]: send the request, split transport failures into timeout vs.
//! network errors, and hand back the status code together with the full body
//! text. Interpretation of the pair is left to the caller, because the admin
//! API mixes JSON endpoints with plain-text ones.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::dns::NetworkType;
use crate::error::{Error, Result};

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of bytes of a response body to include in debug logs.
const TRUNCATE_LIMIT: usize = 256;

/// Create an HTTP client with the crate-wide timeout configuration.
#[allow(clippy::expect_used)] // the builder only fails on TLS backend init
pub(crate) fn create_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

/// Create an HTTP client pinned to one address family.
///
/// Binding the local address to the wildcard of the requested family forces
/// the connection over IPv4 or IPv6, so the server observes a remote address
/// of that family. The dynamic-DNS operations depend on this: when no value
/// is sent, the server stores whatever address the connection came from.
#[allow(clippy::expect_used)] // the builder only fails on TLS backend init
pub(crate) fn create_client_for(network: NetworkType) -> Client {
    let local: IpAddr = match network {
        NetworkType::Tcp4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        NetworkType::Tcp6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };

    Client::builder()
        .local_address(local)
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

/// Perform an HTTP request and return `(status, body)`.
///
/// Transport failures are mapped to [`Error::Timeout`] or
/// [`Error::Network`]; any received response is returned as-is, whatever
/// its status code.
pub(crate) async fn execute(request: RequestBuilder) -> Result<(u16, String)> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            Error::Timeout {
                detail: e.to_string(),
            }
        } else {
            Error::Network {
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    log::debug!("response status: {status}");

    let body = response.text().await.map_err(|e| Error::Network {
        detail: format!("failed to read response body: {e}"),
    })?;

    log::debug!("response body: {}", truncate_for_log(&body));

    Ok((status, body))
}

/// Decode a JSON response body.
pub(crate) fn decode_json<T>(body: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("JSON decode failed: {e}");
        log::error!("raw response: {}", truncate_for_log(body));
        Error::Decode {
            detail: e.to_string(),
        }
    })
}

/// Truncate a response body for logging, keeping credentials and large DNS
/// payloads out of the logs.
fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }

    let mut end = TRUNCATE_LIMIT;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}
