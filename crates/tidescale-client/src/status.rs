//! Metric client — reads the application's current load and replica count.

use std::time::Duration;

use bytes::Bytes;
use http::Method;
use http::header::ACCEPT;
use http_body_util::Full;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::transport::{Endpoint, send};
use crate::types::ApplicationStatus;

/// Fetch the current [`ApplicationStatus`] with `GET {host}{endpoint}`.
///
/// Fails with `Timeout`/`Network` if the application cannot be reached
/// within `timeout`, `UnexpectedStatus` for a non-2xx answer and `Parse`
/// if the body is not the expected JSON shape. There is no retry.
pub async fn fetch_status(
    host: &str,
    endpoint: &str,
    timeout: Duration,
) -> ClientResult<ApplicationStatus> {
    let ep = Endpoint::parse(host, endpoint)?;

    let request = ep
        .request(Method::GET)
        .header(ACCEPT, "application/json")
        .body(Full::new(Bytes::new()))
        .map_err(|e| ep.request_error(e))?;

    let response = send(&ep, request, timeout).await?;

    if !response.status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            url: ep.url().to_string(),
            status: response.status.as_u16(),
        });
    }

    let status: ApplicationStatus =
        serde_json::from_slice(&response.body).map_err(|e| ClientError::Parse {
            url: ep.url().to_string(),
            reason: e.to_string(),
        })?;

    debug!(url = %ep.url(), %status, "fetched application status");
    Ok(status)
}
