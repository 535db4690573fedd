//! HTTP/1.1 transport shared by the status and replica clients.
//!
//! Every exchange opens its own TCP connection, sends one request, reads
//! the whole response body and lets the connection go. Connect, send and
//! body read all run under a single timeout.

use std::fmt::Display;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Bound applied to a whole request/response round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

const USER_AGENT: &str = concat!("tidescale/", env!("CARGO_PKG_VERSION"));

/// A request target: a base host joined with an endpoint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Full URL, used in logs and errors.
    url: String,
    /// `host:port` to connect to.
    addr: String,
    /// Value of the `host` header.
    authority: String,
    /// Origin-form request target.
    path: String,
}

impl Endpoint {
    /// Join `host` (e.g. `http://localhost:8123`) and `path` (e.g.
    /// `/app/status`) into an endpoint. Only plain `http` is supported.
    pub fn parse(host: &str, path: &str) -> ClientResult<Self> {
        let url = format!("{host}{path}");
        let invalid = |reason: String| ClientError::Request {
            url: url.clone(),
            reason,
        };

        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(invalid(format!("unsupported scheme `{other}`"))),
            None => return Err(invalid("missing scheme".to_string())),
        }

        let authority = uri
            .authority()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let port = authority.port_u16().unwrap_or(80);

        Ok(Self {
            addr: format!("{}:{port}", authority.host()),
            authority: authority.as_str().to_string(),
            path: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
            url,
        })
    }

    /// The full URL of this endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// A request builder with method, target, `host` and `user-agent` set.
    pub fn request(&self, method: Method) -> http::request::Builder {
        http::Request::builder()
            .method(method)
            .uri(self.path.as_str())
            .header(http::header::HOST, self.authority.as_str())
            .header(http::header::USER_AGENT, USER_AGENT)
    }

    pub(crate) fn network_error(&self, reason: impl Display) -> ClientError {
        ClientError::Network {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn request_error(&self, reason: impl Display) -> ClientError {
        ClientError::Request {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Status and fully-read body of a response.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Perform a single exchange against `endpoint`.
///
/// Fails with `Timeout` if the whole round trip takes longer than
/// `timeout`, and with `Network` for connection or IO failures. The HTTP
/// status is returned as-is; interpreting it is up to the caller.
pub async fn send(
    endpoint: &Endpoint,
    request: http::Request<Full<Bytes>>,
    timeout: Duration,
) -> ClientResult<RawResponse> {
    let exchange = async {
        let stream = TcpStream::connect(endpoint.addr.as_str())
            .await
            .map_err(|e| endpoint.network_error(e))?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| endpoint.network_error(e))?;

        // Drive the connection until the sender is dropped.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "connection closed with error");
            }
        });

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| endpoint.network_error(e))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| endpoint.network_error(e))?
            .to_bytes();

        Ok(RawResponse { status, body })
    };

    match tokio::time::timeout(timeout, exchange).await {
        Ok(result) => result,
        Err(_) => {
            debug!(url = %endpoint.url, ?timeout, "request timed out");
            Err(ClientError::Timeout {
                url: endpoint.url.clone(),
                timeout,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_with_explicit_port() {
        let ep = Endpoint::parse("http://localhost:8123", "/app/status").unwrap();
        assert_eq!(ep.url(), "http://localhost:8123/app/status");
        assert_eq!(ep.addr, "localhost:8123");
        assert_eq!(ep.authority, "localhost:8123");
        assert_eq!(ep.path, "/app/status");
    }

    #[test]
    fn endpoint_defaults_to_port_80() {
        let ep = Endpoint::parse("http://metrics.internal", "/app/replicas").unwrap();
        assert_eq!(ep.addr, "metrics.internal:80");
        assert_eq!(ep.authority, "metrics.internal");
    }

    #[test]
    fn endpoint_keeps_query_string() {
        let ep = Endpoint::parse("http://localhost:8123", "/app/status?pool=a").unwrap();
        assert_eq!(ep.path, "/app/status?pool=a");
    }

    #[test]
    fn endpoint_rejects_https() {
        let err = Endpoint::parse("https://localhost:8123", "/app/status").unwrap_err();
        assert!(matches!(err, ClientError::Request { .. }));
    }

    #[test]
    fn endpoint_rejects_missing_scheme() {
        let err = Endpoint::parse("localhost:8123", "/app/status").unwrap_err();
        assert!(matches!(err, ClientError::Request { .. }));
    }

    #[test]
    fn endpoint_rejects_garbage() {
        let err = Endpoint::parse("http://local host", "/app/status").unwrap_err();
        assert!(matches!(err, ClientError::Request { .. }));
    }

    fn get(ep: &Endpoint) -> http::Request<Full<Bytes>> {
        ep.request(Method::GET).body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn send_to_closed_port_is_network_error() {
        let ep = Endpoint::parse("http://127.0.0.1:1", "/app/status").unwrap();
        let err = send(&ep, get(&ep), Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn send_times_out_when_server_never_answers() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept and hold the connection without ever responding.
        let holder = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(stream);
        });

        let ep = Endpoint::parse(&format!("http://{addr}"), "/app/status").unwrap();
        let err = send(&ep, get(&ep), Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Timeout { .. }));
        assert!(err.is_network());
        holder.abort();
    }
}
