//! Scaling client — sets the application's replica count.

use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use http_body_util::Full;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::transport::{Endpoint, send};
use crate::types::ScalingRequest;

/// Set the replica count with `PUT {host}{endpoint}` and a
/// `{"replicas": n}` body.
///
/// The count is absolute, not a delta. Only `200 OK` and `204 No Content`
/// are accepted; any other status, other 2xx codes included, is an
/// `UnexpectedStatus` error. The response body is ignored.
pub async fn apply_replica_count(
    host: &str,
    endpoint: &str,
    replicas: u32,
    timeout: Duration,
) -> ClientResult<()> {
    let ep = Endpoint::parse(host, endpoint)?;

    let body = serde_json::to_vec(&ScalingRequest { replicas }).map_err(|e| ep.request_error(e))?;

    let request = ep
        .request(Method::PUT)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| ep.request_error(e))?;

    let response = send(&ep, request, timeout).await?;

    match response.status {
        StatusCode::OK | StatusCode::NO_CONTENT => {
            debug!(url = %ep.url(), replicas, "replica count applied");
            Ok(())
        }
        other => Err(ClientError::UnexpectedStatus {
            url: ep.url().to_string(),
            status: other.as_u16(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;

    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::State;
    use axum::http::HeaderMap;
    use axum::routing::put;

    type Seen = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    fn recording_router(status: StatusCode) -> (Router, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(
                "/app/replicas",
                put(
                    move |State(seen): State<Seen>, headers: HeaderMap, body: String| async move {
                        let content_type = headers
                            .get("content-type")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
                        seen.lock().unwrap().push((content_type, json));
                        status
                    },
                ),
            )
            .with_state(seen.clone());
        (router, seen)
    }

    #[tokio::test]
    async fn ok_is_success() {
        let (router, seen) = recording_router(StatusCode::OK);
        let host = serve(router).await;

        apply_replica_count(&host, "/app/replicas", 4, Duration::from_secs(3))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("application/json"));
        assert_eq!(seen[0].1, serde_json::json!({"replicas": 4}));
    }

    #[tokio::test]
    async fn no_content_is_success() {
        let (router, _seen) = recording_router(StatusCode::NO_CONTENT);
        let host = serve(router).await;

        apply_replica_count(&host, "/app/replicas", 2, Duration::from_secs(3))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn server_error_is_unexpected_status() {
        let (router, seen) = recording_router(StatusCode::INTERNAL_SERVER_ERROR);
        let host = serve(router).await;

        let err = apply_replica_count(&host, "/app/replicas", 4, Duration::from_secs(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedStatus { status: 500, .. }));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn other_success_codes_are_rejected() {
        let (router, _seen) = recording_router(StatusCode::ACCEPTED);
        let host = serve(router).await;

        let err = apply_replica_count(&host, "/app/replicas", 4, Duration::from_secs(3))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(202));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let err = apply_replica_count("http://127.0.0.1:1", "/app/replicas", 4, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(err.is_network());
    }
}
