//! HTTP transport for NZBGet JSON-RPC calls.
//!
//! [`NzbGet`] holds an immutable configuration and one shared
//! `reqwest::Client`. Each call is a single POST to the `/jsonrpc` endpoint;
//! there is no retry, no background task and no per-call state kept on the
//! handle beyond the request-id counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use crate::config::{Config, ConfigError};
use crate::rpc::envelope::{truncate_body, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Network-level failures. Connection errors and timeouts are safe to retry
/// with backoff; cancellations are not.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, connect, TLS handshake or body read failure.
    #[error("{0}")]
    Http(#[source] reqwest::Error),

    /// No complete response within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the call before it completed.
    #[error("request cancelled")]
    Cancelled,
}

/// Errors returned by a remote call.
///
/// Each call fails with exactly one of four kinds, in the order they can
/// occur: the request could not be encoded, the HTTP exchange failed, the
/// server rejected the call, or the response did not match the expected
/// shape.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request could not be serialized. Nothing was sent.
    #[error("encoding request: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The HTTP exchange failed.
    #[error("making request: {0}")]
    Transport(#[from] TransportError),

    /// The server returned a JSON-RPC error object.
    #[error("server error {code}: {message}")]
    Remote {
        /// Server error code (0 if the server sent none).
        code: i64,
        /// Server message, verbatim.
        message: String,
        /// Optional extra data from the error object.
        data: Option<serde_json::Value>,
    },

    /// The response was not JSON, or its result did not fit the expected
    /// type.
    #[error("parsing response: {source}: {status}")]
    Decode {
        /// HTTP status of the response.
        status: StatusCode,
        /// At most 1000 characters of the response body.
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RpcError {
    /// `true` for connection failures and timeouts, the only kinds worth
    /// retrying. A cancelled call is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RpcError::Transport(TransportError::Http(_) | TransportError::Timeout(_))
        )
    }

    /// `true` if the call was cancelled by the caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RpcError::Transport(TransportError::Cancelled))
    }
}

impl From<JsonRpcError> for RpcError {
    fn from(err: JsonRpcError) -> Self {
        RpcError::Remote {
            code: err.code,
            message: err.message,
            data: err.data,
        }
    }
}

/// Client handle for one NZBGet server.
///
/// Cheap to share behind an `Arc`; every method takes `&self` and calls may
/// run concurrently. Responses to concurrent calls arrive in whatever order
/// the connection pool delivers them.
///
/// # Example
///
/// ```ignore
/// use nzbget_rpc::{Config, NzbGet};
///
/// let config = Config::new("http://localhost:6789").with_credentials("nzbget", "tegbzn6789");
/// let client = NzbGet::new(&config)?;
///
/// let status = client.status().await?;
/// println!("{} B/s", status.download_rate);
///
/// // Raw call with positional arguments
/// let entries: Vec<nzbget_rpc::LogEntry> = client.call("log", (0, 50)).await?;
/// ```
pub struct NzbGet {
    http: reqwest::Client,
    endpoint: Url,
    auth: Option<HeaderValue>,
    timeout: Duration,
    /// Monotonically increasing request ID counter.
    request_id: AtomicU64,
}

impl NzbGet {
    /// Build a client from a config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the URL does not normalize to an
    /// http(s) endpoint, `ConfigError::InvalidTimeout` for a zero timeout, or
    /// `ConfigError::HttpClient` if no HTTP client could be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint()?;

        let http = match &config.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .danger_accept_invalid_certs(!config.verify_ssl)
                .build()
                .map_err(ConfigError::HttpClient)?,
        };

        let auth = match config.auth_header() {
            Some(value) => {
                let mut header = HeaderValue::from_str(&value)
                    .map_err(|e| ConfigError::InvalidCredentials(e.to_string()))?;
                header.set_sensitive(true);
                Some(header)
            }
            None => None,
        };

        Ok(Self {
            http,
            endpoint,
            auth,
            timeout: config.timeout()?,
            request_id: AtomicU64::new(1),
        })
    }

    /// The normalized `/jsonrpc` endpoint calls are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Call a remote method and decode its result.
    ///
    /// `params` is the positional argument list and must serialize to a JSON
    /// array: use a tuple such as `(0, 50)`, a one-element tuple `(true,)`,
    /// or `()` for no arguments.
    ///
    /// # Errors
    ///
    /// - `RpcError::Encoding` if the request cannot be built; nothing is sent
    /// - `RpcError::Transport` on connection failure or timeout
    /// - `RpcError::Remote` if the server returned an error object
    /// - `RpcError::Decode` if the body is not a JSON-RPC response or the
    ///   result does not decode into `T`
    pub async fn call<P, T>(&self, method: &str, params: P) -> Result<T, RpcError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id();
        let request = JsonRpcRequest::new(method, params, id).map_err(RpcError::Encoding)?;
        let body = request.to_vec().map_err(RpcError::Encoding)?;

        debug!(method, id, endpoint = %self.endpoint, "sending rpc request");

        // Apply timeout to the entire send/receive operation
        let (status, bytes) = match timeout(self.timeout, self.send_receive(body)).await {
            Ok(result) => result?,
            Err(_) => return Err(TransportError::Timeout(self.timeout).into()),
        };

        trace!(method, id, %status, bytes = bytes.len(), "rpc response received");

        decode_response(status, &bytes)
    }

    /// Like [`call`](Self::call), but abandons the request as soon as
    /// `cancel` fires.
    ///
    /// The in-flight request is dropped, which closes its connection.
    ///
    /// # Errors
    ///
    /// Same as `call`, plus `TransportError::Cancelled` when cancelled.
    pub async fn call_with_cancel<P, T>(
        &self,
        cancel: &CancellationToken,
        method: &str,
        params: P,
    ) -> Result<T, RpcError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled.into()),
            result = self.call(method, params) => result,
        }
    }

    /// Generate the next request ID.
    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// POST the body and read the full response (internal, no timeout).
    async fn send_receive(&self, body: Vec<u8>) -> Result<(StatusCode, bytes::Bytes), TransportError> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(auth) = &self.auth {
            request = request.header(AUTHORIZATION, auth.clone());
        }

        let response = request.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(TransportError::Http)?;

        Ok((status, bytes))
    }
}

/// Decode a JSON-RPC response body into `T`.
///
/// A server error object wins over any result. A body that is not a JSON
/// object, or a result of the wrong shape, becomes `RpcError::Decode` with a
/// truncated copy of the body.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, RpcError> {
    let decode_error = |source: serde_json::Error| RpcError::Decode {
        status,
        body: truncate_body(body),
        source,
    };

    let response: JsonRpcResponse = serde_json::from_slice(body).map_err(decode_error)?;

    if let Some(err) = response.error() {
        return Err(err.into());
    }

    if response.result.is_null() {
        return Err(decode_error(serde_json::Error::custom(
            "response has neither result nor error",
        )));
    }

    serde_json::from_value(response.result).map_err(decode_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_rpc_error_display() {
        let timeout_err = RpcError::Transport(TransportError::Timeout(Duration::from_secs(60)));
        assert_eq!(timeout_err.to_string(), "making request: request timed out after 60s");

        let remote = RpcError::Remote {
            code: 1,
            message: "Invalid procedure".to_string(),
            data: None,
        };
        assert_eq!(remote.to_string(), "server error 1: Invalid procedure");

        let cancelled = RpcError::Transport(TransportError::Cancelled);
        assert_eq!(cancelled.to_string(), "making request: request cancelled");
    }

    #[test]
    fn test_rpc_error_retryable() {
        let timeout_err = RpcError::Transport(TransportError::Timeout(Duration::from_secs(1)));
        assert!(timeout_err.is_retryable());
        assert!(!timeout_err.is_cancelled());

        let cancelled = RpcError::Transport(TransportError::Cancelled);
        assert!(!cancelled.is_retryable());
        assert!(cancelled.is_cancelled());

        let remote = RpcError::Remote {
            code: 1,
            message: "nope".to_string(),
            data: None,
        };
        assert!(!remote.is_retryable());
        assert!(!remote.is_cancelled());
    }

    #[test]
    fn test_decode_result() {
        let version: String =
            decode_response(StatusCode::OK, &body(json!({"id": 1, "result": "21.1"}))).unwrap();
        assert_eq!(version, "21.1");
    }

    #[test]
    fn test_decode_remote_error() {
        let err = decode_response::<bool>(
            StatusCode::OK,
            &body(json!({"id": 1, "error": {"name": "JSONRPCError", "code": 3, "message": "Invalid parameter"}})),
        )
        .unwrap_err();
        match err {
            RpcError::Remote { code, message, .. } => {
                assert_eq!(code, 3);
                assert_eq!(message, "Invalid parameter");
            }
            other => panic!("Expected Remote, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_wins_over_result() {
        let err = decode_response::<bool>(
            StatusCode::OK,
            &body(json!({"id": 1, "result": true, "error": {"code": 2, "message": "x"}})),
        )
        .unwrap_err();
        assert!(matches!(err, RpcError::Remote { code: 2, .. }));
    }

    #[test]
    fn test_decode_non_json_body() {
        let err = decode_response::<Status>(
            StatusCode::UNAUTHORIZED,
            b"<html><body>401 Unauthorized</body></html>",
        )
        .unwrap_err();
        match &err {
            RpcError::Decode { status, body, .. } => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("401 Unauthorized"));
            }
            other => panic!("Expected Decode, got {:?}", other),
        }
        assert!(err.to_string().ends_with("401 Unauthorized"), "got: {}", err);
    }

    #[test]
    fn test_decode_wrong_shape() {
        let err = decode_response::<Status>(StatusCode::OK, &body(json!({"id": 1, "result": "idle"})))
            .unwrap_err();
        assert!(matches!(err, RpcError::Decode { status: StatusCode::OK, .. }));
    }

    #[test]
    fn test_decode_missing_result_on_error_status() {
        let err = decode_response::<Option<String>>(StatusCode::INTERNAL_SERVER_ERROR, b"{}").unwrap_err();
        match err {
            RpcError::Decode { source, .. } => {
                assert!(source.to_string().contains("neither result nor error"))
            }
            other => panic!("Expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_null_or_missing_result_is_error() {
        for raw in [&br#"{"id": 1, "result": null}"#[..], &b"{}"[..], &br#"{"foo": 1}"#[..]] {
            let err = decode_response::<Option<String>>(StatusCode::OK, raw).unwrap_err();
            match err {
                RpcError::Decode { status, source, .. } => {
                    assert_eq!(status, StatusCode::OK);
                    assert!(source.to_string().contains("neither result nor error"));
                }
                other => panic!("Expected Decode, got {:?}", other),
            }
        }

        assert!(matches!(
            decode_response::<()>(StatusCode::OK, br#"{"foo": 1}"#),
            Err(RpcError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_object_envelope() {
        let err = decode_response::<bool>(StatusCode::OK, b"[true]").unwrap_err();
        match err {
            RpcError::Decode { body, .. } => assert_eq!(body, "[true]"),
            other => panic!("Expected Decode, got {:?}", other),
        }

        assert!(matches!(
            decode_response::<i64>(StatusCode::OK, b"[5, null, 1]"),
            Err(RpcError::Decode { .. })
        ));
        assert!(matches!(
            decode_response::<bool>(StatusCode::OK, b"true"),
            Err(RpcError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_body_is_truncated() {
        let huge = format!("not json {}", "z".repeat(10_000));
        let err = decode_response::<bool>(StatusCode::OK, huge.as_bytes()).unwrap_err();
        match err {
            RpcError::Decode { body, .. } => assert_eq!(body.chars().count(), 1000),
            other => panic!("Expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_new_normalizes_endpoint() {
        let client = NzbGet::new(&Config::new("http://127.0.0.1:6789/jsonrpc/")).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://127.0.0.1:6789/jsonrpc");
        assert_eq!(client.timeout(), Duration::from_secs(60));
        assert!(client.auth.is_none());
    }

    #[test]
    fn test_new_builds_sensitive_auth_header() {
        let config = Config::new("http://h").with_credentials("user", "pass");
        let client = NzbGet::new(&config).unwrap();
        let auth = client.auth.as_ref().unwrap();
        assert_eq!(auth.to_str().unwrap(), "Basic dXNlcjpwYXNz");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_new_without_certificate_verification() {
        let config = Config::new("https://nzbget.example:6791").with_verify_ssl(false);
        let client = NzbGet::new(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://nzbget.example:6791/jsonrpc");
    }

    #[test]
    fn test_new_supplied_client_overrides_tls_setting() {
        let http = reqwest::Client::builder().build().unwrap();
        let config = Config::new("https://nzbget.example")
            .with_verify_ssl(false)
            .with_http_client(http);
        assert!(config.http_client.is_some());

        let client = NzbGet::new(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://nzbget.example/jsonrpc");
    }

    #[test]
    fn test_new_rejects_zero_timeout() {
        let config = Config::new("http://h").with_timeout(Duration::ZERO);
        assert!(matches!(NzbGet::new(&config), Err(ConfigError::InvalidTimeout)));

        let config = Config::new("http://h").with_timeout(Duration::from_millis(250));
        assert_eq!(NzbGet::new(&config).unwrap().timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            NzbGet::new(&Config::new("::::")),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_request_ids_increase() {
        let client = NzbGet::new(&Config::new("http://h")).unwrap();
        let first = client.next_id();
        let second = client.next_id();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_encoding_error_sends_nothing() {
        // Port 9 (discard) on a reserved address; never contacted because
        // encoding fails first.
        let client = NzbGet::new(&Config::new("http://192.0.2.1:9")).unwrap();
        let err = client
            .call::<_, bool>("log", json!({"IDFrom": 0}))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_precancelled_token() {
        let client = NzbGet::new(&Config::new("http://192.0.2.1:9")).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client
            .call_with_cancel::<_, String>(&cancel, "version", ())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
