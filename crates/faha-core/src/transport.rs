// HTTP transport for the fantasy API.
//
// The valuation code only depends on the `Transport` trait: give it a
// resource path plus query parameters, get parsed JSON back or an error that
// carries the raw response body. `HttpTransport` is the reqwest-backed
// implementation; tests substitute scripted in-memory transports.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request for {path} returned status {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("request for {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response for {path} is not valid JSON: {source}")]
    Decode {
        path: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// Raw response body, when the server produced one.
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } | TransportError::Decode { body, .. } => {
                Some(body)
            }
            TransportError::Request { .. } => None,
        }
    }
}

/// Blocking-style request/response access to the fantasy API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `path` (relative to the API base) and parse the body as JSON.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError>;
}

/// reqwest-backed transport authenticating with a bearer token.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let token = config
            .credentials
            .access_token
            .clone()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            warn!("no access token configured; requests will be unauthenticated");
        }
        Self::new(config.api.endpoint.clone(), token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| TransportError::Request {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|source| TransportError::Request {
            path: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| TransportError::Decode {
            path: path.to_string(),
            body,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response on a loopback port. The join handle
    /// yields the raw request text that was received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn success_parses_json_and_sends_query_and_token() {
        let (base, server) = serve_once("200 OK", r#"{"fantasy_content":{"ok":true}}"#).await;
        let transport = HttpTransport::new(base, Some("tok123".into()));

        let value = transport
            .get("league/427.l.1;out=settings", &[("format", "json")])
            .await
            .expect("request should succeed");
        assert_eq!(value["fantasy_content"]["ok"], Value::Bool(true));

        let request = server.await.unwrap();
        let first_line = request.lines().next().unwrap();
        assert!(first_line.starts_with("GET /league/427.l.1;out=settings?format=json"));
        assert!(request.to_lowercase().contains("authorization: bearer tok123"));
    }

    #[tokio::test]
    async fn failure_status_carries_raw_body() {
        let (base, server) = serve_once("401 Unauthorized", "token_expired").await;
        let transport = HttpTransport::new(format!("{base}/"), None);

        let err = transport.get("/game/nhl", &[]).await.unwrap_err();
        match &err {
            TransportError::Status { path, status, body } => {
                assert_eq!(path, "/game/nhl");
                assert_eq!(*status, 401);
                assert_eq!(body, "token_expired");
            }
            other => panic!("expected Status error, got: {other}"),
        }
        assert_eq!(err.body(), Some("token_expired"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /game/nhl "));
        assert!(!request.to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let transport = HttpTransport::new(base, None);

        let err = transport.get("game/nhl", &[]).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
        assert_eq!(err.body(), Some("<html>maintenance</html>"));
        server.await.unwrap();
    }
}
