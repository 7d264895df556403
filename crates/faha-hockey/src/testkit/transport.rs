//! Scripted in-memory transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use faha_core::transport::{Transport, TransportError};
use serde_json::Value;

#[derive(Debug, Clone)]
enum Scripted {
    Json(Value),
    Failure { status: u16, body: String },
}

/// A request as the transport saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

/// Answers each path with a canned response. Unscripted paths fail with a
/// 404 whose body names the path. Clones share the request log, so a test
/// can keep a handle after moving the transport into a `League`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    responses: HashMap<String, Scripted>,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `body`.
    pub fn with(mut self, path: impl Into<String>, body: Value) -> Self {
        self.responses.insert(path.into(), Scripted::Json(body));
        self
    }

    /// Answer `path` with a non-success status.
    pub fn with_failure(mut self, path: impl Into<String>, status: u16, body: &str) -> Self {
        self.responses.insert(
            path.into(),
            Scripted::Failure {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Requested paths, in request order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn queries(&self) -> Vec<Vec<(String, String)>> {
        self.requests().into_iter().map(|r| r.query).collect()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    /// Number of requests whose path starts with `prefix`.
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.paths().iter().filter(|p| p.starts_with(prefix)).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        self.log.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        match self.responses.get(path) {
            Some(Scripted::Json(body)) => Ok(body.clone()),
            Some(Scripted::Failure { status, body }) => Err(TransportError::Status {
                path: path.to_string(),
                status: *status,
                body: body.clone(),
            }),
            None => Err(TransportError::Status {
                path: path.to_string(),
                status: 404,
                body: format!("no scripted response for {path}"),
            }),
        }
    }
}
