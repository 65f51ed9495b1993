//! Scripted transport standing in for the network in tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};

/// A canned response. `ok` normally follows the status but can be forced,
/// since a double is free to disagree with it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub ok: bool,
    pub status: u16,
    pub body: Value,
}

impl MockResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            body,
        }
    }

    pub fn with_ok(mut self, ok: bool) -> Self {
        self.ok = ok;
        self
    }

    fn to_response(&self) -> ApiResponse {
        ApiResponse {
            status: self.status,
            ok: self.ok,
            body: self.body.clone(),
        }
    }
}

/// What the scripted transport does when called
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(MockResponse),
    Timeout,
    Fail(String),
}

/// Replaces exactly one kind of call (one HTTP method) with a fixed outcome
/// and records every request it sees.
///
/// Calls with any other method fail with a transport error, so a test never
/// silently reaches something it did not script.
pub struct ScriptedTransport {
    method: Method,
    outcome: Scripted,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(method: Method, outcome: Scripted) -> Self {
        Self {
            method,
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(method: Method, response: MockResponse) -> Self {
        Self::new(method, Scripted::Respond(response))
    }

    pub fn timeout(method: Method) -> Self {
        Self::new(method, Scripted::Timeout)
    }

    /// Requests received so far, in order
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<ApiRequest> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        debug!("scripted {} {}", request.method, request.path);
        let method = request.method;
        let path = request.path.clone();
        self.calls.lock().push(request);

        if method != self.method {
            return Err(ApiError::Transport(format!(
                "no scripted response for {} {} (only {} is scripted)",
                method, path, self.method
            )));
        }

        match &self.outcome {
            Scripted::Respond(response) => Ok(response.to_response()),
            Scripted::Timeout => Err(ApiError::Timeout { method, path }),
            Scripted::Fail(reason) => Err(ApiError::Transport(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_calls() {
        let transport = ScriptedTransport::respond(Method::Get, MockResponse::new(200, json!({})));
        transport
            .send(ApiRequest::new(Method::Get, "/posts/1"))
            .await
            .unwrap();
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.last_call().unwrap().path, "/posts/1");
    }

    #[tokio::test]
    async fn test_unscripted_method_fails() {
        let transport = ScriptedTransport::respond(Method::Get, MockResponse::new(200, json!({})));
        let err = transport
            .send(ApiRequest::new(Method::Delete, "/posts/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn test_forced_ok_flag() {
        let response = MockResponse::new(200, json!({})).with_ok(false);
        assert!(!response.to_response().is_ok());
    }
}
