//! Mock transport for testing.
//!
//! [`MockTransport`] is a queue-based fake: tests push the responses it
//! should return and afterwards inspect the requests it received. It
//! implements [`Transport`], so it drives real adapters end to end
//! without touching the network.
//!
//! ```rust
//! use chatwire::HttpResponse;
//! use chatwire::mock::MockTransport;
//!
//! let mock = MockTransport::new();
//! mock.queue_response(HttpResponse::ok(r#"{"ok": true}"#));
//! assert_eq!(mock.pending(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::LlmError;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// A queue-based transport for unit and integration tests.
///
/// Every `send` records the request and pops the next queued outcome.
///
/// # Panics
///
/// [`send`](Transport::send) panics if the queue is empty.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    outcomes: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Creates a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(response));
        self
    }

    /// Queues a 200 response whose body is `body` serialized.
    pub fn queue_json(&self, body: &serde_json::Value) -> &Self {
        self.queue_response(HttpResponse::ok(body.to_string()))
    }

    /// Queues a connection-level failure, returned as [`LlmError::Transport`].
    pub fn queue_transport_error(&self, message: impl Into<String>) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.into()));
        self
    }

    /// Requests received so far, oldest first.
    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request, parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if nothing was sent or the body is not JSON.
    pub fn last_body(&self) -> serde_json::Value {
        let requests = self.recorded_requests();
        let last = requests.last().expect("no request was sent");
        serde_json::from_str(&last.body).expect("request body should be JSON")
    }

    /// Number of queued outcomes not yet consumed.
    pub fn pending(&self) -> usize {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let outcome = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .expect("MockTransport: no queued response");
        outcome.map_err(LlmError::Transport)
    }
}
