//! Scripted transport for testing.
//!
//! Replays queued responses in order and records every request it receives.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::{HttpRequest, HttpResponse, NetworkError, Transport};

/// Transport that answers from a queue of canned responses.
///
/// When the queue runs dry every further request fails with
/// [`NetworkError::ConnectionFailed`].
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Create a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(response);
    }

    /// Queue a response (builder form).
    pub fn with_response(self, response: HttpResponse) -> Self {
        self.push(response);
        self
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Copy of every request received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> HttpResponse {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| HttpResponse::err(NetworkError::ConnectionFailed))
    }
}
