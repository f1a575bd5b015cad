use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reports_core::{Error, RequestContext, ResponseRecord, Result, Transport};

enum Scripted {
    Response(ResponseRecord),
    Failure(String),
}

/// Transport that replays scripted outcomes in order and records every
/// request it receives.
///
/// Calling it with an empty script is a test bug and yields a transport error
/// naming the unexpected request.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<RequestContext>>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("pending", &self.script.lock().unwrap().len())
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn respond(self, response: ResponseRecord) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response));
        self
    }

    /// Queues a transport failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.into()));
        self
    }

    pub fn push(&self, response: ResponseRecord) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Response(response));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(message.into()));
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RequestContext> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RequestContext> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, request: RequestContext) -> Result<ResponseRecord> {
        let described = format!("{} {}", request.method(), request.target());
        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Failure(message)) => Err(Error::transport(message)),
            None => Err(Error::transport(format!("unexpected request: {described}"))),
        }
    }
}
