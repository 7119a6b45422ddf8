//! Recording doubles for the transport and reporter capabilities.
//!
//! Available to this crate's tests and, through the `test-support` feature,
//! to integration tests and downstream crates.

use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use crate::report::Reporter;
use crate::transport::{DeployRequest, HttpResponse, HttpTransport};

/// A message captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported {
    /// Captured from [`Reporter::success`].
    Success(String),
    /// Captured from [`Reporter::error`].
    Error(String),
    /// Captured from [`Reporter::detail`].
    Detail(String),
}

/// Reporter that keeps every message in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<Reported>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages reported so far.
    #[must_use]
    pub fn messages(&self) -> Vec<Reported> {
        self.messages.borrow().clone()
    }

    /// Messages rendered one per line, successes and errors as-is.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.messages
            .borrow()
            .iter()
            .map(|message| match message {
                Reported::Success(text) | Reported::Error(text) | Reported::Detail(text) => {
                    format!("{text}\n")
                }
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn success(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push(Reported::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push(Reported::Error(message.to_owned()));
    }

    fn detail(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push(Reported::Detail(message.to_owned()));
    }
}

/// A request captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested URL.
    pub url: String,
    /// `Content-Type` header value.
    pub content_type: String,
    /// Body bytes, read in full.
    pub body: Vec<u8>,
    /// Timeout passed by the caller.
    pub timeout: Duration,
    /// Service name passed by the caller.
    pub service_name: String,
    /// Number of entries in the watched directory while the request was in
    /// flight, when a directory is watched.
    pub watched_entries: Option<usize>,
}

/// Transport that records requests and answers with a canned response.
///
/// A transport built with [`RecordingTransport::unreachable`] returns no
/// response, mimicking a connection failure the transport has already
/// reported.
#[derive(Debug)]
pub struct RecordingTransport {
    response: Option<HttpResponse>,
    watch_dir: Option<PathBuf>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    /// Answer every request with `status` and `body`.
    #[must_use]
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            response: Some(HttpResponse::new(status, body)),
            watch_dir: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Answer no request.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            response: None,
            watch_dir: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Count the entries of `dir` whenever a request arrives.
    #[must_use]
    pub fn watching(mut self, dir: impl Into<PathBuf>) -> Self {
        self.watch_dir = Some(dir.into());
        self
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    fn count_watched(&self) -> Option<usize> {
        let dir = self.watch_dir.as_ref()?;
        std::fs::read_dir(dir).ok().map(Iterator::count)
    }
}

impl HttpTransport for RecordingTransport {
    fn execute(
        &self,
        request: DeployRequest<'_>,
        timeout: Duration,
        service_name: &str,
    ) -> Option<HttpResponse> {
        let mut body = Vec::new();
        if request.body.read_to_end(&mut body).is_err() {
            body.clear();
        }
        self.requests.borrow_mut().push(RecordedRequest {
            url: request.url.to_owned(),
            content_type: request.content_type.to_owned(),
            body,
            timeout,
            service_name: service_name.to_owned(),
            watched_entries: self.count_watched(),
        });
        self.response.clone()
    }
}
