//! Audit request lifecycle
//!
//! The UI stays on one thread; each submitted audit runs on a worker
//! thread and reports back over a bounded channel. [`AuditSession`] is
//! the single owner of the request state: the UI calls [`submit`] on
//! user action and [`poll`] on every tick, and renders whatever state
//! it sees.
//!
//! [`submit`]: AuditSession::submit
//! [`poll`]: AuditSession::poll

use crate::api::{ApiResult, AuditClient};
use crate::models::AuditResult;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Where the current audit request stands.
///
/// Exactly one variant holds at a time; entering `Submitting` discards
/// any previous result or error.
#[derive(Debug, Clone)]
pub enum RequestState {
    Idle,
    Submitting,
    Succeeded(AuditResult),
    Failed(String),
}

/// Anything that can run an audit. Lets tests drive the session
/// without a live service.
pub trait AuditBackend: Send + Sync {
    fn submit_audit(&self, video_url: &str) -> ApiResult<AuditResult>;
}

impl AuditBackend for AuditClient {
    fn submit_audit(&self, video_url: &str) -> ApiResult<AuditResult> {
        self.submit(video_url)
    }
}

/// Owns the request state machine for one audit at a time.
pub struct AuditSession {
    backend: Arc<dyn AuditBackend>,
    state: RequestState,
    inflight: Option<Receiver<ApiResult<AuditResult>>>,
    submitted_at: Option<Instant>,
    last_elapsed: Option<Duration>,
}

impl AuditSession {
    pub fn new(backend: Arc<dyn AuditBackend>) -> Self {
        Self {
            backend,
            state: RequestState::Idle,
            inflight: None,
            submitted_at: None,
            last_elapsed: None,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, RequestState::Submitting)
    }

    /// Time the current request has been in flight, or how long the
    /// last one took once it settled.
    pub fn elapsed(&self) -> Option<Duration> {
        match self.submitted_at {
            Some(start) => Some(start.elapsed()),
            None => self.last_elapsed,
        }
    }

    /// Start an audit for `video_url` on a worker thread.
    ///
    /// No-op when the trimmed URL is empty or a request is already in
    /// flight. Entering `Submitting` clears any previous outcome.
    pub fn submit(&mut self, video_url: &str) {
        let video_url = video_url.trim();
        if video_url.is_empty() || self.inflight.is_some() {
            return;
        }

        debug!(video_url = %video_url, "starting audit");

        let (tx, rx) = bounded(1);
        let backend = Arc::clone(&self.backend);
        let url = video_url.to_string();
        std::thread::spawn(move || {
            let _ = tx.send(backend.submit_audit(&url));
        });

        self.inflight = Some(rx);
        self.submitted_at = Some(Instant::now());
        self.last_elapsed = None;
        self.state = RequestState::Submitting;
    }

    /// Drain the worker channel without blocking. Call on every UI
    /// tick; returns true when the in-flight request settled during
    /// this call.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.inflight else {
            return false;
        };

        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                // Worker exited without sending a result.
                self.settle(RequestState::Failed(
                    "audit worker terminated unexpectedly".to_string(),
                ));
                return true;
            }
        };

        match outcome {
            Ok(result) => {
                debug!(
                    issues = result.issue_count(),
                    status = %result.status_label(),
                    "audit settled"
                );
                self.settle(RequestState::Succeeded(result));
            }
            Err(err) => {
                debug!(error = %err, "audit failed");
                self.settle(RequestState::Failed(err.to_string()));
            }
        }
        true
    }

    fn settle(&mut self, state: RequestState) {
        self.inflight = None;
        self.last_elapsed = self.submitted_at.take().map(|t| t.elapsed());
        self.state = state;
    }
}
