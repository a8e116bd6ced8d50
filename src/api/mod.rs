//! HTTP client for the compliance-auditing service
//!
//! One endpoint matters: `POST {endpoint}/audit` with a JSON body of
//! `{"video_url": "..."}`. A 2xx response carries the full
//! [`AuditResult`](crate::models::AuditResult); any other status carries
//! an error body whose `detail` field (when present) is the message to
//! show the user. Uses ureq (sync HTTP), so no async runtime is needed.

mod client;

pub use client::AuditClient;

use thiserror::Error;

/// Errors that can occur talking to the audit service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response: DNS failure,
    /// connection refused, timeout. Distinct from a service-reported
    /// failure so the UI can say "is the service running?".
    #[error("could not reach the audit service at {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The service answered with a non-2xx status. `message` is the
    /// body's `detail` field verbatim when present, otherwise a generic
    /// line naming the status code.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("failed to parse audit response: {0}")]
    MalformedResponse(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
