//! Audit service client
//!
//! Thin wrapper over a ureq agent. Submitting an audit is a single
//! blocking POST; callers that need a live UI run it on a worker thread
//! (see [`crate::session`]).

use crate::api::{ApiError, ApiResult};
use crate::models::{AuditRequest, AuditResult};
use std::time::Duration;
use tracing::debug;

/// Client for the compliance-auditing service
pub struct AuditClient {
    endpoint: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We read error bodies ourselves
        .timeout_global(Some(timeout)) // Audits transcribe whole videos; allow minutes
        .build()
        .new_agent()
}

impl AuditClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent: make_agent(timeout),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a video URL for auditing and block until the service
    /// responds with the full report.
    pub fn submit(&self, video_url: &str) -> ApiResult<AuditResult> {
        let url = format!("{}/audit", self.endpoint);
        let body = AuditRequest {
            video_url: video_url.to_string(),
        };

        debug!(url = %url, "submitting audit request");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| ApiError::Transport {
                endpoint: self.endpoint.clone(),
                source: Box::new(e),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(backend_error(status, &error_text));
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// Cheap reachability probe for `doctor`. Any HTTP response counts
    /// as reachable; only a transport failure is an error.
    pub fn probe(&self) -> ApiResult<u16> {
        let response = self
            .agent
            .get(&self.endpoint)
            .call()
            .map_err(|e| ApiError::Transport {
                endpoint: self.endpoint.clone(),
                source: Box::new(e),
            })?;
        Ok(response.status().as_u16())
    }
}

/// Build the user-facing error for a non-2xx response.
///
/// The service (FastAPI) reports failures as `{"detail": "..."}`.
/// A string detail is surfaced verbatim; a structured detail is
/// serialized compactly; anything else falls back to the status code.
fn backend_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|detail| match detail {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| format!("audit service returned status {status}"));
    ApiError::Backend { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_surfaces_detail_verbatim() {
        let err = backend_error(422, r#"{"detail": "invalid url"}"#);
        assert_eq!(err.to_string(), "invalid url");
        match err {
            ApiError::Backend { status, .. } => assert_eq!(status, 422),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn backend_error_serializes_structured_detail() {
        let err = backend_error(422, r#"{"detail": [{"loc": ["body"]}]}"#);
        assert_eq!(err.to_string(), r#"[{"loc":["body"]}]"#);
    }

    #[test]
    fn backend_error_falls_back_to_status_code() {
        for body in ["", "not json", r#"{"message": "nope"}"#] {
            let err = backend_error(500, body);
            assert_eq!(err.to_string(), "audit service returned status 500");
        }
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let client = AuditClient::new("http://localhost:8000/", Duration::from_secs(1));
        assert_eq!(client.endpoint(), "http://localhost:8000");
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = AuditClient::new(format!("http://{addr}"), Duration::from_secs(2));
        let err = client.submit("https://example.com/v").unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert!(err.to_string().contains("could not reach the audit service"));
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
