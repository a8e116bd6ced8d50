//! JSON reporter
//!
//! Outputs the parsed AuditResult re-serialized as pretty-printed JSON.
//! Useful for machine consumption, piping to jq, or further processing.

use crate::models::AuditResult;
use anyhow::Result;

/// Render an audit result as JSON
pub fn render(result: &AuditResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
