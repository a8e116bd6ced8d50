//! Output reporters for audit results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON (the parsed result re-serialized)

mod json;
mod text;

use crate::models::AuditResult;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render an audit result in the specified format
pub fn report(result: &AuditResult, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(result, fmt)
}

/// Render an audit result using an OutputFormat enum
pub fn report_with_format(result: &AuditResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(result),
        OutputFormat::Json => json::render(result),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Create a representative AuditResult for testing
    pub(crate) fn test_result() -> AuditResult {
        use crate::models::ComplianceIssue;

        AuditResult {
            session_id: "sess-42".into(),
            video_id: "vid-7".into(),
            status: "completed".into(),
            compliance_results: vec![
                ComplianceIssue {
                    category: "Hate Speech".into(),
                    severity: "HIGH".into(),
                    time_stamp: Some("00:01:23".into()),
                    description: "Derogatory remarks about a protected group".into(),
                    flagged_text: Some("quoted segment".into()),
                    legal_reference: Some("DSA Art. 34".into()),
                    sub_category: Some("Slur".into()),
                    target_group: Some("ethnicity".into()),
                    confidence_score: Some(0.92),
                },
                ComplianceIssue {
                    category: "Misinformation".into(),
                    severity: "medium".into(),
                    description: "Unverified medical claim".into(),
                    ..Default::default()
                },
            ],
            final_report: Some("Two issues require review.\nSee details above.".into()),
            errors: vec![serde_json::json!("caption track missing")],
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("terminal").unwrap(),
            OutputFormat::Text
        );
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_report_dispatches_by_name() {
        let result = test_result();
        assert!(report(&result, "text").unwrap().contains("Hate Speech"));
        assert!(report(&result, "json").unwrap().contains("sess-42"));
    }
}
