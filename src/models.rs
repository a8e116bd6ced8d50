//! Core data models for Reelcheck
//!
//! These are the wire types exchanged with the compliance-auditing
//! service plus the read-only derivations the renderers share. Every
//! response field is serde-defaulted: a missing field is absent data,
//! never a parse failure.

use serde::{Deserialize, Serialize};

/// Request body for `POST /audit`.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRequest {
    pub video_url: String,
}

/// Display tier derived from a raw severity label.
///
/// The service emits severity as free-form text ("HIGH", "critical",
/// typos included); this is the closed set the UI styles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SeverityTier {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityTier {
    /// Map a raw severity label to its display tier.
    ///
    /// Case-insensitive; unknown or absent labels fall back to `Low`.
    /// Total by construction, so rendering never fails on a label the
    /// service invents later.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw.unwrap_or("").trim().to_ascii_lowercase().as_str() {
            "critical" => SeverityTier::Critical,
            "high" => SeverityTier::High,
            "medium" => SeverityTier::Medium,
            _ => SeverityTier::Low,
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityTier::Low => write!(f, "low"),
            SeverityTier::Medium => write!(f, "medium"),
            SeverityTier::High => write!(f, "high"),
            SeverityTier::Critical => write!(f, "critical"),
        }
    }
}

/// One flagged finding within an audit report
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ComplianceIssue {
    #[serde(default)]
    pub category: String,
    /// Raw severity text from the service; shown verbatim in badges,
    /// styled via [`SeverityTier::classify`].
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flagged_text: Option<String>,
    #[serde(default)]
    pub legal_reference: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub target_group: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

impl ComplianceIssue {
    pub fn tier(&self) -> SeverityTier {
        SeverityTier::classify(Some(&self.severity))
    }
}

/// Status style class for the session-status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Completed,
    Failed,
    InProgress,
}

/// Coarse risk flag derived from the issue count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Safe,
    HighRisk,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe Content",
            RiskLevel::HighRisk => "High Risk Content",
        }
    }
}

/// Full report for one audit, as returned by the service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditResult {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub status: String,
    /// Order is the service's display order; never reorder.
    #[serde(default)]
    pub compliance_results: Vec<ComplianceIssue>,
    #[serde(default)]
    pub final_report: Option<String>,
    /// Pipeline warnings. Entries may be plain strings or structured
    /// values; a non-empty list still counts as a successful audit.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

const NO_SUMMARY: &str = "No summary report available.";

impl AuditResult {
    pub fn issue_count(&self) -> usize {
        self.compliance_results.len()
    }

    /// The service's status text, or an `UNKNOWN` marker when absent.
    pub fn status_label(&self) -> &str {
        if self.status.is_empty() {
            "UNKNOWN"
        } else {
            &self.status
        }
    }

    pub fn status_kind(&self) -> StatusKind {
        match self.status.to_ascii_lowercase().as_str() {
            "completed" => StatusKind::Completed,
            "failed" => StatusKind::Failed,
            _ => StatusKind::InProgress,
        }
    }

    /// Heuristic only: any flagged issue means high risk, none means
    /// safe. The service does not report a risk score.
    pub fn risk_level(&self) -> RiskLevel {
        if self.compliance_results.is_empty() {
            RiskLevel::Safe
        } else {
            RiskLevel::HighRisk
        }
    }

    /// Executive summary text, verbatim (line breaks intact), or a
    /// placeholder when the service sent none.
    pub fn summary_text(&self) -> &str {
        match self.final_report.as_deref() {
            Some(report) if !report.is_empty() => report,
            _ => NO_SUMMARY,
        }
    }

    /// Pipeline warnings in readable form. String entries pass through;
    /// structured entries are serialized to compact JSON.
    pub fn warnings(&self) -> Vec<String> {
        self.errors.iter().map(warning_line).collect()
    }
}

fn warning_line(entry: &serde_json::Value) -> String {
    match entry {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_is_case_insensitive() {
        for raw in ["critical", "CRITICAL", "Critical", "  critical "] {
            assert_eq!(SeverityTier::classify(Some(raw)), SeverityTier::Critical);
        }
        assert_eq!(SeverityTier::classify(Some("HIGH")), SeverityTier::High);
        assert_eq!(SeverityTier::classify(Some("high")), SeverityTier::High);
        assert_eq!(SeverityTier::classify(Some("MeDiUm")), SeverityTier::Medium);
    }

    #[test]
    fn classify_defaults_to_low() {
        assert_eq!(SeverityTier::classify(None), SeverityTier::Low);
        assert_eq!(SeverityTier::classify(Some("")), SeverityTier::Low);
        assert_eq!(
            SeverityTier::classify(Some("unrecognized")),
            SeverityTier::Low
        );
        assert_eq!(SeverityTier::classify(Some("low")), SeverityTier::Low);
    }

    #[test]
    fn parse_tolerates_missing_fields() {
        let result: AuditResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.issue_count(), 0);
        assert_eq!(result.status_label(), "UNKNOWN");
        assert_eq!(result.status_kind(), StatusKind::InProgress);
        assert_eq!(result.risk_level(), RiskLevel::Safe);
        assert_eq!(result.summary_text(), "No summary report available.");
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn parse_preserves_issue_order() {
        let body = json!({
            "status": "completed",
            "compliance_results": [
                {"category": "third", "severity": "low"},
                {"category": "first", "severity": "CRITICAL"},
                {"category": "second", "severity": "medium"}
            ]
        });
        let result: AuditResult = serde_json::from_value(body).unwrap();
        let order: Vec<&str> = result
            .compliance_results
            .iter()
            .map(|i| i.category.as_str())
            .collect();
        assert_eq!(order, ["third", "first", "second"]);
    }

    #[test]
    fn status_kind_matches_case_insensitively() {
        let mut result = AuditResult {
            status: "COMPLETED".into(),
            ..Default::default()
        };
        assert_eq!(result.status_kind(), StatusKind::Completed);
        result.status = "Failed".into();
        assert_eq!(result.status_kind(), StatusKind::Failed);
        result.status = "indexing".into();
        assert_eq!(result.status_kind(), StatusKind::InProgress);
    }

    #[test]
    fn risk_level_tracks_issue_count() {
        let mut result = AuditResult::default();
        assert_eq!(result.risk_level(), RiskLevel::Safe);
        result.compliance_results.push(ComplianceIssue::default());
        assert_eq!(result.risk_level(), RiskLevel::HighRisk);
        assert_eq!(result.risk_level().label(), "High Risk Content");
    }

    #[test]
    fn empty_final_report_falls_back_to_placeholder() {
        let result = AuditResult {
            final_report: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(result.summary_text(), "No summary report available.");
    }

    #[test]
    fn issue_tier_reads_raw_severity() {
        let issue = ComplianceIssue {
            severity: "HIGH".into(),
            ..Default::default()
        };
        assert_eq!(issue.tier(), SeverityTier::High);
        assert_eq!(issue.severity, "HIGH");
    }

    #[test]
    fn warnings_serialize_structured_entries() {
        let result = AuditResult {
            errors: vec![
                json!("transcript extraction failed"),
                json!({"error": "timeout"}),
            ],
            ..Default::default()
        };
        let warnings = result.warnings();
        assert_eq!(warnings[0], "transcript extraction failed");
        assert_eq!(warnings[1], r#"{"error":"timeout"}"#);
    }
}
