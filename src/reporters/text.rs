//! Text (terminal) reporter with colors and formatting
//!
//! One-shot rendering of a full audit report: every issue is printed
//! fully disclosed since there is no interaction to expand it.

use crate::models::{AuditResult, ComplianceIssue, SeverityTier, StatusKind};
use anyhow::Result;
use chrono::Local;

/// Severity tier colors (ANSI escape codes)
fn tier_color(tier: SeverityTier) -> &'static str {
    match tier {
        SeverityTier::Critical => "\x1b[31m", // Red
        SeverityTier::High => "\x1b[91m",     // Light red
        SeverityTier::Medium => "\x1b[33m",   // Yellow
        SeverityTier::Low => "\x1b[34m",      // Blue
    }
}

/// Status colors
fn status_color(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Completed => "\x1b[32m", // Green
        StatusKind::Failed => "\x1b[31m",    // Red
        StatusKind::InProgress => "\x1b[33m", // Yellow
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[91m";

/// Render an audit result as formatted terminal output
pub fn render(result: &AuditResult) -> Result<String> {
    let mut out = String::new();

    // Header
    let status_c = status_color(result.status_kind());
    out.push_str(&format!("\n{BOLD}Reelcheck Audit{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Status: {status_c}{BOLD}{}{RESET}  ",
        result.status_label()
    ));
    let risk_c = match result.issue_count() {
        0 => GREEN,
        _ => RED,
    };
    out.push_str(&format!(
        "Risk: {risk_c}{}{RESET}  Issues: {}\n",
        result.risk_level().label(),
        result.issue_count()
    ));
    if !result.session_id.is_empty() || !result.video_id.is_empty() {
        out.push_str(&format!(
            "{DIM}Session: {}  Video: {}{RESET}\n",
            result.session_id, result.video_id
        ));
    }
    out.push_str(&format!(
        "{DIM}Generated: {}{RESET}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push('\n');

    // Issues, in the order the service returned them
    if result.compliance_results.is_empty() {
        out.push_str(&format!(
            "{GREEN}{BOLD}No Compliance Issues Found{RESET}\n"
        ));
        out.push_str(&format!(
            "{DIM}The video passed all hate speech and compliance checks.{RESET}\n\n"
        ));
    } else {
        out.push_str(&format!(
            "{BOLD}COMPLIANCE ISSUES{RESET} ({} total)\n",
            result.issue_count()
        ));
        for (i, issue) in result.compliance_results.iter().enumerate() {
            render_issue(&mut out, i + 1, issue);
        }
        out.push('\n');
    }

    // Executive summary, line breaks preserved
    out.push_str(&format!("{BOLD}EXECUTIVE SUMMARY{RESET}\n"));
    for line in result.summary_text().lines() {
        out.push_str(&format!("  {line}\n"));
    }
    out.push('\n');

    // Pipeline warnings, never escalated to a failure
    let warnings = result.warnings();
    if !warnings.is_empty() {
        out.push_str(&format!("{BOLD}\x1b[33mSYSTEM WARNINGS{RESET}\n"));
        for warning in &warnings {
            out.push_str(&format!("  {DIM}-{RESET} {warning}\n"));
        }
        out.push('\n');
    }

    Ok(out)
}

fn render_issue(out: &mut String, index: usize, issue: &ComplianceIssue) {
    let sev_c = tier_color(issue.tier());

    // Badge shows the service's severity text verbatim
    out.push_str(&format!(
        "\n  {DIM}{index:>3}.{RESET} {sev_c}[{}]{RESET} {BOLD}{}{RESET}",
        issue.severity, issue.category
    ));
    let ts = issue.time_stamp.as_deref().unwrap_or("N/A");
    out.push_str(&format!(" {DIM}@ {ts}{RESET}\n"));

    if !issue.description.is_empty() {
        out.push_str(&format!("       {}\n", issue.description));
    }
    let flagged = issue
        .flagged_text
        .as_deref()
        .unwrap_or("No text segment identified");
    out.push_str(&format!("       {DIM}Flagged:{RESET} \"{flagged}\"\n"));
    if let Some(reference) = &issue.legal_reference {
        out.push_str(&format!("       {DIM}Legal:{RESET} {reference}\n"));
    }

    let mut detail_parts = Vec::new();
    if let Some(sub) = &issue.sub_category {
        detail_parts.push(format!("Subcategory: {sub}"));
    }
    if let Some(group) = &issue.target_group {
        detail_parts.push(format!("Target: {group}"));
    }
    if let Some(score) = issue.confidence_score {
        detail_parts.push(format!("Confidence: {score:.2}"));
    }
    if !detail_parts.is_empty() {
        out.push_str(&format!("       {DIM}{}{RESET}\n", detail_parts.join("  ")));
    }
}
