//! One-shot audit command
//!
//! Submits a single video URL, blocks with a spinner, prints the
//! rendered report to stdout (or a file) and exits. The spinner draws
//! to stderr so piped output stays clean.

use crate::api::AuditClient;
use crate::models::RiskLevel;
use crate::reporters;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};

pub fn run(
    endpoint: &str,
    timeout: Duration,
    url: &str,
    format: &str,
    output_path: Option<&Path>,
    fail_on_issues: bool,
) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        anyhow::bail!("Video URL must not be empty");
    }

    let client = AuditClient::new(endpoint, timeout);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Auditing {url} ..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let start_time = Instant::now();
    let result = match client.submit(url) {
        Ok(result) => {
            spinner.finish_with_message(format!(
                "{}Audit finished in {:.1}s",
                style("✓ ").green(),
                start_time.elapsed().as_secs_f64()
            ));
            result
        }
        Err(err) => {
            spinner.finish_and_clear();
            return Err(err.into());
        }
    };

    let rendered = reporters::report(&result, format)?;

    if let Some(out_path) = output_path {
        std::fs::write(out_path, &rendered)
            .with_context(|| format!("Failed to write report to {}", out_path.display()))?;
        println!(
            "{}Report written to: {}",
            style("📄 ").bold(),
            style(out_path.display()).cyan()
        );
    } else {
        println!("{rendered}");
    }

    // CI/CD threshold check
    if fail_on_issues && result.risk_level() == RiskLevel::HighRisk {
        eprintln!(
            "Failing due to --fail-on-issues: {} issue(s) flagged",
            result.issue_count()
        );
        std::process::exit(1);
    }

    Ok(())
}
