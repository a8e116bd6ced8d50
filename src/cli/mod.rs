//! CLI command definitions and handlers

mod audit;
mod doctor;
mod tui;

use crate::config::UserConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelcheck - video compliance auditing from the terminal
#[derive(Parser, Debug)]
#[command(name = "reelcheck")]
#[command(
    version,
    about = "Submit a video URL to a compliance-auditing service and review the flagged issues",
    long_about = "Reelcheck submits a video URL to a remote compliance-auditing service and \
renders the report it returns: severity-ranked issues, an executive summary, and \
pipeline warnings.\n\n\
Run without a subcommand to open the interactive console; use `audit` for a \
one-shot report suitable for scripting and CI.",
    after_help = "\
Examples:
  reelcheck                                    Open the interactive console
  reelcheck audit https://youtu.be/xyz         One-shot audit, text report
  reelcheck audit <url> --format json          JSON output for scripting
  reelcheck audit <url> --fail-on-issues       Exit 1 if anything is flagged (CI mode)
  reelcheck doctor                             Check config and service reachability

Documentation: https://github.com/reelcheck/reelcheck"
)]
pub struct Cli {
    /// Audit service base URL (overrides config file and REELCHECK_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a video URL and print the audit report
    #[command(after_help = "\
Examples:
  reelcheck audit https://youtu.be/xyz               Text report to the terminal
  reelcheck audit <url> --format json                JSON output for scripting
  reelcheck audit <url> -o report.json -f json       Write the report to a file
  reelcheck audit <url> --fail-on-issues             Exit code 1 if issues were flagged")]
    Audit {
        /// Video URL to audit
        #[arg(value_name = "URL")]
        url: String,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 if the audit flags any issues (CI mode)
        #[arg(long)]
        fail_on_issues: bool,
    },

    /// Open the interactive audit console (default when no subcommand)
    Tui,

    /// Check environment setup (config, service reachability, terminal)
    Doctor,

    /// Manage configuration (init, show, or set config values)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show current config and paths
    Show,
    /// Set a config value
    Set {
        /// Config key (endpoint, timeout_secs)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = UserConfig::load()?;
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| config.endpoint().to_string());
    let timeout = config.timeout();

    match cli.command {
        Some(Commands::Audit {
            url,
            format,
            output,
            fail_on_issues,
        }) => audit::run(
            &endpoint,
            timeout,
            &url,
            &format,
            output.as_deref(),
            fail_on_issues,
        ),

        Some(Commands::Tui) | None => tui::run(&endpoint, timeout),

        Some(Commands::Doctor) => doctor::run(&endpoint, timeout),

        Some(Commands::Config { action }) => run_config_action(action),

        Some(Commands::Version) => {
            println!("reelcheck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_config_action(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to point at your audit service:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export REELCHECK_ENDPOINT=\"http://localhost:8000\"");
            Ok(())
        }
        ConfigAction::Show => show_config(),
        ConfigAction::Set { key, value } => set_config_value(&key, &value),
    }
}

fn show_config() -> Result<()> {
    let config = UserConfig::load()?;
    println!("📁 Config path:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() {
            "✓"
        } else {
            "(not found)"
        };
        println!("  {} {}", user_path.display(), status);
    }
    println!();
    println!("🌐 Service:");
    println!("  Endpoint: {}", config.endpoint());
    println!("  Timeout:  {}s", config.timeout().as_secs());
    if std::env::var("REELCHECK_ENDPOINT").is_ok() {
        println!("  (endpoint comes from REELCHECK_ENDPOINT)");
    }
    Ok(())
}

/// Set a key in the config file. Edits the file view only, so an
/// environment override never gets written to disk.
fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = UserConfig::from_file().unwrap_or_default();

    match key {
        "endpoint" | "service.endpoint" => {
            config.service.endpoint = Some(value.to_string());
        }
        "timeout_secs" | "service.timeout_secs" => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("'{value}' is not a valid number of seconds"))?;
            config.service.timeout_secs = Some(secs);
        }
        _ => anyhow::bail!(
            "Unknown config key '{}'. Valid keys: endpoint, timeout_secs",
            key
        ),
    }

    let path = config.save()?;
    println!("✅ Set {} in {}", key, path.display());
    Ok(())
}
