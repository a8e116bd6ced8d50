//! Doctor command - check environment

use crate::api::AuditClient;
use crate::config::UserConfig;
use anyhow::Result;
use std::time::Duration;

pub fn run(endpoint: &str, timeout: Duration) -> Result<()> {
    println!("🩺 Reelcheck Doctor\n");

    // Config file
    match UserConfig::user_config_path() {
        Some(path) if path.exists() => println!("✓ Config file: {}", path.display()),
        Some(path) => println!(
            "○ Config file: {} (not found, defaults in use)",
            path.display()
        ),
        None => println!("○ Config file: no config directory on this system"),
    }

    // Effective settings
    println!("✓ Endpoint: {endpoint}");
    if std::env::var("REELCHECK_ENDPOINT").is_ok() {
        println!("  (set via REELCHECK_ENDPOINT)");
    }
    println!("✓ Timeout: {}s", timeout.as_secs());

    // Service reachability; short timeout so doctor stays snappy
    let probe_client = AuditClient::new(endpoint, Duration::from_secs(5).min(timeout));
    let service_ok = match probe_client.probe() {
        Ok(status) => {
            println!("✓ Audit service: reachable (HTTP {status})");
            true
        }
        Err(err) => {
            println!("✗ Audit service: {err}");
            println!("  Is the service running? Set the URL with: reelcheck config set endpoint <url>");
            false
        }
    };

    // Terminal capability for the interactive console
    if console::Term::stdout().is_term() {
        println!("✓ Terminal: interactive console available");
    } else {
        println!("○ Terminal: not a TTY (use `reelcheck audit` for one-shot reports)");
    }

    if service_ok {
        println!("\n✅ All checks passed!");
    } else {
        println!("\n⚠️  Service unreachable. The console will start, but audits will fail until it is up.");
    }
    Ok(())
}
