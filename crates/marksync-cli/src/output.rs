//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output with info/success/warning/danger lines
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{DateTime, Local, Utc};
use marksync_core::export::{DeviceSnapshot, HistorySnapshot, TabsSnapshot};
use marksync_core::{Config, SyncReport};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"status": "info", "message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print what a sync invocation did
    pub fn print_report(&self, report: &SyncReport) {
        match self.format {
            OutputFormat::Human => {
                if report.bootstrap {
                    println!(
                        "✓ First sync: uploaded {} bookmark(s) to the server",
                        report.pushed_to_remote
                    );
                } else {
                    println!(
                        "✓ Sync complete: {} pushed to remote, {} created locally",
                        report.pushed_to_remote, report.created_locally
                    );
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "bootstrap": report.bootstrap,
                        "pushed_to_remote": report.pushed_to_remote,
                        "created_locally": report.created_locally,
                    })
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print the discovered device snapshots
    pub fn print_devices(&self, devices: &[DeviceSnapshot]) {
        match self.format {
            OutputFormat::Human => {
                if devices.is_empty() {
                    println!("No device snapshots found.");
                    return;
                }
                for device in devices {
                    println!(
                        "{} | {} | {}",
                        device.device_name,
                        device.filename,
                        format_modified(device.last_modified)
                    );
                }
                println!("\n{} device(s)", devices.len());
            }
            OutputFormat::Json => {
                let entries: Vec<_> = devices
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "device_name": d.device_name,
                            "filename": d.filename,
                            "last_modified": d.last_modified.map(|t| t.to_rfc3339()),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries).unwrap());
            }
            OutputFormat::Quiet => {
                for device in devices {
                    println!("{}", device.device_name);
                }
            }
        }
    }

    /// Print a device's tab snapshot
    pub fn print_tabs(&self, snapshot: &TabsSnapshot) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "Tabs on '{}' (synced {}):",
                    snapshot.device_name,
                    format_millis(snapshot.last_sync)
                );
                println!();
                for tab in &snapshot.tabs {
                    println!("{} | {}", truncate(&tab.title, 40), tab.url);
                }
                println!("\n{} tab(s)", snapshot.tabs.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(snapshot).unwrap());
            }
            OutputFormat::Quiet => {
                for tab in &snapshot.tabs {
                    println!("{}", tab.url);
                }
            }
        }
    }

    /// Print a device's history snapshot
    pub fn print_history(&self, snapshot: &HistorySnapshot) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "History on '{}' (synced {}):",
                    snapshot.device_name,
                    format_millis(snapshot.last_sync)
                );
                println!();
                for entry in &snapshot.history {
                    let visits = entry
                        .visit_count
                        .map(|n| format!(" ({} visits)", n))
                        .unwrap_or_default();
                    println!("{} | {}{}", truncate(&entry.title, 40), entry.url, visits);
                }
                println!("\n{} entry(ies)", snapshot.history.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(snapshot).unwrap());
            }
            OutputFormat::Quiet => {
                for entry in &snapshot.history {
                    println!("{}", entry.url);
                }
            }
        }
    }

    /// Print the configuration with secrets redacted
    pub fn print_config(&self, config: &Config) {
        match self.format {
            OutputFormat::Human => {
                println!("Device name:       {}", config.device_name);
                println!("Data directory:    {}", config.data_dir.display());
                println!();
                println!("WebDAV URL:        {}", or_unset(&config.webdav.url));
                println!("WebDAV username:   {}", or_unset(&config.webdav.username));
                println!("WebDAV password:   {}", redact(&config.webdav.password));
                println!("Encryption:        {}", on_off(config.webdav.enable_aes));
                println!("Encryption key:    {}", redact(&config.webdav.aes_key));
                println!();
                println!("Bookmark path:     {}", or_unset(&config.bookmarks.sync_path));
                println!("Snapshot filename: {}", config.bookmarks.filename);
                println!("Auto backup:       {}", on_off(config.bookmarks.auto_backup));
                println!(
                    "Auto sync:         {} (every {}s)",
                    on_off(config.bookmarks.enable_auto_sync),
                    config.bookmarks.sync_interval
                );
                println!(
                    "Tabs auto sync:    {} (every {}s)",
                    on_off(config.tabs.enable_auto_sync),
                    config.tabs.sync_interval
                );
                println!(
                    "History auto sync: {} (every {}s)",
                    on_off(config.history.enable_auto_sync),
                    config.history.sync_interval
                );
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "device_name": config.device_name,
                        "data_dir": config.data_dir,
                        "webdav": {
                            "url": config.webdav.url,
                            "username": config.webdav.username,
                            "password": redact(&config.webdav.password),
                            "enable_aes": config.webdav.enable_aes,
                        },
                        "bookmarks": {
                            "sync_path": config.bookmarks.sync_path,
                            "filename": config.bookmarks.filename,
                            "auto_backup": config.bookmarks.auto_backup,
                            "enable_auto_sync": config.bookmarks.enable_auto_sync,
                            "sync_interval": config.bookmarks.sync_interval,
                        },
                    })
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn format_modified(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "unknown".to_string(),
    }
}

fn format_millis(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(t) => t
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "unknown".to_string(),
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "(not set)"
    } else {
        "********"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact(""), "(not set)");
        assert_eq!(redact("hunter2"), "********");
    }
}
