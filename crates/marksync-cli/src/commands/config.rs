//! Config command handlers

use anyhow::{bail, Context, Result};

use marksync_core::Config;

use crate::output::Output;

/// Show the current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;
    output.print_config(&config);
    if output.should_prompt() {
        println!();
        println!("Config file: {}", Config::config_file_path().display());
    }
    Ok(())
}

/// Set a configuration value and save
pub fn set(key: &str, value: &str, output: &Output) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "device_name" => config.device_name = value.to_string(),
        "data_dir" => config.data_dir = value.into(),
        "webdav.url" => config.webdav.url = value.to_string(),
        "webdav.username" => config.webdav.username = value.to_string(),
        "webdav.password" => config.webdav.password = value.to_string(),
        "webdav.enable_aes" => config.webdav.enable_aes = parse_bool(value)?,
        "webdav.aes_key" => config.webdav.aes_key = value.to_string(),
        "bookmarks.sync_path" => config.bookmarks.sync_path = value.to_string(),
        "bookmarks.filename" => config.bookmarks.filename = value.to_string(),
        "bookmarks.auto_backup" => config.bookmarks.auto_backup = parse_bool(value)?,
        "bookmarks.enable_auto_sync" => config.bookmarks.enable_auto_sync = parse_bool(value)?,
        "bookmarks.sync_interval" => config.bookmarks.sync_interval = parse_secs(value)?,
        "tabs.enable_auto_sync" => config.tabs.enable_auto_sync = parse_bool(value)?,
        "tabs.sync_interval" => config.tabs.sync_interval = parse_secs(value)?,
        "history.enable_auto_sync" => config.history.enable_auto_sync = parse_bool(value)?,
        "history.sync_interval" => config.history.sync_interval = parse_secs(value)?,
        _ => bail!(
            "Unknown configuration key '{}'. Run `marksync config show` for the available keys.",
            key
        ),
    }

    // save() validates, which is where a bad AES key length is caught
    config.save()?;
    output.success(&format!("Set {}", key));
    Ok(())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => bail!("Expected a boolean, got '{}'", value),
    }
}

fn parse_secs(value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .with_context(|| format!("Expected a number of seconds, got '{}'", value))
}
