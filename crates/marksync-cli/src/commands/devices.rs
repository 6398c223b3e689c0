//! Device snapshot command handlers
//!
//! Tabs and history live in per-device objects on the server
//! (`tabs.<device>.json`, `history.<device>.json`); these commands
//! enumerate, inspect, and remove them.

use anyhow::{bail, Result};

use marksync_core::export::{self, SnapshotKind};
use marksync_core::{Config, WebDavClient};

use crate::output::Output;

/// List the devices that have uploaded a snapshot of this kind
pub async fn list(config: &Config, kind: SnapshotKind, output: &Output) -> Result<()> {
    let client = WebDavClient::new(&config.webdav)?;
    let devices = export::list_device_snapshots(&client, kind).await?;
    output.print_devices(&devices);
    Ok(())
}

/// Show one device's snapshot contents
pub async fn show(
    config: &Config,
    kind: SnapshotKind,
    device_name: &str,
    output: &Output,
) -> Result<()> {
    let client = WebDavClient::new(&config.webdav)?;
    let filename = kind.filename(device_name);

    match kind {
        SnapshotKind::Tabs => {
            let snapshot = export::download_tabs(&client, config, &filename).await?;
            output.print_tabs(&snapshot);
        }
        SnapshotKind::History => {
            let snapshot = export::download_history(&client, config, &filename).await?;
            output.print_history(&snapshot);
        }
    }
    Ok(())
}

/// Delete one device's snapshot from the server
pub async fn delete(
    config: &Config,
    kind: SnapshotKind,
    device_name: &str,
    output: &Output,
) -> Result<()> {
    let client = WebDavClient::new(&config.webdav)?;
    let filename = kind.filename(device_name);

    if let Err(err) = client.delete(&filename).await {
        if err.is_not_found() {
            bail!("No snapshot found for device '{}'", device_name);
        }
        return Err(err.into());
    }

    output.success(&format!("Deleted {}", filename));
    Ok(())
}
