//! Tab and history snapshot export
//!
//! One-directional uploads: unlike bookmarks there is no merge, each
//! device overwrites its own snapshot object, named
//! `tabs.<deviceName>.json` / `history.<deviceName>.json`. Devices are
//! enumerated by listing the collection and filtering filenames by
//! prefix; the device name is recovered from the middle of the filename.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::{self, Encryption};
use crate::config::Config;
use crate::error::SyncResult;
use crate::propfind::DavEntry;
use crate::webdav::{SnapshotStore, WebDavClient};

/// Which per-device snapshot family a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Open tabs
    Tabs,
    /// Browsing history
    History,
}

impl SnapshotKind {
    /// Filename prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            SnapshotKind::Tabs => "tabs.",
            SnapshotKind::History => "history.",
        }
    }

    /// Snapshot object name for a device
    pub fn filename(&self, device_name: &str) -> String {
        format!("{}{}.json", self.prefix(), device_name)
    }

    /// Recover the device name from a snapshot filename of this kind
    pub fn device_name_of(&self, filename: &str) -> Option<String> {
        filename
            .strip_prefix(self.prefix())?
            .strip_suffix(".json")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

/// One open tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

/// A device's uploaded tab list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabsSnapshot {
    pub device_name: String,
    /// Milliseconds since epoch
    pub last_sync: i64,
    pub tabs: Vec<TabRecord>,
}

/// One history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(default)]
    pub title: String,
    pub url: String,
    /// Milliseconds since epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_count: Option<i64>,
}

/// A device's uploaded history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub device_name: String,
    /// Milliseconds since epoch
    pub last_sync: i64,
    pub history: Vec<HistoryRecord>,
}

/// A per-device snapshot discovered on the server
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub filename: String,
    pub device_name: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Upload this device's open tabs, returning the object name
pub async fn upload_tabs(
    store: &dyn SnapshotStore,
    config: &Config,
    tabs: Vec<TabRecord>,
) -> SyncResult<String> {
    let snapshot = TabsSnapshot {
        device_name: config.device_name.clone(),
        last_sync: Utc::now().timestamp_millis(),
        tabs,
    };

    let filename = SnapshotKind::Tabs.filename(&config.device_name);
    let encryption = Encryption::from_config(&config.webdav);
    let body = codec::encode(&snapshot, &encryption)?;
    store.put(&filename, body).await?;

    info!(count = snapshot.tabs.len(), %filename, "tab snapshot uploaded");
    Ok(filename)
}

/// Upload this device's browsing history, returning the object name
pub async fn upload_history(
    store: &dyn SnapshotStore,
    config: &Config,
    history: Vec<HistoryRecord>,
) -> SyncResult<String> {
    let snapshot = HistorySnapshot {
        device_name: config.device_name.clone(),
        last_sync: Utc::now().timestamp_millis(),
        history,
    };

    let filename = SnapshotKind::History.filename(&config.device_name);
    let encryption = Encryption::from_config(&config.webdav);
    let body = codec::encode(&snapshot, &encryption)?;
    store.put(&filename, body).await?;

    info!(count = snapshot.history.len(), %filename, "history snapshot uploaded");
    Ok(filename)
}

/// Download and decode a device's tab snapshot
pub async fn download_tabs(
    store: &dyn SnapshotStore,
    config: &Config,
    filename: &str,
) -> SyncResult<TabsSnapshot> {
    let payload = store.get(filename).await?;
    codec::decode(&payload, &Encryption::from_config(&config.webdav))
}

/// Download and decode a device's history snapshot
pub async fn download_history(
    store: &dyn SnapshotStore,
    config: &Config,
    filename: &str,
) -> SyncResult<HistorySnapshot> {
    let payload = store.get(filename).await?;
    codec::decode(&payload, &Encryption::from_config(&config.webdav))
}

/// Enumerate the per-device snapshots of one kind on the server
pub async fn list_device_snapshots(
    client: &WebDavClient,
    kind: SnapshotKind,
) -> SyncResult<Vec<DeviceSnapshot>> {
    let entries = client.list().await?;
    Ok(filter_device_entries(entries, kind))
}

/// Keep the listing entries that name a snapshot of the given kind
fn filter_device_entries(entries: Vec<DavEntry>, kind: SnapshotKind) -> Vec<DeviceSnapshot> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let device_name = kind.device_name_of(&entry.filename)?;
            Some(DeviceSnapshot {
                filename: entry.filename,
                device_name,
                last_modified: entry.last_modified,
            })
        })
        .collect()
}
