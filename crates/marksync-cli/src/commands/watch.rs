//! Watch command handler
//!
//! Runs the periodic bookmark sync in the foreground until interrupted.
//! Tabs and history snapshots need a live browser to read from, so only
//! the bookmark target is schedulable here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::info;

use marksync_core::{Config, ProfileBookmarks, SyncEngine, SyncScheduler, SyncTarget, WebDavClient};

use crate::output::Output;

/// Run scheduled syncs until Ctrl-C
pub async fn run(config: Config, output: &Output) -> Result<()> {
    if !config.bookmarks.enable_auto_sync {
        bail!(
            "Bookmark auto-sync is disabled. Enable it with:\n  \
             marksync config set bookmarks.enable_auto_sync true"
        );
    }
    config.validate_for_sync()?;

    let interval = Duration::from_secs(config.bookmarks.sync_interval.max(1));
    let client = Arc::new(WebDavClient::new(&config.webdav)?);
    let bookmarks = Arc::new(ProfileBookmarks::load(config.profile_path())?);
    let config = Arc::new(config);

    let mut scheduler = SyncScheduler::new();
    scheduler.start(SyncTarget::Bookmarks, interval, true, move || {
        let client = client.clone();
        let bookmarks = bookmarks.clone();
        let config = config.clone();
        async move {
            let engine = SyncEngine::new(&*client, &*bookmarks);
            let report = engine.sync_bookmarks(&config).await?;
            info!(
                pushed = report.pushed_to_remote,
                created = report.created_locally,
                "scheduled bookmark sync finished"
            );
            Ok(())
        }
    });

    output.message(&format!(
        "Watching: bookmark sync every {}s. Press Ctrl-C to stop.",
        interval.as_secs()
    ));

    tokio::signal::ctrl_c().await?;
    scheduler.stop_all();
    output.message("Stopped.");
    Ok(())
}
