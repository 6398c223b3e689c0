//! Bookmark sync command handlers

use anyhow::Result;

use marksync_core::{Config, ProfileBookmarks, SyncEngine, WebDavClient};

use crate::output::Output;

/// Run one bidirectional bookmark sync
pub async fn sync(config: &Config, output: &Output) -> Result<()> {
    let client = WebDavClient::new(&config.webdav)?;
    let bookmarks = ProfileBookmarks::load(config.profile_path())?;
    let engine = SyncEngine::new(&client, &bookmarks);

    output.message("Syncing bookmarks...");
    let report = engine.sync_bookmarks(config).await?;
    output.print_report(&report);
    Ok(())
}

/// Upload the configured folder as the remote snapshot
pub async fn export(config: &Config, output: &Output) -> Result<()> {
    let client = WebDavClient::new(&config.webdav)?;
    let bookmarks = ProfileBookmarks::load(config.profile_path())?;
    let engine = SyncEngine::new(&client, &bookmarks);

    output.message("Exporting bookmarks...");
    let count = engine.export_bookmarks(config).await?;
    output.success(&format!(
        "Exported {} bookmark(s) to {}",
        count, config.bookmarks.filename
    ));
    Ok(())
}

/// Replace the configured folder with the remote snapshot
pub async fn import(config: &Config, force: bool, output: &Output) -> Result<()> {
    if !force && output.should_prompt() {
        use std::io::{self, Write};

        print!(
            "This replaces everything under '{}' with the remote snapshot. Continue? [y/N] ",
            config.bookmarks.sync_path
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            output.message("Import cancelled.");
            return Ok(());
        }
    }

    let client = WebDavClient::new(&config.webdav)?;
    let bookmarks = ProfileBookmarks::load(config.profile_path())?;
    let engine = SyncEngine::new(&client, &bookmarks);

    output.message("Importing bookmarks...");
    let created = engine.import_bookmarks(config).await?;
    output.success(&format!("Imported {} bookmark(s)", created));
    Ok(())
}
