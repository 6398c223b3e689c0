//! Status command handler

use anyhow::Result;

use marksync_core::{Config, ProfileBookmarks, BookmarkStore};

use crate::output::Output;

/// Show configuration readiness and the local profile summary
pub async fn show(config: &Config, output: &Output) -> Result<()> {
    if output.is_quiet() {
        return Ok(());
    }

    if config.webdav.is_complete() {
        output.success("WebDAV configured");
    } else {
        output.warning("WebDAV not configured - run `marksync config set webdav.url ...`");
    }

    if config.bookmarks.sync_path.is_empty() {
        output.warning("Bookmark sync path not set - run `marksync config set bookmarks.sync_path ...`");
    } else {
        output.message(&format!("Sync path: {}", config.bookmarks.sync_path));
    }

    let profile_path = config.profile_path();
    if profile_path.exists() {
        let bookmarks = ProfileBookmarks::load(&profile_path)?;
        let tree = bookmarks.tree().await?;
        output.message(&format!(
            "Local profile: {} ({} top-level folder(s))",
            profile_path.display(),
            tree.children().len()
        ));
    } else {
        output.message(&format!(
            "Local profile: {} (will be created on first sync)",
            profile_path.display()
        ));
    }

    Ok(())
}
