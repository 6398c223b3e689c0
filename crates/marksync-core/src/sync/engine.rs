//! Sync engine
//!
//! Drives one bookmark sync invocation end to end: fetch the remote
//! snapshot, diff it against the formatted local folder, apply remote
//! additions locally, and upload the merged tree. The engine holds no
//! state between invocations: every sync computes from the current local
//! tree and the current remote snapshot, and the WebDAV object is the
//! single source of truth for the last known remote state.
//!
//! Also exposes the one-way operations: `export_bookmarks` uploads local
//! state as-is, `import_bookmarks` replaces the local folder with the
//! remote snapshot.

use async_recursion::async_recursion;
use chrono::Utc;
use tracing::{info, warn};

use super::merge;
use crate::bookmarks::BookmarkStore;
use crate::codec::{self, Encryption};
use crate::config::Config;
use crate::error::SyncResult;
use crate::format;
use crate::model::BookmarkItem;
use crate::resolver;
use crate::webdav::{backup_filename, SnapshotStore};

/// What one sync invocation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// True when no remote snapshot existed and local state was uploaded
    pub bootstrap: bool,
    /// Nodes appended to the remote tree
    pub pushed_to_remote: usize,
    /// Nodes created under the local sync folder
    pub created_locally: usize,
}

/// Bookmark sync engine over a snapshot store and a local bookmark store
pub struct SyncEngine<'a> {
    store: &'a dyn SnapshotStore,
    bookmarks: &'a dyn BookmarkStore,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine over the given stores
    pub fn new(store: &'a dyn SnapshotStore, bookmarks: &'a dyn BookmarkStore) -> Self {
        Self { store, bookmarks }
    }

    /// Run one bidirectional sync of the configured bookmark folder
    ///
    /// Steps run strictly in order: fetch remote, format local, diff by
    /// id, append local additions to the remote tree, create remote
    /// additions locally, upload the merged tree. A missing remote object
    /// bootstraps by uploading local state; any other transport or decode
    /// error aborts with no partial remote write.
    pub async fn sync_bookmarks(&self, config: &Config) -> SyncResult<SyncReport> {
        config.validate_for_sync()?;
        let encryption = Encryption::from_config(&config.webdav);

        let target =
            resolver::resolve_or_create(self.bookmarks, &config.bookmarks.sync_path).await?;
        let local = format::format(&target);

        let payload = match self.store.get(&config.bookmarks.filename).await {
            Ok(payload) => payload,
            Err(err) if err.is_not_found() => {
                info!("no remote snapshot yet, uploading local bookmarks");
                self.upload_snapshot(config, &encryption, &local).await?;
                return Ok(SyncReport {
                    bootstrap: true,
                    pushed_to_remote: local.descendant_count(),
                    created_locally: 0,
                });
            }
            Err(err) => return Err(err),
        };

        let remote: BookmarkItem = codec::decode(&payload, &encryption)?;
        let plan = merge::merge_trees(&local, remote.into_folder());

        let mut created = 0;
        for creation in &plan.local_creations {
            let result = match creation.url {
                Some(ref url) => {
                    self.bookmarks
                        .create_bookmark(&target.id, &creation.title, url)
                        .await
                }
                None => self.bookmarks.create_folder(&target.id, &creation.title).await,
            };
            match result {
                Ok(_) => created += 1,
                Err(err) => {
                    warn!(title = %creation.title, error = %err, "skipping local node creation");
                }
            }
        }

        self.upload_snapshot(config, &encryption, &plan.remote).await?;

        info!(
            pushed = plan.remote_additions,
            created, "bookmark sync complete"
        );
        Ok(SyncReport {
            bootstrap: false,
            pushed_to_remote: plan.remote_additions,
            created_locally: created,
        })
    }

    /// Upload the configured folder as the remote snapshot, one-way
    ///
    /// Unlike [`SyncEngine::sync_bookmarks`], this fails when the
    /// configured folder does not exist.
    pub async fn export_bookmarks(&self, config: &Config) -> SyncResult<usize> {
        config.validate_for_sync()?;
        let encryption = Encryption::from_config(&config.webdav);

        let target = resolver::resolve(self.bookmarks, &config.bookmarks.sync_path).await?;
        let local = format::format(&target);

        self.upload_snapshot(config, &encryption, &local).await?;
        Ok(local.descendant_count())
    }

    /// Replace the configured folder with the remote snapshot, one-way
    ///
    /// Clears the folder, then recreates the remote tree recursively.
    /// Returns the number of nodes created.
    pub async fn import_bookmarks(&self, config: &Config) -> SyncResult<usize> {
        config.validate_for_sync()?;
        let encryption = Encryption::from_config(&config.webdav);

        let target = resolver::resolve(self.bookmarks, &config.bookmarks.sync_path).await?;
        let payload = self.store.get(&config.bookmarks.filename).await?;
        let remote: BookmarkItem = codec::decode(&payload, &encryption)?;

        for child in self.bookmarks.children(&target.id).await? {
            self.bookmarks.remove_subtree(&child.id).await?;
        }

        let created = match remote {
            BookmarkItem::Folder { ref children, .. } => {
                let mut created = 0;
                for child in children {
                    created += create_recursive(self.bookmarks, &target.id, child).await?;
                }
                created
            }
            ref bookmark @ BookmarkItem::Bookmark { .. } => {
                create_recursive(self.bookmarks, &target.id, bookmark).await?
            }
        };

        info!(created, "bookmark import complete");
        Ok(created)
    }

    /// Encode and upload a snapshot, with the dated backup copy when
    /// auto-backup is enabled
    ///
    /// A backup failure is logged but does not fail the primary upload.
    async fn upload_snapshot(
        &self,
        config: &Config,
        encryption: &Encryption,
        tree: &BookmarkItem,
    ) -> SyncResult<()> {
        let body = codec::encode(tree, encryption)?;
        let filename = &config.bookmarks.filename;

        self.store.put(filename, body.clone()).await?;

        if config.bookmarks.auto_backup {
            let backup = backup_filename(filename, Utc::now().date_naive());
            if let Err(err) = self.store.put(&backup, body).await {
                warn!(filename = %backup, error = %err, "backup upload failed");
            }
        }

        Ok(())
    }
}

/// Create a record and its descendants under the given parent
#[async_recursion]
async fn create_recursive(
    store: &dyn BookmarkStore,
    parent_id: &str,
    item: &BookmarkItem,
) -> SyncResult<usize> {
    match item {
        BookmarkItem::Bookmark { title, url, .. } => {
            let title = fallback_title(title, "Untitled bookmark");
            store.create_bookmark(parent_id, title, url).await?;
            Ok(1)
        }
        BookmarkItem::Folder {
            title, children, ..
        } => {
            let title = fallback_title(title, "Untitled folder");
            let folder = store.create_folder(parent_id, title).await?;
            let mut created = 1;
            for child in children {
                created += create_recursive(store, &folder.id, child).await?;
            }
            Ok(created)
        }
    }
}

fn fallback_title<'t>(title: &'t str, fallback: &'t str) -> &'t str {
    if title.is_empty() {
        fallback
    } else {
        title
    }
}
