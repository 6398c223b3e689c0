//! Folder resolver
//!
//! Resolves a slash-delimited folder path (e.g. `/Bookmarks bar/Work`)
//! against the native bookmark tree. The walk starts at the root and
//! matches each segment against the current node's direct children by
//! exact, case-sensitive folder title; the first match in native child
//! order wins when titles are duplicated. Empty segments from leading,
//! trailing, or doubled slashes are ignored.

use crate::bookmarks::BookmarkStore;
use crate::error::{SyncError, SyncResult};
use crate::model::BookmarkNode;

/// Resolve a path, failing if any segment is missing
pub async fn resolve(store: &dyn BookmarkStore, path: &str) -> SyncResult<BookmarkNode> {
    let mut current = store.tree().await?;

    for segment in segments(path) {
        match find_child_folder(&current, segment) {
            Some(child) => current = child,
            None => return Err(SyncError::FolderNotFound(path.to_string())),
        }
    }

    Ok(current)
}

/// Resolve a path, creating missing folders along the way
///
/// Total for well-formed paths, at the cost of being able to silently
/// create folder structure during a sync.
pub async fn resolve_or_create(
    store: &dyn BookmarkStore,
    path: &str,
) -> SyncResult<BookmarkNode> {
    let mut current = store.tree().await?;

    for segment in segments(path) {
        current = match find_child_folder(&current, segment) {
            Some(child) => child,
            None => store.create_folder(&current.id, segment).await?,
        };
    }

    Ok(current)
}

/// Non-empty path segments
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// First direct child folder with the given title
fn find_child_folder(node: &BookmarkNode, title: &str) -> Option<BookmarkNode> {
    node.children()
        .iter()
        .find(|child| child.is_folder() && child.title == title)
        .cloned()
}
