//! Bookmark tree formatter
//!
//! Projects a native [`BookmarkNode`] subtree into the [`BookmarkItem`]
//! records stored remotely. The projection keeps ids verbatim and never
//! reorders children; everything the merge engine does rests on those two
//! properties.

use crate::model::{BookmarkItem, BookmarkNode};

/// Format a native node (folder or leaf) into a serializable record
///
/// A node with a url becomes a [`BookmarkItem::Bookmark`]; anything else
/// becomes a [`BookmarkItem::Folder`] with recursively formatted children
/// (empty when the node has none). Idempotent in the sense that formatting
/// the same tree twice yields identical records.
pub fn format(node: &BookmarkNode) -> BookmarkItem {
    match node.url {
        Some(ref url) => BookmarkItem::Bookmark {
            id: node.id.clone(),
            title: node.title.clone(),
            date_added: node.date_added,
            url: url.clone(),
        },
        None => BookmarkItem::Folder {
            id: node.id.clone(),
            title: node.title.clone(),
            date_added: node.date_added,
            children: node.children().iter().map(format).collect(),
        },
    }
}
