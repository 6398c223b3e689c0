//! Identity maps over bookmark trees
//!
//! The merge diff is structural, by node id: a fresh, insertion-ordered
//! map is built for each side and passed explicitly between merge steps.
//! The walk is pre-order, so a parent always appears before its children
//! when the map is iterated; the reparent lookup in the merge depends on
//! that ordering being deterministic.
//!
//! The tree root itself is not indexed: the local sync folder and the
//! remote top level get different ids on different devices, and indexing
//! them would make each side's root look like an addition to the other.
//! "Parent is the root" is represented as `parent_id = None`.

use indexmap::IndexMap;

use crate::model::BookmarkItem;

/// Insertion-ordered map from node id to its index entry
pub type IdIndex = IndexMap<String, IndexEntry>;

/// What the merge needs to know about one node
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Node title
    pub title: String,
    /// Bookmark url; `None` for folders
    pub url: Option<String>,
    /// Milliseconds since epoch
    pub date_added: Option<i64>,
    /// Owning folder id; `None` when the parent is the tree root
    pub parent_id: Option<String>,
}

impl IndexEntry {
    /// Whether this entry describes a folder
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    /// Rebuild a shallow record from this entry
    ///
    /// Folders come back with an empty children list; the entry's own
    /// descendants carry their own index entries.
    pub fn to_item(&self, id: &str) -> BookmarkItem {
        match self.url {
            Some(ref url) => BookmarkItem::Bookmark {
                id: id.to_string(),
                title: self.title.clone(),
                date_added: self.date_added,
                url: url.clone(),
            },
            None => BookmarkItem::Folder {
                id: id.to_string(),
                title: self.title.clone(),
                date_added: self.date_added,
                children: Vec::new(),
            },
        }
    }
}

/// Build the identity map for every node below the given root
pub fn build_id_index(root: &BookmarkItem) -> IdIndex {
    let mut index = IndexMap::new();
    for child in root.children() {
        visit(child, None, &mut index);
    }
    index
}

fn visit(item: &BookmarkItem, parent_id: Option<&str>, index: &mut IdIndex) {
    index.insert(
        item.id().to_string(),
        IndexEntry {
            title: item.title().to_string(),
            url: item.url().map(str::to_string),
            date_added: match item {
                BookmarkItem::Bookmark { date_added, .. }
                | BookmarkItem::Folder { date_added, .. } => *date_added,
            },
            parent_id: parent_id.map(str::to_string),
        },
    );

    for child in item.children() {
        visit(child, Some(item.id()), index);
    }
}
