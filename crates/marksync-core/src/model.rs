//! Data models for Marksync
//!
//! Two tree representations exist side by side:
//!
//! - [`BookmarkNode`] is the native profile tree as the browser-side store
//!   hands it out: ids are opaque per-profile strings, folders carry a
//!   `children` list, bookmarks carry a `url`.
//! - [`BookmarkItem`] is the formatted record stored remotely: a tagged
//!   union (`"type": "bookmark" | "folder"`) that keeps the native id
//!   verbatim, which is what makes records from two different trees
//!   comparable during a merge.

use serde::{Deserialize, Serialize};

/// A node in the native bookmark tree
///
/// Invariant: a node is a bookmark iff it has a `url` and no children; a
/// node is a folder iff it has `children` (possibly empty) and no `url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    /// Opaque identifier, stable within one browser profile
    pub id: String,
    /// Display title; empty for the synthetic root
    #[serde(default)]
    pub title: String,
    /// Present iff the node is a bookmark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Milliseconds since epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    /// Owning folder id; absent for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Present iff the node is a folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    /// Create a folder node with the given id and title
    pub fn folder(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            date_added: None,
            parent_id: None,
            children: Some(Vec::new()),
        }
    }

    /// Create a bookmark node with the given id, title, and url
    pub fn bookmark(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            date_added: None,
            parent_id: None,
            children: None,
        }
    }

    /// Whether this node is a bookmark (has a url)
    pub fn is_bookmark(&self) -> bool {
        self.url.is_some()
    }

    /// Whether this node is a folder
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    /// Direct children, empty for bookmarks
    pub fn children(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Find a node by id anywhere in this subtree
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Find a node by id anywhere in this subtree, mutably
    pub fn find_mut(&mut self, id: &str) -> Option<&mut BookmarkNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }
}

/// The formatted record stored remotely
///
/// Serialized form matches the snapshot documents other devices read:
/// `{"id", "title", "dateAdded", "type": "bookmark" | "folder", "url"?,
/// "children"?}`. A folder serialized without `children` deserializes with
/// an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkItem {
    /// A leaf bookmark
    #[serde(rename_all = "camelCase")]
    Bookmark {
        id: String,
        #[serde(default)]
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_added: Option<i64>,
        url: String,
    },
    /// A folder of further items
    #[serde(rename_all = "camelCase")]
    Folder {
        id: String,
        #[serde(default)]
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_added: Option<i64>,
        #[serde(default)]
        children: Vec<BookmarkItem>,
    },
}

impl BookmarkItem {
    /// The record id, preserved verbatim from the source node
    pub fn id(&self) -> &str {
        match self {
            BookmarkItem::Bookmark { id, .. } | BookmarkItem::Folder { id, .. } => id,
        }
    }

    /// The record title
    pub fn title(&self) -> &str {
        match self {
            BookmarkItem::Bookmark { title, .. } | BookmarkItem::Folder { title, .. } => title,
        }
    }

    /// The bookmark url, `None` for folders
    pub fn url(&self) -> Option<&str> {
        match self {
            BookmarkItem::Bookmark { url, .. } => Some(url),
            BookmarkItem::Folder { .. } => None,
        }
    }

    /// Children of a folder; empty for bookmarks
    pub fn children(&self) -> &[BookmarkItem] {
        match self {
            BookmarkItem::Folder { children, .. } => children,
            BookmarkItem::Bookmark { .. } => &[],
        }
    }

    /// Mutable children, `None` for bookmarks
    pub fn children_mut(&mut self) -> Option<&mut Vec<BookmarkItem>> {
        match self {
            BookmarkItem::Folder { children, .. } => Some(children),
            BookmarkItem::Bookmark { .. } => None,
        }
    }

    /// Total number of records in this subtree, the root excluded
    pub fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Normalize an arbitrary decoded document into a folder
    ///
    /// A remote document that decodes to a bare bookmark (or a folder that
    /// was serialized without children) is given an empty children list so
    /// the merge engine always sees a folder at the top level.
    pub fn into_folder(self) -> BookmarkItem {
        match self {
            folder @ BookmarkItem::Folder { .. } => folder,
            BookmarkItem::Bookmark {
                id,
                title,
                date_added,
                ..
            } => BookmarkItem::Folder {
                id,
                title,
                date_added,
                children: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        let folder = BookmarkNode::folder("1", "Work");
        assert!(folder.is_folder());
        assert!(!folder.is_bookmark());
        assert!(folder.children().is_empty());

        let bookmark = BookmarkNode::bookmark("2", "Example", "https://example.com");
        assert!(bookmark.is_bookmark());
        assert!(!bookmark.is_folder());
    }

    #[test]
    fn test_node_find() {
        let mut root = BookmarkNode::folder("0", "");
        let mut folder = BookmarkNode::folder("1", "Work");
        folder
            .children
            .as_mut()
            .unwrap()
            .push(BookmarkNode::bookmark("2", "Example", "https://example.com"));
        root.children.as_mut().unwrap().push(folder);

        assert_eq!(root.find("2").unwrap().title, "Example");
        assert!(root.find("99").is_none());

        root.find_mut("1").unwrap().title = "Projects".to_string();
        assert_eq!(root.find("1").unwrap().title, "Projects");
    }

    #[test]
    fn test_item_serialization_tags() {
        let item = BookmarkItem::Bookmark {
            id: "7".to_string(),
            title: "Example".to_string(),
            date_added: Some(1700000000000),
            url: "https://example.com".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"bookmark\""));
        assert!(json.contains("\"dateAdded\":1700000000000"));

        let back: BookmarkItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn test_folder_without_children_deserializes_empty() {
        let json = r#"{"type":"folder","id":"1","title":"Work"}"#;
        let item: BookmarkItem = serde_json::from_str(json).unwrap();
        assert!(item.children().is_empty());
    }

    #[test]
    fn test_into_folder_normalizes_bookmark() {
        let item = BookmarkItem::Bookmark {
            id: "1".to_string(),
            title: "X".to_string(),
            date_added: None,
            url: "http://x".to_string(),
        };
        let folder = item.into_folder();
        assert!(matches!(folder, BookmarkItem::Folder { .. }));
        assert!(folder.children().is_empty());
        assert_eq!(folder.id(), "1");
    }

    #[test]
    fn test_descendant_count() {
        let tree = BookmarkItem::Folder {
            id: "0".to_string(),
            title: "Sync".to_string(),
            date_added: None,
            children: vec![
                BookmarkItem::Bookmark {
                    id: "1".to_string(),
                    title: "X".to_string(),
                    date_added: None,
                    url: "http://x".to_string(),
                },
                BookmarkItem::Folder {
                    id: "2".to_string(),
                    title: "Nested".to_string(),
                    date_added: None,
                    children: vec![BookmarkItem::Bookmark {
                        id: "3".to_string(),
                        title: "Y".to_string(),
                        date_added: None,
                        url: "http://y".to_string(),
                    }],
                },
            ],
        };
        assert_eq!(tree.descendant_count(), 3);
    }
}
