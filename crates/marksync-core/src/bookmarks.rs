//! Local bookmark profile storage
//!
//! The browser-side bookmark tree is an external collaborator; the sync
//! engine only depends on the [`BookmarkStore`] trait (tree query plus
//! create/remove operations). [`ProfileBookmarks`] is the file-backed
//! reference implementation: a single JSON document holding the native
//! tree, written atomically (temp file, then rename) after every mutation.
//! Constructed without a path it keeps the tree in memory only, which is
//! what the tests use.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};
use crate::model::BookmarkNode;

/// Native bookmark tree operations, as the sync engine sees them
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// The full tree, rooted at the synthetic root node
    async fn tree(&self) -> SyncResult<BookmarkNode>;

    /// Direct children of the named node
    async fn children(&self, id: &str) -> SyncResult<Vec<BookmarkNode>>;

    /// Create a folder under the named parent, returning the new node
    async fn create_folder(&self, parent_id: &str, title: &str) -> SyncResult<BookmarkNode>;

    /// Create a bookmark under the named parent, returning the new node
    async fn create_bookmark(
        &self,
        parent_id: &str,
        title: &str,
        url: &str,
    ) -> SyncResult<BookmarkNode>;

    /// Remove the named node and everything beneath it
    async fn remove_subtree(&self, id: &str) -> SyncResult<()>;
}

/// File-backed bookmark profile
pub struct ProfileBookmarks {
    root: Mutex<BookmarkNode>,
    path: Option<PathBuf>,
}

impl ProfileBookmarks {
    /// Load a profile from disk, seeding a fresh one if the file is absent
    pub fn load(path: impl Into<PathBuf>) -> SyncResult<Self> {
        let path = path.into();
        let root = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            default_profile()
        };

        Ok(Self {
            root: Mutex::new(root),
            path: Some(path),
        })
    }

    /// A fresh in-memory profile (not persisted)
    pub fn in_memory() -> Self {
        Self {
            root: Mutex::new(default_profile()),
            path: None,
        }
    }

    /// An in-memory profile with the given root (test setup)
    pub fn with_root(root: BookmarkNode) -> Self {
        Self {
            root: Mutex::new(root),
            path: None,
        }
    }

    /// Persist the current tree when backed by a file
    fn save(&self, root: &BookmarkNode) -> SyncResult<()> {
        if let Some(ref path) = self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(root)?;
            atomic_write(path, json.as_bytes())?;
        }
        Ok(())
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl BookmarkStore for ProfileBookmarks {
    async fn tree(&self) -> SyncResult<BookmarkNode> {
        Ok(self.root.lock().await.clone())
    }

    async fn children(&self, id: &str) -> SyncResult<Vec<BookmarkNode>> {
        let root = self.root.lock().await;
        let node = root
            .find(id)
            .ok_or_else(|| SyncError::NodeNotFound(id.to_string()))?;
        Ok(node.children().to_vec())
    }

    async fn create_folder(&self, parent_id: &str, title: &str) -> SyncResult<BookmarkNode> {
        let mut root = self.root.lock().await;
        let node = BookmarkNode {
            id: Self::new_id(),
            title: title.to_string(),
            url: None,
            date_added: Some(Utc::now().timestamp_millis()),
            parent_id: Some(parent_id.to_string()),
            children: Some(Vec::new()),
        };
        attach(&mut root, parent_id, node.clone())?;
        self.save(&root)?;
        Ok(node)
    }

    async fn create_bookmark(
        &self,
        parent_id: &str,
        title: &str,
        url: &str,
    ) -> SyncResult<BookmarkNode> {
        let mut root = self.root.lock().await;
        let node = BookmarkNode {
            id: Self::new_id(),
            title: title.to_string(),
            url: Some(url.to_string()),
            date_added: Some(Utc::now().timestamp_millis()),
            parent_id: Some(parent_id.to_string()),
            children: None,
        };
        attach(&mut root, parent_id, node.clone())?;
        self.save(&root)?;
        Ok(node)
    }

    async fn remove_subtree(&self, id: &str) -> SyncResult<()> {
        let mut root = self.root.lock().await;
        if !remove_in(&mut root, id) {
            return Err(SyncError::NodeNotFound(id.to_string()));
        }
        self.save(&root)?;
        Ok(())
    }
}

/// Attach a node to the named parent folder
fn attach(root: &mut BookmarkNode, parent_id: &str, node: BookmarkNode) -> SyncResult<()> {
    let parent = root
        .find_mut(parent_id)
        .ok_or_else(|| SyncError::NodeNotFound(parent_id.to_string()))?;
    if parent.is_bookmark() {
        return Err(SyncError::NodeNotFound(format!(
            "'{}' is not a folder",
            parent_id
        )));
    }
    parent.children.get_or_insert_with(Vec::new).push(node);
    Ok(())
}

/// Remove a node by id anywhere below the given node
fn remove_in(node: &mut BookmarkNode, id: &str) -> bool {
    let Some(ref mut children) = node.children else {
        return false;
    };
    if let Some(pos) = children.iter().position(|c| c.id == id) {
        children.remove(pos);
        return true;
    }
    children.iter_mut().any(|c| remove_in(c, id))
}

/// Fresh profile: a synthetic root with the two standard containers
fn default_profile() -> BookmarkNode {
    let mut bar = BookmarkNode::folder("1", "Bookmarks bar");
    bar.parent_id = Some("0".to_string());
    let mut other = BookmarkNode::folder("2", "Other bookmarks");
    other.parent_id = Some("0".to_string());

    let mut root = BookmarkNode::folder("0", "");
    root.children = Some(vec![bar, other]);
    root
}

/// Write bytes to a temp file, then rename over the target path
fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}
