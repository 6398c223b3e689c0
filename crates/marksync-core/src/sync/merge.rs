//! Bookmark tree merge
//!
//! The two-sided reconciliation at the heart of a sync: given the
//! formatted local tree and the decoded remote tree, compute the remote
//! tree to upload and the list of local creations to apply. The diff is an
//! identity-map comparison: any id present on one side and absent from
//! the other was added on the side that has it. Deletions never
//! propagate; the merge is additive-only.
//!
//! Local additions are appended to the remote tree as shallow records:
//! the parent recorded for the node is used when that parent exists in
//! the remote index, otherwise the node lands in the remote top-level
//! children. The index is built once from the fetched remote tree and not
//! updated mid-merge, so a parent and child both created locally since
//! the last sync flatten to the top level. This is the documented fallback, not
//! a reconstruction of their nesting.

use tracing::debug;

use super::index::build_id_index;
use crate::model::BookmarkItem;

/// One node to create under the local sync folder
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCreation {
    /// Remote id of the node (for logging; the local store assigns its own)
    pub id: String,
    /// Node title
    pub title: String,
    /// Bookmark url; `None` creates a folder
    pub url: Option<String>,
}

/// Result of merging the two trees
#[derive(Debug)]
pub struct MergePlan {
    /// The remote tree with local additions appended; this is what gets
    /// uploaded
    pub remote: BookmarkItem,
    /// Number of nodes appended to the remote tree
    pub remote_additions: usize,
    /// Nodes present remotely but not locally, to create under the sync
    /// folder
    pub local_creations: Vec<LocalCreation>,
}

/// Merge the formatted local tree into the decoded remote tree
///
/// `remote` must be a folder; callers normalize with
/// [`BookmarkItem::into_folder`] first.
pub fn merge_trees(local: &BookmarkItem, mut remote: BookmarkItem) -> MergePlan {
    let local_index = build_id_index(local);
    let remote_index = build_id_index(&remote);

    let mut remote_additions = 0;

    // Local additions, in pre-order so parents are considered before
    // their children
    for (id, entry) in &local_index {
        if remote_index.contains_key(id) {
            continue;
        }

        let item = entry.to_item(id);
        let parent = entry
            .parent_id
            .as_deref()
            .filter(|pid| remote_index.get(*pid).is_some_and(|e| e.is_folder()));

        match parent {
            Some(pid) => {
                debug!(id = %id, parent = pid, "appending local addition under remote parent");
                if let Some(children) = folder_children_mut(&mut remote, pid) {
                    children.push(item);
                    remote_additions += 1;
                }
            }
            None => {
                debug!(id = %id, "appending local addition to remote top level");
                if let Some(children) = remote.children_mut() {
                    children.push(item);
                    remote_additions += 1;
                }
            }
        }
    }

    // Remote additions become local creations under the sync folder
    let local_creations = remote_index
        .iter()
        .filter(|(id, _)| !local_index.contains_key(*id))
        .map(|(id, entry)| LocalCreation {
            id: id.clone(),
            title: entry.title.clone(),
            url: entry.url.clone(),
        })
        .collect();

    MergePlan {
        remote,
        remote_additions,
        local_creations,
    }
}

/// Children list of the named folder anywhere in the tree
fn folder_children_mut<'a>(
    item: &'a mut BookmarkItem,
    id: &str,
) -> Option<&'a mut Vec<BookmarkItem>> {
    if item.id() == id {
        return item.children_mut();
    }
    match item {
        BookmarkItem::Folder { children, .. } => children
            .iter_mut()
            .find_map(|child| folder_children_mut(child, id)),
        BookmarkItem::Bookmark { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark(id: &str, title: &str, url: &str) -> BookmarkItem {
        BookmarkItem::Bookmark {
            id: id.to_string(),
            title: title.to_string(),
            date_added: None,
            url: url.to_string(),
        }
    }

    fn folder(id: &str, title: &str, children: Vec<BookmarkItem>) -> BookmarkItem {
        BookmarkItem::Folder {
            id: id.to_string(),
            title: title.to_string(),
            date_added: None,
            children,
        }
    }

    #[test]
    fn test_concrete_scenario() {
        // Local /Sync has bookmarks 1 and 2; the prior remote snapshot
        // only knows bookmark 1.
        let local = folder(
            "sync",
            "Sync",
            vec![
                bookmark("1", "X", "http://x"),
                bookmark("2", "Y", "http://y"),
            ],
        );
        let remote = folder("remote", "Sync", vec![bookmark("1", "X", "http://x")]);

        let plan = merge_trees(&local, remote);

        let ids: Vec<_> = plan.remote.children().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(plan.remote_additions, 1);
        assert!(plan.local_creations.is_empty());
    }

    #[test]
    fn test_additive_union_disjoint_ids() {
        let local = folder(
            "sync",
            "Sync",
            vec![
                bookmark("1", "A", "http://a"),
                bookmark("2", "B", "http://b"),
            ],
        );
        let remote = folder("remote", "Sync", vec![bookmark("3", "C", "http://c")]);

        let plan = merge_trees(&local, remote);

        // Remote ends with the union
        assert_eq!(plan.remote.descendant_count(), 3);
        // Local gets what it was missing
        assert_eq!(plan.local_creations.len(), 1);
        assert_eq!(plan.local_creations[0].id, "3");
        assert_eq!(plan.local_creations[0].url.as_deref(), Some("http://c"));
    }

    #[test]
    fn test_no_deletions_propagate() {
        // Bookmark 1 was removed locally but still exists remotely: it is
        // re-created locally, never deleted remotely.
        let local = folder("sync", "Sync", vec![]);
        let remote = folder("remote", "Sync", vec![bookmark("1", "Kept", "http://kept")]);

        let plan = merge_trees(&local, remote);

        assert_eq!(plan.remote.descendant_count(), 1);
        assert_eq!(plan.local_creations.len(), 1);
        assert_eq!(plan.local_creations[0].title, "Kept");
    }

    #[test]
    fn test_local_addition_under_known_remote_parent() {
        // Folder 10 exists on both sides; bookmark 11 was added inside it
        // locally and must land inside it remotely.
        let local = folder(
            "sync",
            "Sync",
            vec![folder("10", "Work", vec![bookmark("11", "New", "http://new")])],
        );
        let remote = folder("remote", "Sync", vec![folder("10", "Work", vec![])]);

        let plan = merge_trees(&local, remote);

        let work = &plan.remote.children()[0];
        assert_eq!(work.id(), "10");
        assert_eq!(work.children().len(), 1);
        assert_eq!(work.children()[0].id(), "11");
        assert_eq!(plan.remote_additions, 1);
    }

    #[test]
    fn test_new_local_subtree_flattens_to_top_level() {
        // Folder 10 and its bookmark 11 were both created locally since
        // the last sync. The folder is appended shallow and the bookmark
        // falls back to the top level: the remote index never learns
        // about 10 mid-merge.
        let local = folder(
            "sync",
            "Sync",
            vec![folder("10", "Fresh", vec![bookmark("11", "Inside", "http://in")])],
        );
        let remote = folder("remote", "Sync", vec![bookmark("1", "Old", "http://old")]);

        let plan = merge_trees(&local, remote);

        let top_ids: Vec<_> = plan.remote.children().iter().map(|c| c.id()).collect();
        assert_eq!(top_ids, vec!["1", "10", "11"]);

        // The appended folder is shallow; 11 is not duplicated inside it
        let fresh = plan
            .remote
            .children()
            .iter()
            .find(|c| c.id() == "10")
            .unwrap();
        assert!(fresh.children().is_empty());
        assert_eq!(plan.remote.descendant_count(), 3);
    }

    #[test]
    fn test_parent_that_is_a_bookmark_falls_back_to_top_level() {
        // Degenerate data: the recorded parent id exists remotely but
        // names a bookmark. The addition lands at the top level.
        let local = folder(
            "sync",
            "Sync",
            vec![folder("5", "Odd", vec![bookmark("6", "Child", "http://c")])],
        );
        let remote = folder("remote", "Sync", vec![bookmark("5", "Odd", "http://odd")]);

        let plan = merge_trees(&local, remote);
        let top_ids: Vec<_> = plan.remote.children().iter().map(|c| c.id()).collect();
        assert_eq!(top_ids, vec!["5", "6"]);
    }

    #[test]
    fn test_identical_trees_are_a_no_op() {
        let tree = folder(
            "sync",
            "Sync",
            vec![
                bookmark("1", "A", "http://a"),
                folder("2", "F", vec![bookmark("3", "B", "http://b")]),
            ],
        );
        let remote = folder(
            "remote",
            "Sync",
            vec![
                bookmark("1", "A", "http://a"),
                folder("2", "F", vec![bookmark("3", "B", "http://b")]),
            ],
        );

        let plan = merge_trees(&tree, remote.clone());
        assert_eq!(plan.remote, remote);
        assert_eq!(plan.remote_additions, 0);
        assert!(plan.local_creations.is_empty());
    }

    #[test]
    fn test_remote_nested_additions_become_flat_creations() {
        // A folder with content added on another device: the folder and
        // its bookmark each get their own creation entry.
        let local = folder("sync", "Sync", vec![]);
        let remote = folder(
            "remote",
            "Sync",
            vec![folder("20", "Theirs", vec![bookmark("21", "Deep", "http://d")])],
        );

        let plan = merge_trees(&local, remote);

        let ids: Vec<_> = plan.local_creations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["20", "21"]);
        assert!(plan.local_creations[0].url.is_none());
        assert!(plan.local_creations[1].url.is_some());
    }
}
