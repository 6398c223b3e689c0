//! Bookmark synchronization
//!
//! The merge core and its orchestration:
//!
//! - `index`: pure identity-map construction over formatted trees
//! - `merge`: the two-sided additive merge computation
//! - `engine`: one sync invocation end to end (fetch, diff, apply, upload)
//! - `scheduler`: periodic sync tasks with explicit lifecycle and a
//!   single-flight guard per target

mod engine;
mod index;
mod merge;
mod scheduler;

pub use engine::{SyncEngine, SyncReport};
pub use index::{build_id_index, IdIndex, IndexEntry};
pub use merge::{merge_trees, LocalCreation, MergePlan};
pub use scheduler::{SyncScheduler, SyncTarget, TaskState};
