//! Marksync Core Library
//!
//! This crate provides the core functionality for Marksync, a utility
//! that synchronizes browser bookmarks, open tabs, and browsing history
//! against a user-controlled WebDAV server, with optional symmetric
//! encryption of the payloads.
//!
//! # Architecture
//!
//! Bookmarks sync bidirectionally: the local folder and the remote
//! snapshot are diffed by node id and additions from each side are
//! applied to the other; deletions never propagate. Tabs and history are
//! one-directional snapshot uploads, one object per device. The WebDAV
//! object is the single source of truth for the last known remote state;
//! no local cache of it is kept.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let client = WebDavClient::new(&config.webdav)?;
//! let bookmarks = ProfileBookmarks::load(config.profile_path())?;
//!
//! let engine = SyncEngine::new(&client, &bookmarks);
//! let report = engine.sync_bookmarks(&config).await?;
//! ```
//!
//! # Modules
//!
//! - `sync`: merge engine, identity maps, scheduler (main entry point)
//! - `model`: native tree nodes and formatted records
//! - `format`: native tree to record projection
//! - `codec`/`crypto`: snapshot payload encoding and encryption
//! - `webdav`/`propfind`: the WebDAV transport
//! - `bookmarks`: local bookmark profile storage
//! - `resolver`: slash-path folder resolution
//! - `export`: tab and history snapshot uploads
//! - `config`: application configuration

pub mod bookmarks;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod format;
pub mod model;
pub mod propfind;
pub mod resolver;
pub mod sync;
pub mod webdav;

pub use bookmarks::{BookmarkStore, ProfileBookmarks};
pub use config::{Config, WebdavConfig};
pub use error::{SyncError, SyncResult};
pub use model::{BookmarkItem, BookmarkNode};
pub use sync::{SyncEngine, SyncReport, SyncScheduler, SyncTarget};
pub use webdav::{SnapshotStore, WebDavClient};
