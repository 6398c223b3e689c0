//! Error handling for sync operations
//!
//! Provides typed errors for the sync pipeline. The variants mirror how a
//! sync invocation can fail: incomplete configuration (checked before any
//! network call), transport failures, unreadable remote payloads, and
//! missing local folders. A 404 from the remote is a distinguished,
//! recoverable condition rather than a transport failure.

use thiserror::Error;

/// Errors that can occur during sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// WebDAV or sync configuration is missing required fields
    #[error("Configuration incomplete: {0}")]
    ConfigIncomplete(String),

    /// The remote object does not exist (HTTP 404)
    ///
    /// Recoverable: the merge engine treats this as "first sync, upload
    /// local state" rather than a failure.
    #[error("Remote object not found: '{0}'")]
    NotFound(String),

    /// The server answered with a non-success status other than 404
    #[error("WebDAV request for '{filename}' failed with status {status}")]
    Http { status: u16, filename: String },

    /// Connection-level transport failure
    #[error("WebDAV transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Encryption of the outgoing payload failed
    #[error("Encryption failed")]
    Encryption,

    /// Decryption failed: wrong key or corrupted payload
    #[error("Decryption failed: wrong key or corrupted data")]
    Decryption,

    /// The (decrypted) payload is not valid JSON
    #[error("Failed to parse snapshot data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Encryption key outside the accepted 16-32 byte range
    #[error("Encryption key must be 16-32 bytes, got {0}")]
    KeyLength(usize),

    /// A segment of the configured sync path does not exist
    #[error("Bookmark folder not found: '{0}'")]
    FolderNotFound(String),

    /// A referenced bookmark node does not exist in the local store
    #[error("Bookmark node not found: '{0}'")]
    NodeNotFound(String),

    /// Local profile storage failure
    #[error("Profile storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl SyncError {
    /// Whether this error means "the remote object is absent"
    ///
    /// The bootstrap path in the merge engine keys off this.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
