//! WebDAV snapshot store
//!
//! The transport primitive the sync engine builds on: PUT (create or
//! replace), GET (404 distinguished as [`SyncError::NotFound`]), DELETE,
//! and PROPFIND `Depth: 1` listing, all with HTTP Basic authentication.
//! The merge engine consumes this through the [`SnapshotStore`] trait, a
//! key-value blob store keyed by filename, so tests can substitute an
//! in-memory implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Method, StatusCode};
use tracing::debug;

use crate::config::WebdavConfig;
use crate::error::{SyncError, SyncResult};
use crate::propfind::{self, DavEntry};

/// Blob store keyed by filename, as seen by the sync engine
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Upload a payload as the named object, creating or replacing it
    async fn put(&self, filename: &str, body: String) -> SyncResult<()>;

    /// Download the named object
    ///
    /// An absent object is [`SyncError::NotFound`], not a transport
    /// failure.
    async fn get(&self, filename: &str) -> SyncResult<String>;
}

/// WebDAV client bound to one configured collection
#[derive(Debug)]
pub struct WebDavClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl WebDavClient {
    /// Create a client from the WebDAV configuration
    ///
    /// Fails with [`SyncError::ConfigIncomplete`] when the url or
    /// credentials are missing; this is checked before any network call.
    pub fn new(config: &WebdavConfig) -> SyncResult<Self> {
        if !config.is_complete() {
            return Err(SyncError::ConfigIncomplete(
                "WebDAV url, username, and password are required".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(&config.url),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// The normalized base URL (always one trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a named object under the base collection
    fn object_url(&self, filename: &str) -> String {
        format!("{}{}", self.base_url, filename)
    }

    /// Delete the named object
    pub async fn delete(&self, filename: &str) -> SyncResult<()> {
        debug!(filename, "webdav delete");
        let response = self
            .http
            .delete(self.object_url(filename))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(SyncError::NotFound(filename.to_string())),
            status => Err(SyncError::Http {
                status: status.as_u16(),
                filename: filename.to_string(),
            }),
        }
    }

    /// List the base collection with PROPFIND `Depth: 1`
    pub async fn list(&self) -> SyncResult<Vec<DavEntry>> {
        debug!(base = %self.base_url, "webdav propfind");
        let propfind =
            Method::from_bytes(b"PROPFIND").expect("PROPFIND is a valid HTTP method");

        let response = self
            .http
            .request(propfind, &self.base_url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Depth", "1")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Http {
                status: status.as_u16(),
                filename: "/".to_string(),
            });
        }

        let body = response.text().await?;
        Ok(propfind::parse_multistatus(&body))
    }
}

#[async_trait]
impl SnapshotStore for WebDavClient {
    async fn put(&self, filename: &str, body: String) -> SyncResult<()> {
        debug!(filename, bytes = body.len(), "webdav put");
        let response = self
            .http
            .put(self.object_url(filename))
            .basic_auth(&self.username, Some(&self.password))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::Http {
                status: status.as_u16(),
                filename: filename.to_string(),
            })
        }
    }

    async fn get(&self, filename: &str) -> SyncResult<String> {
        debug!(filename, "webdav get");
        let response = self
            .http
            .get(self.object_url(filename))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.text().await?),
            StatusCode::NOT_FOUND => Err(SyncError::NotFound(filename.to_string())),
            status => Err(SyncError::Http {
                status: status.as_u16(),
                filename: filename.to_string(),
            }),
        }
    }
}

/// Normalize a base URL to carry exactly one trailing slash
pub fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

/// Dated backup name for a snapshot filename
///
/// `bookmarks.json` with 2026-08-06 becomes
/// `bookmarks.backup.2026-08-06.json`.
pub fn backup_filename(filename: &str, date: NaiveDate) -> String {
    let stem = filename.strip_suffix(".json").unwrap_or(filename);
    format!("{}.backup.{}.json", stem, date.format("%Y-%m-%d"))
}
