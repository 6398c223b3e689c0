//! Remote snapshot codec
//!
//! Turns snapshot documents (the bookmark tree, tab and history exports)
//! into the transport payload stored on the WebDAV server and back. Without
//! encryption the payload is pretty-printed JSON; with encryption enabled
//! the JSON text is encrypted into an opaque string via [`crate::crypto`].

use serde::{de::DeserializeOwned, Serialize};

use crate::config::WebdavConfig;
use crate::crypto;
use crate::error::{SyncError, SyncResult};

/// Payload encryption mode, derived from the WebDAV configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encryption {
    /// Plain pretty-printed JSON
    None,
    /// AES-encrypted JSON with the given key
    Aes { key: String },
}

impl Encryption {
    /// Derive the encryption mode from a WebDAV configuration
    ///
    /// Encryption applies only when it is enabled and a key is present;
    /// the key itself was validated when the configuration was saved.
    pub fn from_config(config: &WebdavConfig) -> Self {
        if config.enable_aes && !config.aes_key.is_empty() {
            Encryption::Aes {
                key: config.aes_key.clone(),
            }
        } else {
            Encryption::None
        }
    }
}

/// Encode a snapshot document for upload
pub fn encode<T: Serialize>(value: &T, encryption: &Encryption) -> SyncResult<String> {
    match encryption {
        Encryption::None => Ok(serde_json::to_string_pretty(value)?),
        Encryption::Aes { key } => {
            let json = serde_json::to_string(value)?;
            crypto::encrypt_text(&json, key)
        }
    }
}

/// Decode a downloaded payload into a snapshot document
///
/// Fails with [`SyncError::Decryption`] when the payload cannot be
/// decrypted and [`SyncError::Parse`] when the plaintext is not valid JSON.
pub fn decode<T: DeserializeOwned>(payload: &str, encryption: &Encryption) -> SyncResult<T> {
    match encryption {
        Encryption::None => serde_json::from_str(payload).map_err(SyncError::Parse),
        Encryption::Aes { key } => {
            let json = crypto::decrypt_text(payload, key)?;
            serde_json::from_str(&json).map_err(SyncError::Parse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookmarkItem;

    fn sample_tree() -> BookmarkItem {
        BookmarkItem::Folder {
            id: "1".to_string(),
            title: "Sync".to_string(),
            date_added: Some(1700000000000),
            children: vec![BookmarkItem::Bookmark {
                id: "2".to_string(),
                title: "Example".to_string(),
                date_added: Some(1700000000001),
                url: "https://example.com".to_string(),
            }],
        }
    }

    fn aes() -> Encryption {
        Encryption::Aes {
            key: "0123456789abcdef".to_string(),
        }
    }

    #[test]
    fn test_plain_encode_is_pretty_json() {
        let payload = encode(&sample_tree(), &Encryption::None).unwrap();
        assert!(payload.contains('\n'));
        assert!(payload.contains("\"type\": \"folder\""));
    }

    #[test]
    fn test_plain_round_trip() {
        let tree = sample_tree();
        let payload = encode(&tree, &Encryption::None).unwrap();
        let back: BookmarkItem = decode(&payload, &Encryption::None).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn test_encrypted_round_trip() {
        let tree = sample_tree();
        let payload = encode(&tree, &aes()).unwrap();
        assert!(!payload.contains("example.com"));
        let back: BookmarkItem = decode(&payload, &aes()).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn test_wrong_key_decode() {
        let payload = encode(&sample_tree(), &aes()).unwrap();
        let other = Encryption::Aes {
            key: "fedcba9876543210".to_string(),
        };
        let err = decode::<BookmarkItem>(&payload, &other).unwrap_err();
        assert!(matches!(err, SyncError::Decryption));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = decode::<BookmarkItem>("{not json", &Encryption::None).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));

        let payload = crypto::encrypt_text("{not json", "0123456789abcdef").unwrap();
        let err = decode::<BookmarkItem>(&payload, &aes()).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_from_config() {
        let mut config = WebdavConfig::default();
        assert_eq!(Encryption::from_config(&config), Encryption::None);

        config.enable_aes = true;
        assert_eq!(Encryption::from_config(&config), Encryption::None);

        config.aes_key = "0123456789abcdef".to_string();
        assert_eq!(
            Encryption::from_config(&config),
            Encryption::Aes {
                key: "0123456789abcdef".to_string()
            }
        );
    }
}
