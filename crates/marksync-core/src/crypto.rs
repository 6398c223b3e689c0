//! Symmetric payload encryption
//!
//! Snapshot documents are optionally encrypted with a user-supplied key of
//! 16-32 bytes before upload. The cipher is 256 bit AES-GCM; the AES key is
//! the SHA-256 digest of the configured key string, the nonce is 12 random
//! bytes, and the wire format is `base64(nonce || ciphertext)` so the
//! payload stays an opaque string inside a JSON-typed WebDAV object.
//!
//! Key length is validated when the configuration is saved, not here;
//! encrypt/decrypt assume a pre-validated key.

use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{SyncError, SyncResult};

/// Minimum accepted key length in bytes
pub const MIN_KEY_LEN: usize = 16;
/// Maximum accepted key length in bytes
pub const MAX_KEY_LEN: usize = 32;

const NONCE_LEN: usize = 12;

/// Check that a key is within the accepted 16-32 byte range
pub fn validate_key(key: &str) -> SyncResult<()> {
    let len = key.len();
    if (MIN_KEY_LEN..=MAX_KEY_LEN).contains(&len) {
        Ok(())
    } else {
        Err(SyncError::KeyLength(len))
    }
}

/// Derive the 32 byte AES key from the configured key string
fn derive_key(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

/// Encrypt plaintext with the given key, producing an opaque string
pub fn encrypt_text(plaintext: &str, key: &str) -> SyncResult<String> {
    let cipher =
        Aes256Gcm::new_from_slice(&derive_key(key)).map_err(|_| SyncError::Encryption)?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| SyncError::Encryption)?;

    let mut body = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    body.extend_from_slice(&nonce);
    body.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(body))
}

/// Decrypt an opaque payload with the given key
///
/// Fails with [`SyncError::Decryption`] when the payload is not valid
/// base64, is too short to carry a nonce, fails GCM authentication (wrong
/// key or tampered data), or decrypts to an empty plaintext.
pub fn decrypt_text(payload: &str, key: &str) -> SyncResult<String> {
    let body = STANDARD
        .decode(payload.trim())
        .map_err(|_| SyncError::Decryption)?;
    if body.len() <= NONCE_LEN {
        return Err(SyncError::Decryption);
    }
    let (nonce, ciphertext) = body.split_at(NONCE_LEN);

    let cipher =
        Aes256Gcm::new_from_slice(&derive_key(key)).map_err(|_| SyncError::Decryption)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SyncError::Decryption)?;

    let text = String::from_utf8(plaintext).map_err(|_| SyncError::Decryption)?;
    if text.is_empty() {
        return Err(SyncError::Decryption);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_key_lengths() {
        for len in [MIN_KEY_LEN, 24, MAX_KEY_LEN] {
            let key = "k".repeat(len);
            let payload = encrypt_text("hello bookmarks", &key).unwrap();
            assert_ne!(payload, "hello bookmarks");
            let plain = decrypt_text(&payload, &key).unwrap();
            assert_eq!(plain, "hello bookmarks");
        }
    }

    #[test]
    fn test_wrong_key_is_decryption_error() {
        let payload = encrypt_text("secret data", "correct-key-16ch").unwrap();
        let err = decrypt_text(&payload, "wrong-key-16char").unwrap_err();
        assert!(matches!(err, SyncError::Decryption));
    }

    #[test]
    fn test_tampered_payload_is_decryption_error() {
        let payload = encrypt_text("secret data", "correct-key-16ch").unwrap();
        let mut bytes = STANDARD.decode(&payload).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let tampered = STANDARD.encode(bytes);

        let err = decrypt_text(&tampered, "correct-key-16ch").unwrap_err();
        assert!(matches!(err, SyncError::Decryption));
    }

    #[test]
    fn test_garbage_payload_is_decryption_error() {
        assert!(matches!(
            decrypt_text("not base64 at all!!", "correct-key-16ch"),
            Err(SyncError::Decryption)
        ));
        assert!(matches!(
            decrypt_text("AAAA", "correct-key-16ch"),
            Err(SyncError::Decryption)
        ));
    }

    #[test]
    fn test_nonces_differ_between_calls() {
        let key = "k".repeat(MIN_KEY_LEN);
        let a = encrypt_text("same input", &key).unwrap();
        let b = encrypt_text("same input", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key(&"k".repeat(16)).is_ok());
        assert!(validate_key(&"k".repeat(32)).is_ok());
        assert!(matches!(
            validate_key("short"),
            Err(SyncError::KeyLength(5))
        ));
        assert!(matches!(
            validate_key(&"k".repeat(33)),
            Err(SyncError::KeyLength(33))
        ));
    }
}
