//! Key derivation using Argon2id.
//!
//! The vault key is derived from the user's passphrase and a per-record
//! salt. The work factors below are pinned by the record's `kdf` tag;
//! changing any of them requires a new tag and a new record version.

use argon2::Argon2;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, WikiError};

/// Argon2id parameters for the `argon2id` vault tag.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Length of the random salt stored in every vault record.
pub const SALT_LENGTH: usize = 16;

/// A symmetric key derived from a passphrase.
///
/// Key bytes are zeroized when the value is dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Use only for the immediate cipher call.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a vault key from a passphrase and salt.
///
/// Deterministic for a given `(passphrase, salt)` pair and memory-hard,
/// so every guess against a stolen record costs ~64 MB of RAM.
///
/// # Errors
///
/// Returns `WikiError::Auth` for an empty passphrase and
/// `WikiError::Internal` if the KDF itself fails.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(WikiError::auth("Passphrase cannot be empty"));
    }

    if salt.len() != SALT_LENGTH {
        return Err(WikiError::auth(format!(
            "Salt must be exactly {} bytes",
            SALT_LENGTH
        )));
    }

    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| WikiError::internal(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| WikiError::internal(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT_A: &[u8; SALT_LENGTH] = b"salt-a-123456789";
    const SALT_B: &[u8; SALT_LENGTH] = b"salt-b-123456789";

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive_key("test-passphrase", SALT_A).unwrap();
        let key2 = derive_key("test-passphrase", SALT_A).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("test-passphrase", SALT_A).unwrap();
        let key2 = derive_key("test-passphrase", SALT_B).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let result = derive_key("", SALT_A);
        assert!(matches!(result, Err(WikiError::Auth(_))));
    }

    #[test]
    fn test_wrong_salt_length_rejected() {
        let result = derive_key("test-passphrase", b"short");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Salt must be exactly 16 bytes"));
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("test-passphrase", SALT_A).unwrap();
        let debug_output = format!("{:?}", key);
        assert_eq!(debug_output, "DerivedKey { key: \"[REDACTED]\" }");
    }
}
