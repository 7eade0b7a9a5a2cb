//! Credential vault: passphrase-based encryption of a single bearer token.
//!
//! - **Argon2id** derives a 256-bit key from the passphrase and a fresh salt
//! - **AES-256-GCM** encrypts the token under a fresh nonce with a detached tag
//!
//! Nothing here touches storage; see [`crate::store`] for persistence.
//!
//! ## Threat model
//!
//! We defend against:
//! - Theft of the credentials file
//! - Offline brute-force attacks on the passphrase
//! - Tampering with any stored field (authenticated encryption)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory during an authenticated call

pub mod key;
pub mod record;

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce, Tag};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::error::{Result, WikiError};

pub use key::{derive_key, DerivedKey, SALT_LENGTH};
pub use record::{VaultRecord, KDF_ARGON2ID, NONCE_LENGTH, TAG_LENGTH, VAULT_VERSION};

/// Associated data binding the ciphertext to the record format.
const ASSOCIATED_DATA: &[u8] = b"wiki-vault:v1:argon2id";

/// Single failure message for every decryption problem. Wrong passphrase
/// and corrupted data must look identical to the caller.
const DECRYPTION_FAILED: &str = "Failed to decrypt token. Check your passphrase.";

/// Minimum passphrase length accepted when storing a new token.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Encrypt a token under a passphrase.
///
/// Salt and nonce come from the OS CSPRNG on every call, so encrypting
/// the same token twice never yields the same record.
///
/// # Errors
///
/// Returns `WikiError::Auth` for an empty passphrase and
/// `WikiError::Internal` if the random source or cipher fails.
pub fn encrypt_token(token: &SecretString, passphrase: &SecretString) -> Result<VaultRecord> {
    let mut salt = [0u8; SALT_LENGTH];
    fill_random(&mut salt)?;
    let mut iv = [0u8; NONCE_LENGTH];
    fill_random(&mut iv)?;

    let key = derive_key(passphrase.expose_secret(), &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut buffer = token.expose_secret().as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&iv), ASSOCIATED_DATA, &mut buffer)
        .map_err(|e| WikiError::internal(format!("Encryption failed: {}", e)))?;

    let mut tag_bytes = [0u8; TAG_LENGTH];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(VaultRecord {
        salt,
        iv,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Decrypt a stored token.
///
/// # Errors
///
/// Returns `WikiError::Auth` with the same message for a wrong passphrase,
/// a tampered field, or a corrupted ciphertext. Nothing is returned
/// unless the tag verifies.
pub fn decrypt_token(record: &VaultRecord, passphrase: &SecretString) -> Result<SecretString> {
    let key = derive_key(passphrase.expose_secret(), &record.salt)
        .map_err(|_| WikiError::auth(DECRYPTION_FAILED))?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut buffer = Zeroizing::new(record.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&record.iv),
            ASSOCIATED_DATA,
            buffer.as_mut_slice(),
            Tag::from_slice(&record.tag),
        )
        .map_err(|_| WikiError::auth(DECRYPTION_FAILED))?;

    let token = std::str::from_utf8(buffer.as_slice())
        .map_err(|_| WikiError::auth(DECRYPTION_FAILED))?;
    Ok(SecretString::from(token.to_string()))
}

/// Validate a passphrase chosen for a new vault record.
///
/// # Errors
///
/// Returns `WikiError::Validation` with an explanation.
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(WikiError::validation("Passphrase cannot be empty"));
    }

    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(WikiError::validation(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}

fn fill_random(bytes: &mut [u8]) -> Result<()> {
    getrandom::getrandom(bytes)
        .map_err(|e| WikiError::internal(format!("Failed to generate random bytes: {}", e)))
}
