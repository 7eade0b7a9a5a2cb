//! Persisted form of an encrypted token.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::key::SALT_LENGTH;
use crate::error::WikiError;

/// Record format version understood by this build.
pub const VAULT_VERSION: u32 = 1;

/// KDF tag pinning Argon2id with the parameters in `vault::key`.
pub const KDF_ARGON2ID: &str = "argon2id";

/// AES-256-GCM nonce length.
pub const NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length.
pub const TAG_LENGTH: usize = 16;

/// An encrypted bearer token plus everything needed to decrypt it
/// except the passphrase.
///
/// Deserialization validates the version, the KDF tag and every byte
/// length, so a value of this type is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord", into = "StoredRecord")]
pub struct VaultRecord {
    pub(crate) salt: [u8; SALT_LENGTH],
    pub(crate) iv: [u8; NONCE_LENGTH],
    pub(crate) tag: [u8; TAG_LENGTH],
    pub(crate) ciphertext: Vec<u8>,
}

impl VaultRecord {
    pub fn version(&self) -> u32 {
        VAULT_VERSION
    }

    pub fn kdf(&self) -> &'static str {
        KDF_ARGON2ID
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// On-disk JSON shape: byte fields as standard base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    version: u32,
    kdf: String,
    salt: String,
    iv: String,
    tag: String,
    ciphertext: String,
}

impl From<VaultRecord> for StoredRecord {
    fn from(record: VaultRecord) -> Self {
        StoredRecord {
            version: VAULT_VERSION,
            kdf: KDF_ARGON2ID.to_string(),
            salt: STANDARD.encode(record.salt),
            iv: STANDARD.encode(record.iv),
            tag: STANDARD.encode(record.tag),
            ciphertext: STANDARD.encode(&record.ciphertext),
        }
    }
}

impl TryFrom<StoredRecord> for VaultRecord {
    type Error = WikiError;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        if stored.version != VAULT_VERSION {
            return Err(WikiError::auth(format!(
                "Unsupported credential format version {}",
                stored.version
            )));
        }
        if stored.kdf != KDF_ARGON2ID {
            return Err(WikiError::auth(format!(
                "Unsupported credential key derivation \"{}\"",
                stored.kdf
            )));
        }

        let ciphertext = decode_field("ciphertext", &stored.ciphertext)?;
        if ciphertext.is_empty() {
            return Err(WikiError::auth("Stored credential field ciphertext is empty"));
        }

        Ok(VaultRecord {
            salt: decode_fixed("salt", &stored.salt)?,
            iv: decode_fixed("iv", &stored.iv)?,
            tag: decode_fixed("tag", &stored.tag)?,
            ciphertext,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, WikiError> {
    STANDARD
        .decode(value)
        .map_err(|_| WikiError::auth(format!("Stored credential field {} is not base64", name)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N], WikiError> {
    let bytes = decode_field(name, value)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        WikiError::auth(format!(
            "Stored credential field {} must be {} bytes (got {})",
            name,
            N,
            bytes.len()
        ))
    })
}
