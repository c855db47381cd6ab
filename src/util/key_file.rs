// Key File Operations
// Stores keys as JSON objects of decimal strings and loads them back

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::RsaError;
use crate::rsa::codec::{
    parse_private_key, parse_public_key, serialize_private_key, serialize_public_key,
    PRIVATE_KEY_FIELDS, PUBLIC_KEY_FIELDS,
};
use crate::rsa::keygen::{RsaPrivateKey, RsaPublicKey};

/// Errors that can occur while reading or writing key files
#[derive(Debug, Error)]
pub enum KeyFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("key file is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("key file is missing required field `{field}`")]
    Incomplete { field: &'static str },

    /// Every field is present but at least one holds an unusable value.
    #[error("key file has invalid values: {0}")]
    Unacceptable(#[from] RsaError),

    #[error("failed to encode key file: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type for key file operations
pub type KeyFileResult<T> = Result<T, KeyFileError>;

/// A key loaded by [`load_key`], private or public depending on the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredKey {
    Private(RsaPrivateKey),
    Public(RsaPublicKey),
}

impl StoredKey {
    /// The public half, projected if this is a private key
    pub fn public_key(&self) -> RsaPublicKey {
        match self {
            StoredKey::Private(key) => key.to_public_key(),
            StoredKey::Public(key) => key.clone(),
        }
    }
}

pub fn save_private_key(path: &Path, key: &RsaPrivateKey) -> KeyFileResult<()> {
    let json = serde_json::to_string_pretty(&serialize_private_key(key))
        .map_err(KeyFileError::Encode)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "saved private key");
    Ok(())
}

pub fn save_public_key(path: &Path, key: &RsaPublicKey) -> KeyFileResult<()> {
    let json =
        serde_json::to_string_pretty(&serialize_public_key(key)).map_err(KeyFileError::Encode)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "saved public key");
    Ok(())
}

pub fn load_private_key(path: &Path) -> KeyFileResult<RsaPrivateKey> {
    let document = read_document(path)?;
    private_key_from_document(&document)
}

pub fn load_public_key(path: &Path) -> KeyFileResult<RsaPublicKey> {
    let document = read_document(path)?;
    public_key_from_document(&document)
}

/// Load whichever kind of key the file holds. A file with a `p` field is
/// read as a private key, anything else as a public key.
pub fn load_key(path: &Path) -> KeyFileResult<StoredKey> {
    let document = read_document(path)?;
    if document.get("p").is_some() {
        private_key_from_document(&document).map(StoredKey::Private)
    } else {
        public_key_from_document(&document).map(StoredKey::Public)
    }
}

fn read_document(path: &Path) -> KeyFileResult<Value> {
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read key file");
    serde_json::from_str(&text).map_err(KeyFileError::NotJson)
}

fn field<'a>(document: &'a Value, name: &'static str) -> KeyFileResult<&'a str> {
    match document.get(name) {
        None => Err(KeyFileError::Incomplete { field: name }),
        Some(Value::String(text)) => Ok(text.as_str()),
        Some(_) => Err(RsaError::encoding(name, "expected a decimal string").into()),
    }
}

fn private_key_from_document(document: &Value) -> KeyFileResult<RsaPrivateKey> {
    // Check presence of every field before parsing any of them
    let mut values = [""; 6];
    for (slot, name) in values.iter_mut().zip(PRIVATE_KEY_FIELDS) {
        *slot = field(document, name)?;
    }
    let [p, q, e, d, n, t] = values;
    Ok(parse_private_key(p, q, e, d, n, t)?)
}

fn public_key_from_document(document: &Value) -> KeyFileResult<RsaPublicKey> {
    let mut values = [""; 2];
    for (slot, name) in values.iter_mut().zip(PUBLIC_KEY_FIELDS) {
        *slot = field(document, name)?;
    }
    let [e, n] = values;
    Ok(parse_public_key(e, n)?)
}
