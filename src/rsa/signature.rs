// RSA Signatures
// Interface only: no signature scheme has been chosen for raw RSA blocks yet

use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::{Result, RsaError};

/// Sign `message` with the private key.
///
/// Always returns [`RsaError::Unsupported`] until a hash and padding scheme
/// are settled.
pub fn sign(_private_key: &RsaPrivateKey, _message: &[u8]) -> Result<Vec<u8>> {
    Err(RsaError::Unsupported("signing"))
}

/// Verify `signature` over `message` with the public key.
///
/// Always returns [`RsaError::Unsupported`]; see [`sign`].
pub fn verify(_public_key: &RsaPublicKey, _message: &[u8], _signature: &[u8]) -> Result<bool> {
    Err(RsaError::Unsupported("signature verification"))
}
