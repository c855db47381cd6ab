// RSA Encryption Implementation
// Raw textbook RSA on a single block: c = m^e mod n

use super::bigint::{mod_pow, parse_hex, to_hex, RsaBigInt};
use super::keygen::RsaPublicKey;
use crate::error::{Result, RsaError};

/// Encrypt one numeric block. Fails with [`RsaError::BlockTooLarge`] unless
/// `plaintext < modulus`.
pub fn encrypt_value(public_key: &RsaPublicKey, plaintext: &RsaBigInt) -> Result<RsaBigInt> {
    if plaintext >= public_key.modulus() {
        return Err(RsaError::BlockTooLarge);
    }
    Ok(mod_pow(
        plaintext,
        public_key.public_exponent(),
        public_key.modulus(),
    ))
}

/// Encrypt a base-16 block, returning lowercase base-16 ciphertext
pub fn encrypt_block(public_key: &RsaPublicKey, plaintext_hex: &str) -> Result<String> {
    let m = parse_hex("plaintext", plaintext_hex)?;
    let c = encrypt_value(public_key, &m)?;
    Ok(to_hex(&c))
}

/// Encrypt raw bytes read as one big-endian block
///
/// No padding is applied, so leading zero bytes do not survive decryption.
pub fn encrypt_bytes(public_key: &RsaPublicKey, plaintext: &[u8]) -> Result<String> {
    if plaintext.is_empty() {
        return Err(RsaError::encoding("plaintext", "empty message"));
    }
    encrypt_block(public_key, &hex::encode(plaintext))
}
