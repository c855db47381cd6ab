// RSA Decryption Implementation
// Raw textbook RSA on a single block: m = c^d mod n

use super::bigint::{mod_pow, parse_hex, to_hex, RsaBigInt};
use super::keygen::RsaPrivateKey;
use crate::error::{Result, RsaError};

/// Decrypt one numeric block
pub fn decrypt_value(private_key: &RsaPrivateKey, ciphertext: &RsaBigInt) -> RsaBigInt {
    mod_pow(
        ciphertext,
        private_key.private_exponent(),
        private_key.modulus(),
    )
}

/// Decrypt a base-16 block, returning lowercase base-16 plaintext
pub fn decrypt_block(private_key: &RsaPrivateKey, ciphertext_hex: &str) -> Result<String> {
    let c = parse_hex("ciphertext", ciphertext_hex)?;
    Ok(to_hex(&decrypt_value(private_key, &c)))
}

/// Decrypt a base-16 block into big-endian bytes
pub fn decrypt_to_bytes(private_key: &RsaPrivateKey, ciphertext_hex: &str) -> Result<Vec<u8>> {
    let mut digits = decrypt_block(private_key, ciphertext_hex)?;
    if digits.len() % 2 == 1 {
        digits.insert(0, '0');
    }
    hex::decode(&digits).map_err(|e| RsaError::encoding("plaintext", e.to_string()))
}

/// Decrypt a base-16 block into a UTF-8 string
pub fn decrypt_to_string(private_key: &RsaPrivateKey, ciphertext_hex: &str) -> Result<String> {
    let plaintext = decrypt_to_bytes(private_key, ciphertext_hex)?;
    String::from_utf8(plaintext).map_err(|e| RsaError::encoding("plaintext", e.to_string()))
}
