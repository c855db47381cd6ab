// RSA Key Codec
// Converts keys to and from their canonical base-10 string fields

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use super::bigint::{parse_decimal, RsaBigInt};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::{Result, RsaError};

/// Field names of a serialized private key, in their fixed order
pub const PRIVATE_KEY_FIELDS: [&str; 6] = [
    "p",
    "q",
    "public_exponent",
    "private_exponent",
    "modulus",
    "totient_modulus",
];

/// Field names of a serialized public key, in their fixed order
pub const PUBLIC_KEY_FIELDS: [&str; 2] = ["public_exponent", "modulus"];

/// Six decimal strings, one per private key field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPrivateKey {
    pub p: String,
    pub q: String,
    pub public_exponent: String,
    pub private_exponent: String,
    pub modulus: String,
    #[serde(rename = "totient_modulus")]
    pub totient: String,
}

/// Two decimal strings, one per public key field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPublicKey {
    pub public_exponent: String,
    pub modulus: String,
}

impl SerializedPrivateKey {
    pub fn parse(&self) -> Result<RsaPrivateKey> {
        parse_private_key(
            &self.p,
            &self.q,
            &self.public_exponent,
            &self.private_exponent,
            &self.modulus,
            &self.totient,
        )
    }

    /// Fields in [`PRIVATE_KEY_FIELDS`] order
    pub fn fields(&self) -> [&str; 6] {
        [
            self.p.as_str(),
            self.q.as_str(),
            self.public_exponent.as_str(),
            self.private_exponent.as_str(),
            self.modulus.as_str(),
            self.totient.as_str(),
        ]
    }
}

impl SerializedPublicKey {
    pub fn parse(&self) -> Result<RsaPublicKey> {
        parse_public_key(&self.public_exponent, &self.modulus)
    }
}

fn parse_field(field: &'static str, text: &str) -> Result<RsaBigInt> {
    let value = parse_decimal(field, text)?;
    if value.is_zero() {
        return Err(RsaError::encoding(field, "must be a positive integer"));
    }
    Ok(value)
}

/// Parse a private key from six base-10 strings.
///
/// Either every field parses or no key is produced. The relations between
/// the fields are not checked; call [`RsaPrivateKey::validate`] for that.
pub fn parse_private_key(
    p: &str,
    q: &str,
    public_exponent: &str,
    private_exponent: &str,
    modulus: &str,
    totient: &str,
) -> Result<RsaPrivateKey> {
    Ok(RsaPrivateKey::from_parts(
        parse_field("p", p)?,
        parse_field("q", q)?,
        parse_field("public_exponent", public_exponent)?,
        parse_field("private_exponent", private_exponent)?,
        parse_field("modulus", modulus)?,
        parse_field("totient_modulus", totient)?,
    ))
}

pub fn serialize_private_key(key: &RsaPrivateKey) -> SerializedPrivateKey {
    SerializedPrivateKey {
        p: key.p().to_str_radix(10),
        q: key.q().to_str_radix(10),
        public_exponent: key.public_exponent().to_str_radix(10),
        private_exponent: key.private_exponent().to_str_radix(10),
        modulus: key.modulus().to_str_radix(10),
        totient: key.totient().to_str_radix(10),
    }
}

pub fn parse_public_key(public_exponent: &str, modulus: &str) -> Result<RsaPublicKey> {
    Ok(RsaPublicKey::new(
        parse_field("public_exponent", public_exponent)?,
        parse_field("modulus", modulus)?,
    ))
}

pub fn serialize_public_key(key: &RsaPublicKey) -> SerializedPublicKey {
    SerializedPublicKey {
        public_exponent: key.public_exponent().to_str_radix(10),
        modulus: key.modulus().to_str_radix(10),
    }
}
