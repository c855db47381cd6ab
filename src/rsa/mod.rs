// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod signature;

pub use bigint::{
    generate_probable_prime, is_probable_prime, mod_inverse, mod_pow, RsaBigInt,
    DEFAULT_PRIMALITY_ROUNDS, MAX_PRIME_BITS,
};
pub use codec::{
    parse_private_key, parse_public_key, serialize_private_key, serialize_public_key,
    SerializedPrivateKey, SerializedPublicKey,
};
pub use decrypt::{decrypt_block, decrypt_to_bytes, decrypt_to_string, decrypt_value};
pub use encrypt::{encrypt_block, encrypt_bytes, encrypt_value};
pub use keygen::{
    generate_keypair, generate_keypair_with, KeygenConfig, RsaPrivateKey, RsaPublicKey,
    DEFAULT_PRIME_BITS, DEFAULT_PUBLIC_EXPONENT, MIN_PRIME_BITS,
};
pub use signature::{sign, verify};
