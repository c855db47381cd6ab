//! Textbook RSA: key generation, a decimal-string key codec and raw
//! single-block encryption and decryption over `num-bigint` integers.
//!
//! There is no padding and no constant-time arithmetic. The default 128-bit
//! primes are far too small for real use.
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use reesa::rsa::{decrypt_block, encrypt_block, generate_keypair};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let private = generate_keypair(64, &mut rng)?;
//! let ciphertext = encrypt_block(&private.to_public_key(), "2a")?;
//! assert_eq!(decrypt_block(&private, &ciphertext)?, "2a");
//! # Ok::<(), reesa::Error>(())
//! ```

pub mod error;
pub mod rsa;
pub mod util;

pub use error::{Result, RsaError};
pub use error::RsaError as Error;
