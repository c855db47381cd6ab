// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use num_traits::One;
use rand::Rng;
use tracing::{debug, warn};

use super::bigint::{
    from_u64, generate_probable_prime, is_probable_prime, mod_inverse, RsaBigInt,
    DEFAULT_PRIMALITY_ROUNDS, MAX_PRIME_BITS,
};
use crate::error::{Result, RsaError};

/// Bit width of each prime factor unless configured otherwise
pub const DEFAULT_PRIME_BITS: u64 = 128;

/// Fermat number F4, the conventional public exponent
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Smallest prime width accepted by key generation
pub const MIN_PRIME_BITS: u64 = 8;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    public_exponent: RsaBigInt,
    modulus: RsaBigInt,
}

/// RSA Private Key
///
/// Owns all six numbers outright. There are no mutators: a key is built by
/// [`generate_keypair`] or by the codec and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    p: RsaBigInt,
    q: RsaBigInt,
    public_exponent: RsaBigInt,
    private_exponent: RsaBigInt,
    modulus: RsaBigInt,
    totient: RsaBigInt,
}

impl RsaPublicKey {
    pub fn new(public_exponent: RsaBigInt, modulus: RsaBigInt) -> Self {
        Self {
            public_exponent,
            modulus,
        }
    }

    pub fn public_exponent(&self) -> &RsaBigInt {
        &self.public_exponent
    }

    pub fn modulus(&self) -> &RsaBigInt {
        &self.modulus
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }

    /// Encrypt one hex block using this public key
    pub fn encrypt(&self, plaintext_hex: &str) -> Result<String> {
        super::encrypt::encrypt_block(self, plaintext_hex)
    }
}

impl RsaPrivateKey {
    /// Assemble a key from already-parsed fields. No relation between the
    /// fields is checked here; see [`RsaPrivateKey::validate`].
    pub(crate) fn from_parts(
        p: RsaBigInt,
        q: RsaBigInt,
        public_exponent: RsaBigInt,
        private_exponent: RsaBigInt,
        modulus: RsaBigInt,
        totient: RsaBigInt,
    ) -> Self {
        Self {
            p,
            q,
            public_exponent,
            private_exponent,
            modulus,
            totient,
        }
    }

    pub fn p(&self) -> &RsaBigInt {
        &self.p
    }

    pub fn q(&self) -> &RsaBigInt {
        &self.q
    }

    pub fn public_exponent(&self) -> &RsaBigInt {
        &self.public_exponent
    }

    pub fn private_exponent(&self) -> &RsaBigInt {
        &self.private_exponent
    }

    pub fn modulus(&self) -> &RsaBigInt {
        &self.modulus
    }

    pub fn totient(&self) -> &RsaBigInt {
        &self.totient
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }

    /// Project out the public half as an independent copy
    pub fn to_public_key(&self) -> RsaPublicKey {
        RsaPublicKey::new(self.public_exponent.clone(), self.modulus.clone())
    }

    /// Decrypt one hex block using this private key
    pub fn decrypt(&self, ciphertext_hex: &str) -> Result<String> {
        super::decrypt::decrypt_block(self, ciphertext_hex)
    }

    /// Check the arithmetic relations between the six fields.
    ///
    /// Primality of `p` and `q` is not re-tested.
    pub fn validate(&self) -> Result<()> {
        let one = RsaBigInt::one();

        if self.p <= one || self.q <= one {
            return Err(RsaError::InconsistentKey("prime factors must be greater than one"));
        }
        if self.modulus != &self.p * &self.q {
            return Err(RsaError::InconsistentKey("modulus is not p * q"));
        }
        if self.totient != (&self.p - 1u8) * (&self.q - 1u8) {
            return Err(RsaError::InconsistentKey("totient is not (p - 1) * (q - 1)"));
        }
        if (&self.public_exponent * &self.private_exponent) % &self.totient != one {
            return Err(RsaError::InconsistentKey(
                "private exponent is not the inverse of the public exponent",
            ));
        }
        Ok(())
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(key: &RsaPrivateKey) -> Self {
        key.to_public_key()
    }
}

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeygenConfig {
    pub prime_bits: u64,
    pub public_exponent: u64,
    pub primality_rounds: usize,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            prime_bits: DEFAULT_PRIME_BITS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
        }
    }
}

impl KeygenConfig {
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_public_exponent(mut self, e: u64) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_primality_rounds(mut self, rounds: usize) -> Self {
        self.primality_rounds = rounds;
        self
    }
}

/// Generate an RSA private key whose primes are `prime_bits` wide,
/// with the default exponent and primality rounds
pub fn generate_keypair<R: Rng + ?Sized>(prime_bits: u64, rng: &mut R) -> Result<RsaPrivateKey> {
    generate_keypair_with(&KeygenConfig::default().with_prime_bits(prime_bits), rng)
}

/// Generate an RSA private key from an explicit configuration
///
/// Blocks until two distinct probable primes have been sampled. A public
/// exponent that is not coprime with the totient surfaces as
/// [`RsaError::NotInvertible`].
pub fn generate_keypair_with<R: Rng + ?Sized>(
    config: &KeygenConfig,
    rng: &mut R,
) -> Result<RsaPrivateKey> {
    if !(MIN_PRIME_BITS..=MAX_PRIME_BITS).contains(&config.prime_bits) {
        return Err(RsaError::InvalidBitWidth {
            bits: config.prime_bits,
            min: MIN_PRIME_BITS,
            max: MAX_PRIME_BITS,
        });
    }
    if config.primality_rounds == 0 {
        return Err(RsaError::InvalidPrimalityRounds(0));
    }

    // Step 1: Generate two distinct random primes p and q
    let p = generate_probable_prime(config.prime_bits, config.primality_rounds, rng)?;
    let mut q = generate_probable_prime(config.prime_bits, config.primality_rounds, rng)?;
    while q == p {
        warn!(bits = config.prime_bits, "sampled identical primes, resampling q");
        q = generate_probable_prime(config.prime_bits, config.primality_rounds, rng)?;
    }

    // Step 2: Compute n = p * q
    let modulus = &p * &q;

    // Step 3: Compute φ(n) = (p-1)(q-1)
    let totient = (&p - 1u8) * (&q - 1u8);

    // Step 4: Compute d = e^(-1) mod φ(n)
    let public_exponent = from_u64(config.public_exponent);
    let private_exponent = mod_inverse(&public_exponent, &totient)?;

    debug!(
        prime_bits = config.prime_bits,
        modulus_bits = modulus.bits(),
        "generated RSA key pair"
    );

    Ok(RsaPrivateKey {
        p,
        q,
        public_exponent,
        private_exponent,
        modulus,
        totient,
    })
}

/// True when `p` and `q` pass the primality test used during generation
pub fn has_probable_prime_factors<R: Rng + ?Sized>(key: &RsaPrivateKey, rng: &mut R) -> bool {
    is_probable_prime(key.p(), DEFAULT_PRIMALITY_ROUNDS, rng)
        && is_probable_prime(key.q(), DEFAULT_PRIMALITY_ROUNDS, rng)
}
