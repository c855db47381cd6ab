// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{Num, One, Signed, Zero};
use rand::Rng;
use tracing::{debug, trace};

use crate::error::{Result, RsaError};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Miller-Rabin rounds used unless a caller asks otherwise (error bound 4^-25 = 2^-50)
pub const DEFAULT_PRIMALITY_ROUNDS: usize = 25;

/// Widest prime the sampler will build; larger requests are rejected
/// before any allocation
pub const MAX_PRIME_BITS: u64 = 16384;

/// Primes below 100, used to reject most candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Parse a strict base-10 integer (ASCII digits only, no sign or separators)
pub fn parse_decimal(field: &'static str, text: &str) -> Result<RsaBigInt> {
    parse_radix(field, text, 10)
}

/// Parse a strict base-16 integer (ASCII hex digits of either case, no prefix)
pub fn parse_hex(field: &'static str, text: &str) -> Result<RsaBigInt> {
    parse_radix(field, text, 16)
}

/// Render as lowercase base-16
pub fn to_hex(n: &RsaBigInt) -> String {
    n.to_str_radix(16)
}

fn parse_radix(field: &'static str, text: &str, radix: u32) -> Result<RsaBigInt> {
    if text.is_empty() {
        return Err(RsaError::encoding(field, "empty string"));
    }
    // num-bigint tolerates a leading '+' and '_' separators; key material must not
    if let Some(bad) = text.chars().find(|c| !c.is_digit(radix)) {
        return Err(RsaError::encoding(
            field,
            format!("unexpected character {bad:?} in base-{radix} integer"),
        ));
    }
    RsaBigInt::from_str_radix(text, radix).map_err(|e| RsaError::encoding(field, e.to_string()))
}

/// Square-and-multiply: `base^exponent mod modulus`
///
/// The one hot path behind encryption, decryption and the Miller-Rabin
/// witnesses. Every product is reduced at once, so no intermediate grows
/// past twice the width of `modulus`.
///
/// # Panics
///
/// If `modulus` is zero. Keys never carry one: the codec rejects zero
/// fields and generated moduli are products of two primes.
pub fn mod_pow(base: &RsaBigInt, exponent: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut acc = RsaBigInt::one();
    let mut square = base % modulus;
    let mut remaining = exponent.clone();

    while !remaining.is_zero() {
        if remaining.is_odd() {
            acc = (&acc * &square) % modulus;
        }
        square = (&square * &square) % modulus;
        remaining >>= 1u32;
    }

    acc
}

/// Compute modular inverse: a^(-1) mod n
///
/// Iterative extended Euclidean algorithm. Fails with
/// [`RsaError::NotInvertible`] when `gcd(a, n) > 1` or `n` is zero.
pub fn mod_inverse(a: &RsaBigInt, n: &RsaBigInt) -> Result<RsaBigInt> {
    if n.is_zero() {
        return Err(RsaError::NotInvertible);
    }

    let modulus = BigInt::from(n.clone());
    let (mut r, mut new_r) = (modulus.clone(), BigInt::from(a.clone()));
    let (mut t, mut new_t) = (BigInt::zero(), BigInt::one());

    while !new_r.is_zero() {
        let quotient = r.div_floor(&new_r);

        let next_t = &t - &quotient * &new_t;
        t = std::mem::replace(&mut new_t, next_t);

        let next_r = &r - &quotient * &new_r;
        r = std::mem::replace(&mut new_r, next_r);
    }

    if r > BigInt::one() {
        return Err(RsaError::NotInvertible);
    }
    if t.is_negative() {
        t += &modulus;
    }

    t.to_biguint().ok_or(RsaError::NotInvertible)
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
///
/// Witnesses are drawn from `rng`; each round cuts the false-positive
/// probability by at least a factor of four.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rounds: usize, rng: &mut R) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        if *n == RsaBigInt::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let two = RsaBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        // Random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    true
}

/// Generate a random probable prime with exactly `bits` bits
///
/// Samples until a candidate passes [`is_probable_prime`]; there is no cap
/// on the number of attempts. `bits` must lie in `2..=MAX_PRIME_BITS` and
/// `rounds` must be non-zero.
pub fn generate_probable_prime<R: Rng + ?Sized>(
    bits: u64,
    rounds: usize,
    rng: &mut R,
) -> Result<RsaBigInt> {
    if !(2..=MAX_PRIME_BITS).contains(&bits) {
        return Err(RsaError::InvalidBitWidth {
            bits,
            min: 2,
            max: MAX_PRIME_BITS,
        });
    }
    if rounds == 0 {
        return Err(RsaError::InvalidPrimalityRounds(rounds));
    }

    let top_bit = RsaBigInt::one() << (bits - 1);
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;

        let mut candidate = rng.gen_biguint(bits);
        candidate |= &top_bit;
        candidate |= RsaBigInt::one();

        if is_probable_prime(&candidate, rounds, rng) {
            debug!(bits, attempts, "found probable prime");
            return Ok(candidate);
        }
        trace!(bits, attempts, "rejected composite candidate");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let result = mod_pow(&from_u64(3), &from_u64(5), &from_u64(7));
        assert_eq!(result, from_u64(5));

        // Textbook vector: 4^13 mod 497 = 445
        let result = mod_pow(&from_u64(4), &from_u64(13), &from_u64(497));
        assert_eq!(result, from_u64(445));
    }

    #[test]
    fn test_mod_pow_edge_cases() {
        assert_eq!(mod_pow(&from_u64(9), &from_u64(0), &from_u64(7)), from_u64(1));
        assert_eq!(mod_pow(&from_u64(9), &from_u64(5), &from_u64(1)), from_u64(0));
        // base larger than modulus is reduced first
        assert_eq!(
            mod_pow(&from_u64(500), &from_u64(13), &from_u64(497)),
            mod_pow(&from_u64(3), &from_u64(13), &from_u64(497))
        );
    }

    #[test]
    fn test_mod_pow_matches_num_bigint() {
        let base = parse_decimal("base", "123456789012345678901234567890").unwrap();
        let exp = parse_decimal("exp", "65537").unwrap();
        let modulus = parse_decimal("modulus", "340282366920938463463374607431768211297").unwrap();
        assert_eq!(mod_pow(&base, &exp, &modulus), base.modpow(&exp, &modulus));
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 4 = 12 ≡ 1 (mod 11)
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(11)).unwrap(), from_u64(4));

        // 3 * 5 = 15 ≡ 1 (mod 7)
        let inv = mod_inverse(&from_u64(3), &from_u64(7)).unwrap();
        assert_eq!(inv, from_u64(5));
        assert_eq!((from_u64(3) * inv) % from_u64(7), from_u64(1));
    }

    #[test]
    fn test_mod_inverse_normalizes_negative_coefficient() {
        // The raw Bezout coefficient for 7 mod 40 is -17
        assert_eq!(mod_inverse(&from_u64(7), &from_u64(40)).unwrap(), from_u64(23));
    }

    #[test]
    fn test_mod_inverse_not_invertible() {
        assert_eq!(mod_inverse(&from_u64(4), &from_u64(8)), Err(RsaError::NotInvertible));
        assert_eq!(mod_inverse(&from_u64(0), &from_u64(8)), Err(RsaError::NotInvertible));
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(0)), Err(RsaError::NotInvertible));
    }

    #[test]
    fn test_mod_inverse_of_public_exponent() {
        let e = from_u64(65537);
        let totient = from_u64(3120);
        let d = mod_inverse(&e, &totient).unwrap();
        assert!(d < totient);
        assert_eq!((e * d) % totient, from_u64(1));
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = StdRng::seed_from_u64(7);
        for p in [2u64, 3, 7, 97, 101, 7919, 65537, 2_147_483_647] {
            assert!(is_probable_prime(&from_u64(p), 25, &mut rng), "{p} is prime");
        }
        // 561 and 41041 are Carmichael numbers
        for c in [0u64, 1, 4, 9, 91, 561, 41041, 4_294_967_297] {
            assert!(!is_probable_prime(&from_u64(c), 25, &mut rng), "{c} is composite");
        }
    }

    #[test]
    fn test_generate_probable_prime() {
        let mut rng = StdRng::seed_from_u64(42);
        for bits in [2u64, 8, 64, 128] {
            let prime = generate_probable_prime(bits, DEFAULT_PRIMALITY_ROUNDS, &mut rng).unwrap();
            assert_eq!(prime.bits(), bits);
            assert!(is_probable_prime(&prime, DEFAULT_PRIMALITY_ROUNDS, &mut rng));
        }
    }

    #[test]
    fn test_generate_probable_prime_rejects_bad_width() {
        let mut rng = StdRng::seed_from_u64(1);
        for bits in [0u64, 1, MAX_PRIME_BITS + 1, 10_000_000_000_000] {
            assert_eq!(
                generate_probable_prime(bits, DEFAULT_PRIMALITY_ROUNDS, &mut rng),
                Err(RsaError::InvalidBitWidth { bits, min: 2, max: MAX_PRIME_BITS })
            );
        }
    }

    #[test]
    fn test_generate_probable_prime_requires_rounds() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate_probable_prime(32, 0, &mut rng),
            Err(RsaError::InvalidPrimalityRounds(0))
        );
    }

    #[test]
    #[should_panic]
    fn test_mod_pow_zero_modulus_panics() {
        mod_pow(&from_u64(4), &from_u64(13), &from_u64(0));
    }

    #[test]
    fn test_parse_decimal_is_strict() {
        assert_eq!(parse_decimal("p", "0042").unwrap(), from_u64(42));
        for bad in ["", "+12", "-12", "1_000", " 12", "12 ", "0x1f", "abc"] {
            assert!(
                matches!(parse_decimal("p", bad), Err(RsaError::InvalidEncoding { field: "p", .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("block", "DeadBeef").unwrap(), from_u64(0xdead_beef));
        assert_eq!(to_hex(&from_u64(0xdead_beef)), "deadbeef");
        assert!(parse_hex("block", "0xff").is_err());
        assert!(parse_hex("block", "fg").is_err());
    }
}
