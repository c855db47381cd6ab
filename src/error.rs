// RSA Error Types
// Every fallible operation in the crate reports one of these

use thiserror::Error;

/// Errors produced by key generation, key parsing and the cipher operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    /// A key field or cipher block is not valid base-10 / base-16 text.
    #[error("invalid encoding for `{field}`: {reason}")]
    InvalidEncoding {
        field: &'static str,
        reason: String,
    },

    /// The value shares a factor with the modulus, so no inverse exists.
    #[error("value is not invertible modulo the given modulus")]
    NotInvertible,

    /// Plaintext block is numerically >= the key modulus.
    #[error("block is too large: value must be smaller than the modulus")]
    BlockTooLarge,

    #[error("invalid prime bit width {bits}: must be between {min} and {max}")]
    InvalidBitWidth { bits: u64, min: u64, max: u64 },

    /// Zero Miller-Rabin rounds would accept any candidate without small factors.
    #[error("invalid primality round count {0}: at least one round is required")]
    InvalidPrimalityRounds(usize),

    /// A private key whose fields do not satisfy the RSA relations.
    #[error("inconsistent private key: {0}")]
    InconsistentKey(&'static str),

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl RsaError {
    pub(crate) fn encoding(field: &'static str, reason: impl Into<String>) -> Self {
        RsaError::InvalidEncoding {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;
