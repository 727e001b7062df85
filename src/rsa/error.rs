// RSA Error Types
// Every fallible operation in the engine reports one of these

use thiserror::Error;

/// Errors raised by the RSA engine
#[derive(Debug, Error)]
pub enum RsaError {
    /// The secure random source could not produce bytes
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The primes are valid but cannot form a key (p == q, or e not invertible)
    #[error("unusable prime pair: {0}")]
    UnusablePrimes(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("value must be in [0, {modulus}) for this key")]
    MessageOutOfRange { modulus: String },

    #[error("no prime found after {attempts} candidates")]
    SearchExhausted { attempts: u64 },

    #[error("no usable prime pair found after {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },

    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
