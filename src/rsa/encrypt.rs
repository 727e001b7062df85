// RSA Encryption Implementation
// Textbook RSA: c = m^e mod n on a single integer block

use num_bigint::BigUint;

use super::bigint::mod_pow;
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPublicKey;

/// Encrypt an integer message using the RSA public key
/// The message must already be smaller than the modulus
pub fn encrypt(message: &BigUint, public_key: &RsaPublicKey) -> RsaResult<BigUint> {
    if message >= &public_key.n {
        return Err(RsaError::MessageOutOfRange {
            modulus: public_key.n.to_string(),
        });
    }

    // Compute c = m^e mod n
    mod_pow(message, &public_key.e, &public_key.n)
}

/// Encrypt a u64 value using the RSA public key
pub fn encrypt_u64(value: u64, public_key: &RsaPublicKey) -> RsaResult<BigUint> {
    encrypt(&BigUint::from(value), public_key)
}

impl RsaPublicKey {
    /// Encrypt a message using this public key
    pub fn encrypt(&self, message: &BigUint) -> RsaResult<BigUint> {
        encrypt(message, self)
    }
}
