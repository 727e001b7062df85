// RSA Decryption Implementation
// Textbook RSA: m = c^d mod n on a single integer block

use num_bigint::BigUint;

use super::bigint::mod_pow;
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPrivateKey;

/// Decrypt an integer ciphertext using the RSA private key
pub fn decrypt(ciphertext: &BigUint, private_key: &RsaPrivateKey) -> RsaResult<BigUint> {
    // Validate ciphertext size
    if ciphertext >= &private_key.n {
        return Err(RsaError::MessageOutOfRange {
            modulus: private_key.n.to_string(),
        });
    }

    // Compute m = c^d mod n
    mod_pow(ciphertext, &private_key.d, &private_key.n)
}

/// Decrypt ciphertext to u64
pub fn decrypt_to_u64(ciphertext: &BigUint, private_key: &RsaPrivateKey) -> RsaResult<u64> {
    let plaintext = decrypt(ciphertext, private_key)?;
    u64::try_from(&plaintext).map_err(|_| {
        RsaError::InvalidArgument(format!("decrypted value {} does not fit in u64", plaintext))
    })
}

impl RsaPrivateKey {
    /// Decrypt a ciphertext using this private key
    pub fn decrypt(&self, ciphertext: &BigUint) -> RsaResult<BigUint> {
        decrypt(ciphertext, self)
    }
}
