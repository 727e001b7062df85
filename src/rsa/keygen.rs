// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::{info, warn};

use super::bigint::{extended_euclidean, gcd, lcm, BezoutCoefficients};
use super::error::{RsaError, RsaResult};
use super::prime::generate_prime_pair;
use super::primality::PrimalityTest;
use crate::util::config::GeneratorConfig;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigUint, // Modulus
    pub e: BigUint, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: BigUint, // Modulus (same as public)
    pub d: BigUint, // Private exponent
}

/// RSA Key Pair together with the values it was derived from
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub p: BigUint,
    pub q: BigUint,
    /// Carmichael's totient lambda(n) = lcm(p - 1, q - 1)
    pub lambda_n: BigUint,
    /// Coefficients from extended_euclidean(lambda(n), e)
    pub bezout: BezoutCoefficients,
}

/// Bit length of a modulus rounded up to the nearest byte
fn byte_rounded_bits(n: &BigUint) -> u64 {
    (n.bits() + 7) / 8 * 8
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        byte_rounded_bits(&self.n)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        byte_rounded_bits(&self.n)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.n, self.e)
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.n, self.d)
    }
}

/// Derive a key pair from two primes and a public exponent.
///
/// Fails with `UnusablePrimes` when p == q or when e has no inverse
/// modulo lambda(n); callers generating primes should draw again.
pub fn derive_keypair(p: &BigUint, q: &BigUint, e: &BigUint) -> RsaResult<RsaKeyPair> {
    if p == q {
        return Err(RsaError::UnusablePrimes("p and q must be distinct".to_string()));
    }
    if p <= &BigUint::one() || q <= &BigUint::one() {
        return Err(RsaError::InvalidArgument("p and q must exceed 1".to_string()));
    }

    // Step 1: n = p * q
    let n = p * q;

    // Step 2: lambda(n) = lcm(p - 1, q - 1)
    let p_minus_1 = BigInt::from(p - 1u8);
    let q_minus_1 = BigInt::from(q - 1u8);
    let lambda_n = lcm(&p_minus_1, &q_minus_1)?;

    // Step 3: e must be invertible modulo lambda(n)
    let e_signed = BigInt::from(e.clone());
    if !gcd(&e_signed, &lambda_n).is_one() {
        return Err(RsaError::UnusablePrimes(format!(
            "e={} is not coprime with lambda(n)={}",
            e, lambda_n
        )));
    }

    // Step 4: d = t mod lambda(n), where s*lambda(n) + t*e = 1
    let bezout = extended_euclidean(&lambda_n, &e_signed);
    let d = bezout.t.mod_floor(&lambda_n);

    // Both are non-negative here
    let (_, d) = d.into_parts();
    let (_, lambda_n) = lambda_n.into_parts();

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { n: n.clone(), e: e.clone() },
        private_key: RsaPrivateKey { n, d },
        p: p.clone(),
        q: q.clone(),
        lambda_n,
        bezout,
    })
}

/// Generate an RSA key pair whose primes each have `config.prime_bits` bits.
///
/// Draws fresh primes when p == q or when the public exponent is not
/// invertible modulo lambda(n), up to `config.max_key_attempts` times.
pub fn generate_keypair<T, R>(config: &GeneratorConfig, tester: &T, rng: &mut R) -> RsaResult<RsaKeyPair>
where
    T: PrimalityTest,
    R: RngCore + CryptoRng + ?Sized,
{
    config.validate()?;

    for attempt in 1..=config.max_key_attempts {
        let (p, q) = generate_prime_pair(config, tester, rng)?;

        match derive_keypair(&p, &q, &config.public_exponent) {
            Ok(keypair) => {
                info!(
                    attempt,
                    prime_bits = config.prime_bits,
                    modulus_bits = keypair.public_key.n.bits(),
                    test = tester.name(),
                    "key pair generated"
                );
                return Ok(keypair);
            }
            Err(RsaError::UnusablePrimes(reason)) => {
                warn!(attempt, %reason, "rejected prime pair, drawing again");
            }
            Err(e) => return Err(e),
        }
    }

    Err(RsaError::KeyGenerationExhausted {
        attempts: config.max_key_attempts,
    })
}
