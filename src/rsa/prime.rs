// Prime Generation
// Walks upward over odd candidates until the selected primality test passes

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use super::error::{RsaError, RsaResult};
use super::primality::PrimalityTest;
use super::random::random_prime_candidate;
use crate::util::config::GeneratorConfig;

/// Generate a prime of `config.prime_bits` bits.
///
/// A random odd candidate with its top bit set is drawn once, then advanced
/// by 2 until `tester` accepts it. The walk stops early when the cancel flag
/// is raised or `config.max_search_steps` candidates have been rejected.
pub fn generate_prime<T, R>(config: &GeneratorConfig, tester: &T, rng: &mut R) -> RsaResult<BigUint>
where
    T: PrimalityTest,
    R: RngCore + CryptoRng + ?Sized,
{
    let mut candidate = random_prime_candidate(config.prime_bits, rng)?;
    let mut steps = 0u64;

    loop {
        config.cancel.check()?;
        steps += 1;

        if tester.is_prime(&candidate, rng)? {
            debug!(
                bits = config.prime_bits,
                steps,
                test = tester.name(),
                "prime found"
            );
            return Ok(candidate);
        }

        if let Some(max) = config.max_search_steps {
            if steps >= max {
                return Err(RsaError::SearchExhausted { attempts: steps });
            }
        }

        candidate += 2u8;
    }
}

/// Two independently drawn primes (p, q); equality is not checked here
pub fn generate_prime_pair<T, R>(
    config: &GeneratorConfig,
    tester: &T,
    rng: &mut R,
) -> RsaResult<(BigUint, BigUint)>
where
    T: PrimalityTest,
    R: RngCore + CryptoRng + ?Sized,
{
    let p = generate_prime(config, tester, rng)?;
    let q = generate_prime(config, tester, rng)?;
    Ok((p, q))
}
