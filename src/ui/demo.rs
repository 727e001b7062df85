// Demo Scenarios
// Runs key generation, encryption and decryption end to end and records every step

use std::fmt;

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::info;

use crate::rsa::bigint::BezoutCoefficients;
use crate::rsa::error::{RsaError, RsaResult};
use crate::rsa::keygen::{generate_keypair, RsaKeyPair};
use crate::rsa::primality::PrimalityTest;
use crate::util::config::GeneratorConfig;

/// Sample message for the deterministic scenario
pub const DETERMINISTIC_MESSAGE: u64 = 65;
/// Sample message for the probabilistic scenario
pub const PROBABILISTIC_MESSAGE: u64 = 2_147_000_000;
/// Widest prime trial division can find in reasonable time
pub const MAX_TRIAL_DIVISION_BITS: u32 = 64;

/// Everything a demo run produced, in the order it was computed
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub title: String,
    pub prime_bits: u32,
    pub keypair: RsaKeyPair,
    pub message: BigUint,
    pub ciphertext: BigUint,
    pub decrypted: BigUint,
}

impl DemoReport {
    pub fn round_trip_ok(&self) -> bool {
        self.message == self.decrypted
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = &self.keypair;
        let BezoutCoefficients { s, t } = &keys.bezout;

        writeln!(f, "{}", self.title)?;
        writeln!(f, "{} bit prime pair: ({}, {})", self.prime_bits, keys.p, keys.q)?;
        writeln!(
            f,
            "Key length (rounded up to nearest byte): {} bits",
            keys.bit_length()
        )?;
        writeln!(f, "PQ-Product: {}", keys.public_key.n)?;
        writeln!(f, "Carmichael's totient (lambda(n)): {}", keys.lambda_n)?;
        writeln!(f, "Bezout Coefficients: ({}, {})", s, t)?;
        writeln!(f, "d: {}", keys.private_key.d)?;
        writeln!(f, "Public key: {}", keys.public_key)?;
        writeln!(f, "Private key: {}", keys.private_key)?;
        writeln!(f, "Example message: {}", self.message)?;
        writeln!(f, "Encrypted form: {}", self.ciphertext)?;
        writeln!(
            f,
            "Encrypted form (hex): {}",
            hex::encode(self.ciphertext.to_bytes_be())
        )?;
        write!(f, "Decrypted form: {}", self.decrypted)
    }
}

fn run_scenario<T, R>(
    title: String,
    config: &GeneratorConfig,
    tester: &T,
    message: &BigUint,
    rng: &mut R,
) -> RsaResult<DemoReport>
where
    T: PrimalityTest,
    R: RngCore + CryptoRng + ?Sized,
{
    info!(%title, prime_bits = config.prime_bits, "running scenario");

    let keypair = generate_keypair(config, tester, rng)?;
    let ciphertext = keypair.public_key.encrypt(message)?;
    let decrypted = keypair.private_key.decrypt(&ciphertext)?;

    Ok(DemoReport {
        title,
        prime_bits: config.prime_bits,
        keypair,
        message: message.clone(),
        ciphertext,
        decrypted,
    })
}

/// Key generation with guaranteed primes from trial division
pub fn run_deterministic_demo<R>(
    config: &GeneratorConfig,
    message: &BigUint,
    rng: &mut R,
) -> RsaResult<DemoReport>
where
    R: RngCore + CryptoRng + ?Sized,
{
    config.validate()?;
    if config.prime_bits > MAX_TRIAL_DIVISION_BITS {
        return Err(RsaError::InvalidConfig(format!(
            "trial division is limited to {}-bit primes, got {}",
            MAX_TRIAL_DIVISION_BITS, config.prime_bits
        )));
    }
    let tester = config.trial_division();
    run_scenario(
        "Running RSA example with definite primes".to_string(),
        config,
        &tester,
        message,
        rng,
    )
}

/// Key generation with Miller-Rabin probable primes
pub fn run_probabilistic_demo<R>(
    config: &GeneratorConfig,
    message: &BigUint,
    rng: &mut R,
) -> RsaResult<DemoReport>
where
    R: RngCore + CryptoRng + ?Sized,
{
    config.validate()?;
    let tester = config.miller_rabin()?;
    let title = format!(
        "Running RSA example with probabilistic primes ({} rounds of Miller-Rabin)",
        config.miller_rabin_rounds
    );
    run_scenario(title, config, &tester, message, rng)
}

/// Deterministic scenario with its default settings and the OS entropy source
pub fn deterministic_demo() -> RsaResult<DemoReport> {
    run_deterministic_demo(
        &GeneratorConfig::deterministic_demo(),
        &BigUint::from(DETERMINISTIC_MESSAGE),
        &mut OsRng,
    )
}

/// Probabilistic scenario with its default settings and the OS entropy source
pub fn probabilistic_demo() -> RsaResult<DemoReport> {
    run_probabilistic_demo(
        &GeneratorConfig::probabilistic_demo(),
        &BigUint::from(PROBABILISTIC_MESSAGE),
        &mut OsRng,
    )
}
