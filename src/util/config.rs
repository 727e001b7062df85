// Generator Configuration
// Explicit settings threaded through prime search and key generation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use num_bigint::BigUint;
use num_integer::Integer;

use crate::rsa::error::{RsaError, RsaResult};
use crate::rsa::primality::{
    MillerRabin, Primality, TrialDivision, DEFAULT_MILLER_RABIN_ROUNDS,
};

/// Default public exponent, 2^16 + 1
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Shared flag polled by long-running searches
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once the flag has been raised
    pub fn check(&self) -> RsaResult<()> {
        if self.is_cancelled() {
            Err(RsaError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Configuration for prime and key generation
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Bit width of each prime; a positive multiple of 8
    pub prime_bits: u32,
    pub miller_rabin_rounds: u32,
    pub public_exponent: BigUint,
    /// Upper bound on candidates tried per prime; unbounded when `None`
    pub max_search_steps: Option<u64>,
    /// Fresh (p, q) draws allowed before key generation gives up
    pub max_key_attempts: u32,
    pub cancel: CancelFlag,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            prime_bits: 1024,
            miller_rabin_rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            public_exponent: BigUint::from(DEFAULT_PUBLIC_EXPONENT),
            max_search_steps: None,
            max_key_attempts: 64,
            cancel: CancelFlag::new(),
        }
    }
}

impl GeneratorConfig {
    /// Small primes, cheap enough for trial division
    pub fn deterministic_demo() -> Self {
        Self::default().with_prime_bits(32)
    }

    pub fn probabilistic_demo() -> Self {
        Self::default()
    }

    pub fn with_prime_bits(mut self, bits: u32) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.miller_rabin_rounds = rounds;
        self
    }

    pub fn with_public_exponent(mut self, e: impl Into<BigUint>) -> Self {
        self.public_exponent = e.into();
        self
    }

    pub fn with_max_search_steps(mut self, steps: u64) -> Self {
        self.max_search_steps = Some(steps);
        self
    }

    pub fn with_max_key_attempts(mut self, attempts: u32) -> Self {
        self.max_key_attempts = attempts;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reject malformed settings before any work starts
    pub fn validate(&self) -> RsaResult<()> {
        if self.prime_bits == 0 || self.prime_bits % 8 != 0 {
            return Err(RsaError::InvalidConfig(format!(
                "prime bit width must be a positive multiple of 8, got {}",
                self.prime_bits
            )));
        }
        if self.miller_rabin_rounds == 0 {
            return Err(RsaError::InvalidConfig(
                "Miller-Rabin round count must be positive".to_string(),
            ));
        }
        if self.public_exponent < BigUint::from(3u8) || self.public_exponent.is_even() {
            return Err(RsaError::InvalidConfig(format!(
                "public exponent must be odd and at least 3, got {}",
                self.public_exponent
            )));
        }
        if self.max_search_steps == Some(0) {
            return Err(RsaError::InvalidConfig(
                "maximum search steps must be positive".to_string(),
            ));
        }
        if self.max_key_attempts == 0 {
            return Err(RsaError::InvalidConfig(
                "maximum key attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Trial division wired to this configuration's cancel flag
    pub fn trial_division(&self) -> Primality {
        Primality::TrialDivision(TrialDivision::new().with_cancel_flag(self.cancel.clone()))
    }

    /// Miller-Rabin with this configuration's round count and cancel flag
    pub fn miller_rabin(&self) -> RsaResult<Primality> {
        let tester = MillerRabin::new(self.miller_rabin_rounds)?;
        Ok(Primality::MillerRabin(
            tester.with_cancel_flag(self.cancel.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.prime_bits, 1024);
        assert_eq!(config.miller_rabin_rounds, 400);
        assert_eq!(config.public_exponent, BigUint::from(65537u32));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(GeneratorConfig::deterministic_demo().prime_bits, 32);
        assert_eq!(GeneratorConfig::probabilistic_demo().prime_bits, 1024);
    }

    #[rstest]
    #[case(GeneratorConfig::default().with_prime_bits(0))]
    #[case(GeneratorConfig::default().with_prime_bits(30))]
    #[case(GeneratorConfig::default().with_rounds(0))]
    #[case(GeneratorConfig::default().with_public_exponent(1u32))]
    #[case(GeneratorConfig::default().with_public_exponent(65536u32))]
    #[case(GeneratorConfig::default().with_max_search_steps(0))]
    #[case(GeneratorConfig::default().with_max_key_attempts(0))]
    fn test_validate_rejects(#[case] config: GeneratorConfig) {
        assert!(matches!(config.validate(), Err(RsaError::InvalidConfig(_))));
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let config = GeneratorConfig::default().with_cancel_flag(flag.clone());
        assert!(config.cancel.check().is_ok());

        flag.cancel();
        assert!(config.cancel.is_cancelled());
        assert!(matches!(config.cancel.check(), Err(RsaError::Cancelled)));
    }
}
