// Primality Testing
// Deterministic trial division and probabilistic Miller-Rabin behind one trait

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use tracing::trace;

use super::bigint::{integer_sqrt, mod_pow};
use super::error::{RsaError, RsaResult};
use super::random::random_in_range;
use crate::util::config::CancelFlag;

/// Default number of Miller-Rabin rounds
pub const DEFAULT_MILLER_RABIN_ROUNDS: u32 = 400;

/// A strategy that decides whether one candidate integer is prime
pub trait PrimalityTest {
    /// Short name used in logs and demo titles
    fn name(&self) -> &'static str;

    fn is_prime<R>(&self, candidate: &BigUint, rng: &mut R) -> RsaResult<bool>
    where
        R: RngCore + CryptoRng + ?Sized;
}

/// Trial division by every odd integer up to floor(sqrt(n))
///
/// Exact, but O(sqrt(n)) divisions: only usable for small bit widths.
#[derive(Debug, Clone, Default)]
pub struct TrialDivision {
    cancel: Option<CancelFlag>,
}

impl TrialDivision {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll `cancel` between divisions
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl PrimalityTest for TrialDivision {
    fn name(&self) -> &'static str {
        "trial division"
    }

    fn is_prime<R>(&self, candidate: &BigUint, _rng: &mut R) -> RsaResult<bool>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let two = BigUint::from(2u8);
        let five = BigUint::from(5u8);

        if candidate <= &BigUint::one() {
            return Ok(false);
        }
        if candidate == &two || candidate == &five {
            return Ok(true);
        }
        if candidate.is_even() || (candidate % &five).is_zero() {
            return Ok(false);
        }

        let upper_bound = integer_sqrt(&BigInt::from(candidate.clone()))?;
        let mut divisor = BigUint::from(3u8);
        while divisor <= upper_bound {
            if (candidate % &divisor).is_zero() {
                return Ok(false);
            }
            if let Some(cancel) = &self.cancel {
                cancel.check()?;
            }
            divisor += 2u8;
        }

        Ok(true)
    }
}

/// Miller-Rabin with a configurable number of rounds
///
/// A composite survives one round with probability at most 1/4, so the
/// false-positive rate is bounded by 4^(-rounds).
#[derive(Debug, Clone)]
pub struct MillerRabin {
    rounds: u32,
    cancel: Option<CancelFlag>,
}

impl MillerRabin {
    pub fn new(rounds: u32) -> RsaResult<Self> {
        if rounds == 0 {
            return Err(RsaError::InvalidConfig(
                "Miller-Rabin needs at least one round".to_string(),
            ));
        }
        Ok(Self { rounds, cancel: None })
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            cancel: None,
        }
    }
}

impl PrimalityTest for MillerRabin {
    fn name(&self) -> &'static str {
        "Miller-Rabin"
    }

    fn is_prime<R>(&self, candidate: &BigUint, rng: &mut R) -> RsaResult<bool>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let one = BigUint::one();
        let two = BigUint::from(2u8);

        if candidate < &two {
            return Ok(false);
        }
        if candidate == &two || candidate == &BigUint::from(3u8) {
            return Ok(true);
        }
        if candidate.is_even() {
            return Ok(false);
        }

        let n_minus_one = candidate - &one;
        let (s, d) = factor_out_twos(&n_minus_one);

        for round in 0..self.rounds {
            if let Some(cancel) = &self.cancel {
                cancel.check()?;
            }

            // Base a in [2, n - 2]
            let a = random_in_range(&two, &n_minus_one, rng)?;
            let mut x = mod_pow(&a, &d, candidate)?;

            for _ in 0..s {
                let y = (&x * &x) % candidate;
                if y.is_one() && !x.is_one() && x != n_minus_one {
                    trace!(round, "nontrivial square root of 1 found");
                    return Ok(false);
                }
                x = y;
            }

            if !x.is_one() {
                trace!(round, "Fermat witness found");
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Split `m` into `(s, d)` with `m == 2^s * d` and `d` odd
fn factor_out_twos(m: &BigUint) -> (u64, BigUint) {
    let mut s = 0u64;
    let mut d = m.clone();
    while !d.is_zero() && d.is_even() {
        d >>= 1u32;
        s += 1;
    }
    (s, d)
}

/// Caller-selectable primality strategy
#[derive(Debug, Clone)]
pub enum Primality {
    TrialDivision(TrialDivision),
    MillerRabin(MillerRabin),
}

impl PrimalityTest for Primality {
    fn name(&self) -> &'static str {
        match self {
            Primality::TrialDivision(t) => t.name(),
            Primality::MillerRabin(m) => m.name(),
        }
    }

    fn is_prime<R>(&self, candidate: &BigUint, rng: &mut R) -> RsaResult<bool>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        match self {
            Primality::TrialDivision(t) => t.is_prime(candidate, rng),
            Primality::MillerRabin(m) => m.is_prime(candidate, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::random::testing::BrokenRng;

    use num_traits::Num;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn rng() -> StdRng {
        StdRng::from_seed([101; 32])
    }

    #[rstest]
    #[case(2u64)]
    #[case(3)]
    #[case(5)]
    #[case(7)]
    #[case(37)]
    #[case(7919)]
    #[case(65537)]
    #[case(4_294_967_291)]
    fn test_trial_division_identifies_primes(#[case] prime: u64) {
        let tester = TrialDivision::new();
        assert!(tester.is_prime(&BigUint::from(prime), &mut rng()).unwrap());
    }

    #[rstest]
    #[case(0u64)]
    #[case(1)]
    #[case(4)]
    #[case(9)]
    #[case(25)]
    #[case(1024)]
    #[case(1025)]
    #[case(4_294_967_297)]
    fn test_trial_division_identifies_non_primes(#[case] non_prime: u64) {
        let tester = TrialDivision::new();
        assert!(!tester.is_prime(&BigUint::from(non_prime), &mut rng()).unwrap());
    }

    #[rstest]
    #[case(BigUint::from(2u64))]
    #[case(BigUint::from(37u64))]
    #[case(BigUint::from(65537u64))]
    #[case(BigUint::from_str_radix(
        "122918091607895345462109112013423411099284103879272281586\
        0819946412949055199827238447096054805339148543003066133719\
        9085275880150614723662649630584506204331", 10).unwrap())
    ]
    fn test_miller_rabin_identifies_primes(#[case] prime: BigUint) {
        let tester = MillerRabin::new(40).unwrap();
        assert!(tester.is_prime(&prime, &mut rng()).unwrap());
    }

    #[rstest]
    #[case(BigUint::from(0u64))]
    #[case(BigUint::from(1u64))]
    #[case(BigUint::from(4u64))]
    #[case(BigUint::from(561u64))]
    #[case(BigUint::from(1025u64))]
    // Product of two 64-bit primes
    #[case(BigUint::from(18_446_744_073_709_551_557u64) * BigUint::from(18_446_744_073_709_551_533u64))]
    fn test_miller_rabin_identifies_non_primes(#[case] non_prime: BigUint) {
        let tester = MillerRabin::new(40).unwrap();
        assert!(!tester.is_prime(&non_prime, &mut rng()).unwrap());
    }

    #[test]
    fn test_testers_agree_below_ten_thousand() {
        let trial = Primality::TrialDivision(TrialDivision::new());
        let miller_rabin = Primality::MillerRabin(MillerRabin::new(20).unwrap());
        let mut rng = rng();

        for n in 0u32..10_000 {
            let candidate = BigUint::from(n);
            assert_eq!(
                trial.is_prime(&candidate, &mut rng).unwrap(),
                miller_rabin.is_prime(&candidate, &mut rng).unwrap(),
                "testers disagree on {n}"
            );
        }
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(matches!(MillerRabin::new(0), Err(RsaError::InvalidConfig(_))));
    }

    #[test]
    fn test_factor_out_twos() {
        // 96 = 2^5 * 3
        assert_eq!(factor_out_twos(&BigUint::from(96u8)), (5, BigUint::from(3u8)));
        assert_eq!(factor_out_twos(&BigUint::from(7u8)), (0, BigUint::from(7u8)));
    }

    #[test]
    fn test_cancelled_trial_division_stops() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let tester = TrialDivision::new().with_cancel_flag(cancel);
        let result = tester.is_prime(&BigUint::from(4_294_967_291u64), &mut rng());
        assert!(matches!(result, Err(RsaError::Cancelled)));
    }

    #[test]
    fn test_cancelled_miller_rabin_stops() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let tester = MillerRabin::new(5).unwrap().with_cancel_flag(cancel);
        let result = tester.is_prime(&BigUint::from(1_000_003u64), &mut rng());
        assert!(matches!(result, Err(RsaError::Cancelled)));
    }

    #[test]
    fn test_miller_rabin_reports_entropy_failure() {
        let tester = MillerRabin::new(5).unwrap();
        let result = tester.is_prime(&BigUint::from(1_000_003u64), &mut BrokenRng);
        assert!(matches!(result, Err(RsaError::Entropy(_))));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(Primality::TrialDivision(TrialDivision::new()).name(), "trial division");
        assert_eq!(Primality::MillerRabin(MillerRabin::default()).name(), "Miller-Rabin");
    }
}
