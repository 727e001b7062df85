// Random Big Integer Generation
// Draws arbitrary-precision integers from a cryptographically secure byte source

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use super::error::{RsaError, RsaResult};

/// Generate a uniformly random non-negative integer of `bit_count` bits.
///
/// `bit_count / 8` secure bytes are drawn and folded most-significant-bit
/// first, so the first byte drawn holds the highest bits. The top bit is
/// not forced; use [`random_prime_candidate`] when the exact width matters.
pub fn random_bits<R>(bit_count: u32, rng: &mut R) -> RsaResult<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bit_count == 0 || bit_count % 8 != 0 {
        return Err(RsaError::InvalidConfig(format!(
            "bit count must be a positive multiple of 8, got {}",
            bit_count
        )));
    }

    let mut bytes = vec![0u8; (bit_count / 8) as usize];
    rng.try_fill_bytes(&mut bytes)?;

    let mut value = BigUint::zero();
    for byte in &bytes {
        for shift in (0..8).rev() {
            value <<= 1u32;
            if (byte >> shift) & 1 == 1 {
                value += 1u8;
            }
        }
    }

    Ok(value)
}

/// Random odd integer with exactly `bit_count` significant bits
pub fn random_prime_candidate<R>(bit_count: u32, rng: &mut R) -> RsaResult<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut candidate = random_bits(bit_count, rng)?;
    candidate |= BigUint::one() << (bit_count - 1);
    if candidate.is_even() {
        candidate += 1u8;
    }
    Ok(candidate)
}

/// Uniformly random integer in `[low, high)`, by rejection sampling
pub fn random_in_range<R>(low: &BigUint, high: &BigUint, rng: &mut R) -> RsaResult<BigUint>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if low >= high {
        return Err(RsaError::InvalidArgument(format!(
            "empty range [{}, {})",
            low, high
        )));
    }

    let span = high - low;
    let bits = span.bits();
    let byte_len = ((bits + 7) / 8) as usize;
    let excess = byte_len as u64 * 8 - bits;
    let mut buf = vec![0u8; byte_len];

    loop {
        rng.try_fill_bytes(&mut buf)?;
        let offset = BigUint::from_bytes_be(&buf) >> excess;
        if offset < span {
            return Ok(low + offset);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{BrokenRng, ReplayRng};
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[test]
    fn test_bits_fold_most_significant_first() {
        let mut rng = ReplayRng::new(vec![0x80, 0x01]);
        let value = random_bits(16, &mut rng).unwrap();
        assert_eq!(value, BigUint::from(0x8001u32));
    }

    #[test]
    fn test_bits_never_exceed_width() {
        let mut rng = StdRng::from_seed([7; 32]);
        for _ in 0..50 {
            let value = random_bits(64, &mut rng).unwrap();
            assert!(value.bits() <= 64);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(33)]
    fn test_bits_rejects_bad_width(#[case] bits: u32) {
        let mut rng = StdRng::from_seed([7; 32]);
        let result = random_bits(bits, &mut rng);
        assert!(matches!(result, Err(RsaError::InvalidConfig(_))));
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let result = random_bits(32, &mut BrokenRng);
        assert!(matches!(result, Err(RsaError::Entropy(_))));
    }

    #[test]
    fn test_candidate_has_exact_width_and_is_odd() {
        // All-zero bytes would otherwise give 0
        let mut rng = ReplayRng::new(vec![0x00]);
        let candidate = random_prime_candidate(32, &mut rng).unwrap();
        assert_eq!(candidate, BigUint::from(0x8000_0001u32));

        let mut rng = StdRng::from_seed([3; 32]);
        for _ in 0..50 {
            let candidate = random_prime_candidate(128, &mut rng).unwrap();
            assert_eq!(candidate.bits(), 128);
            assert!(candidate.is_odd());
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = StdRng::from_seed([11; 32]);
        let low = BigUint::from(2u8);
        let high = BigUint::from(5u8);
        for _ in 0..200 {
            let value = random_in_range(&low, &high, &mut rng).unwrap();
            assert!(value >= low && value < high);
        }
    }

    #[test]
    fn test_range_empty_is_invalid() {
        let mut rng = StdRng::from_seed([11; 32]);
        let two = BigUint::from(2u8);
        let result = random_in_range(&two, &two, &mut rng);
        assert!(matches!(result, Err(RsaError::InvalidArgument(_))));
    }
}
