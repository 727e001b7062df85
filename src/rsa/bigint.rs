// RSA Big Integer Operations
// Number theory over num-bigint: modular exponentiation, Euclid, square roots

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::error::{RsaError, RsaResult};

/// Bezout coefficients `(s, t)` with `s*n1 + t*n2 == gcd(n1, n2)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BezoutCoefficients {
    pub s: BigInt,
    pub t: BigInt,
}

/// Modular exponentiation: base^exponent mod modulus
/// Uses square-and-multiply, scanning the exponent from its lowest bit
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> RsaResult<BigUint> {
    if modulus.is_zero() {
        return Err(RsaError::InvalidArgument("modulus must be positive".to_string()));
    }
    if modulus.is_one() {
        return Ok(BigUint::zero());
    }

    let mut result = BigUint::one();
    let mut base = base % modulus;
    let mut exponent = exponent.clone();

    while !exponent.is_zero() {
        if exponent.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exponent >>= 1u32;
    }

    Ok(result)
}

/// Extended Euclidean Algorithm
///
/// Iterates the remainder, s and t sequences side by side until the second
/// remainder reaches zero. The coefficients are sign-adjusted so that
/// `s*n1 + t*n2` equals the non-negative gcd even for negative inputs.
pub fn extended_euclidean(n1: &BigInt, n2: &BigInt) -> BezoutCoefficients {
    let mut r = (n1.clone(), n2.clone());
    let mut s = (BigInt::one(), BigInt::zero());
    let mut t = (BigInt::zero(), BigInt::one());

    while !r.1.is_zero() {
        let quotient = &r.0 / &r.1;

        let next_r = &r.0 - &quotient * &r.1;
        r = (r.1, next_r);
        let next_s = &s.0 - &quotient * &s.1;
        s = (s.1, next_s);
        let next_t = &t.0 - &quotient * &t.1;
        t = (t.1, next_t);
    }

    if r.0.is_negative() {
        BezoutCoefficients { s: -s.0, t: -t.0 }
    } else {
        BezoutCoefficients { s: s.0, t: t.0 }
    }
}

/// Greatest common divisor (always non-negative)
pub fn gcd(n1: &BigInt, n2: &BigInt) -> BigInt {
    let mut a = n1.clone();
    let mut b = n2.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a.abs()
}

/// Least common multiple: |n1 * n2| / gcd(n1, n2)
pub fn lcm(n1: &BigInt, n2: &BigInt) -> RsaResult<BigInt> {
    if n1.is_zero() && n2.is_zero() {
        return Err(RsaError::InvalidArgument("lcm(0, 0) is undefined".to_string()));
    }
    Ok((n1 * n2).abs() / gcd(n1, n2))
}

/// Floor of the square root, by Newton's method.
///
/// Starts from `2^(ceil(log2 n) / 2)` and iterates `root = (root + n/root) / 2`
/// until `root^2 <= n < (root + 1)^2`.
pub fn integer_sqrt(n: &BigInt) -> RsaResult<BigUint> {
    if n.sign() == Sign::Minus {
        return Err(RsaError::InvalidArgument(format!(
            "square root of negative value {}",
            n
        )));
    }

    let n = n.magnitude();
    if n.is_zero() {
        return Ok(BigUint::zero());
    }

    let bits = n.bits();
    let ceil_log2 = if n.trailing_zeros() == Some(bits - 1) {
        bits - 1
    } else {
        bits
    };

    let mut root = BigUint::one() << (ceil_log2 / 2);
    while !is_floor_sqrt(n, &root) {
        root = (&root + n / &root) >> 1u32;
    }

    Ok(root)
}

fn is_floor_sqrt(n: &BigUint, root: &BigUint) -> bool {
    let lower_bound = root * root;
    let next = root + 1u8;
    let upper_bound = &next * &next;
    &lower_bound <= n && n < &upper_bound
}
