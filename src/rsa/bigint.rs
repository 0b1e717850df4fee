// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::trace;

use super::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to bytes (big-endian). Zero becomes an empty vector.
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    if n.is_zero() {
        return Vec::new();
    }
    n.to_bytes_be()
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if modulus.is_zero() {
        return Err(RsaError::InvalidModulus);
    }
    if modulus.is_one() {
        return Ok(RsaBigInt::zero());
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    Ok(result)
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    (old_r, old_s, old_t)
}

/// Compute modular inverse: a^(-1) mod m, in [0, m)
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if m.is_zero() {
        return Err(RsaError::InvalidModulus);
    }
    if m.is_one() {
        // Everything is congruent to 0 mod 1, and 0 * 0 ≡ 1 holds trivially
        return Ok(RsaBigInt::zero());
    }

    let a_signed = BigInt::from_biguint(Sign::Plus, a % m);
    let m_signed = BigInt::from_biguint(Sign::Plus, m.clone());
    let (gcd, x, _) = extended_gcd(&a_signed, &m_signed);

    if !gcd.is_one() {
        return Err(RsaError::NoInverseExists {
            a: a.clone(),
            m: m.clone(),
        });
    }

    let inverse = x.mod_floor(&m_signed);
    trace!(%a, %m, %inverse, "modular inverse");

    // mod_floor with a positive modulus is never negative
    Ok(inverse.to_biguint().unwrap_or_default())
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Euler's totient of N = p*q: (p-1)(q-1)
pub fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

/// Floor of the square root
pub fn isqrt(n: &RsaBigInt) -> RsaBigInt {
    n.sqrt()
}

/// Number of significant bits (0 for zero)
pub fn bit_length(n: &RsaBigInt) -> u64 {
    n.bits()
}
