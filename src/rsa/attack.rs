// Key recovery by trial division
// Works from the public key alone: factor N, rebuild φ(N), invert e

use num_traits::{One, Zero};
use tracing::{debug, info, warn};

use super::bigint::{from_u64, isqrt, mod_inverse, totient, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::{RsaPrivateKey, RsaPublicKey};

/// Below this modulus a key is considered breakable on sight
pub const WEAK_MODULUS_LIMIT: u64 = 1000;

/// Outcome of comparing a recovered exponent with the real one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// d' == d
    ExactMatch,
    /// d' != d, but e*d' ≡ 1 (mod φ(N)), so it decrypts just as well
    EquivalentExponent,
    NotCompromised,
}

impl Verdict {
    pub fn is_compromised(self) -> bool {
        !matches!(self, Verdict::NotCompromised)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrength {
    ExtremelyWeak { bits: u64 },
    Reasonable { bits: u64 },
}

/// Quick size-based assessment of a public modulus
pub fn assess_strength(n: &RsaBigInt) -> KeyStrength {
    let bits = n.bits();
    if *n < from_u64(WEAK_MODULUS_LIMIT) {
        KeyStrength::ExtremelyWeak { bits }
    } else {
        KeyStrength::Reasonable { bits }
    }
}

/// Factor `n` by testing every candidate in `2..=isqrt(n)`.
/// Returns `(p, q)` with `p <= q`, or `Unfactored` if `n` has no such divisor.
pub fn factor(n: &RsaBigInt) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    factor_with_budget(n, None)
}

/// [`factor`] that tests at most `budget` candidates before giving up
/// with `Inconclusive`.
pub fn factor_with_budget(
    n: &RsaBigInt,
    budget: Option<u64>,
) -> RsaResult<(RsaBigInt, RsaBigInt)> {
    let limit = isqrt(n);
    let mut candidate = from_u64(2);
    let mut tested: u64 = 0;

    while candidate <= limit {
        if budget.is_some_and(|max| tested >= max) {
            warn!(%n, tested, "factoring budget exhausted");
            return Err(RsaError::Inconclusive {
                n: n.clone(),
                tested,
            });
        }
        tested += 1;

        if (n % &candidate).is_zero() {
            let cofactor = n / &candidate;
            info!(%n, p = %candidate, q = %cofactor, tested, "factored modulus");
            return Ok((candidate, cofactor));
        }
        candidate += 1u8;
    }

    debug!(%n, tested, "no divisor found");
    Err(RsaError::Unfactored { n: n.clone() })
}

/// Factor `n` and compute `d' = e^(-1) mod φ(n)`
pub fn recover_private_exponent(n: &RsaBigInt, e: &RsaBigInt) -> RsaResult<RsaBigInt> {
    recover_private_exponent_with_budget(n, e, None)
}

/// [`recover_private_exponent`] with the factoring step capped at `budget`
/// trial divisions. Running out yields `Inconclusive`, never a wrong `d`.
pub fn recover_private_exponent_with_budget(
    n: &RsaBigInt,
    e: &RsaBigInt,
    budget: Option<u64>,
) -> RsaResult<RsaBigInt> {
    let (p, q) = factor_with_budget(n, budget)?;
    invert_exponent(&p, &q, e)
}

fn invert_exponent(p: &RsaBigInt, q: &RsaBigInt, e: &RsaBigInt) -> RsaResult<RsaBigInt> {
    let phi = totient(p, q);
    mod_inverse(e, &phi).map_err(|_| RsaError::NonCoprimeExponent {
        e: e.clone(),
        phi,
    })
}

/// Rebuild every private key field from the public key
pub fn recover_private_key(
    public_key: &RsaPublicKey,
    budget: Option<u64>,
) -> RsaResult<RsaPrivateKey> {
    let (p, q) = factor_with_budget(&public_key.n, budget)?;
    let d = invert_exponent(&p, &q, &public_key.e)?;

    // Factors of a valid modulus are distinct primes, so q is invertible mod p
    let q_inv = mod_inverse(&q, &p)?;

    Ok(RsaPrivateKey {
        n: public_key.n.clone(),
        d_p: &d % (&p - 1u8),
        d_q: &d % (&q - 1u8),
        d,
        p,
        q,
        q_inv,
    })
}

/// Did the attacker get exactly the owner's exponent?
pub fn is_compromised(recovered_d: &RsaBigInt, actual_d: &RsaBigInt) -> bool {
    recovered_d == actual_d
}

/// Any `d'` with `e*d' ≡ 1 (mod φ)` decrypts, so it counts as a compromise
/// even when it differs from `d`.
pub fn verdict(
    recovered_d: &RsaBigInt,
    actual_d: &RsaBigInt,
    e: &RsaBigInt,
    phi: &RsaBigInt,
) -> Verdict {
    if is_compromised(recovered_d, actual_d) {
        Verdict::ExactMatch
    } else if !phi.is_zero() && ((e * recovered_d) % phi).is_one() {
        Verdict::EquivalentExponent
    } else {
        Verdict::NotCompromised
    }
}
