// RSA Error Kinds
// Every arithmetic operation returns one of these instead of panicking

use super::bigint::RsaBigInt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsaError {
    /// `e` is out of range or shares a factor with φ(N)
    #[error("public exponent e={e} is not coprime with φ(N)={phi} (or outside 1 < e < φ(N))")]
    InvalidExponent { e: RsaBigInt, phi: RsaBigInt },

    /// p == q, or a "prime" smaller than 2
    #[error("invalid prime pair p={p}, q={q}: primes must be distinct and at least 2")]
    InvalidPrimes { p: RsaBigInt, q: RsaBigInt },

    #[error("modulus must be at least 1")]
    InvalidModulus,

    #[error("no modular inverse of {a} mod {m}: gcd is not 1")]
    NoInverseExists { a: RsaBigInt, m: RsaBigInt },

    #[error("message {m} does not fit the modulus N={n}")]
    MessageTooLarge { m: RsaBigInt, n: RsaBigInt },

    #[error("ciphertext {c} does not fit the modulus N={n}")]
    CiphertextTooLarge { c: RsaBigInt, n: RsaBigInt },

    /// The encoded text is >= N; the caller decides whether to retry with less data
    #[error("encoded text {value} is too large for the modulus N={n}")]
    EncodingOverflow { value: RsaBigInt, n: RsaBigInt },

    #[error("decrypted bytes are not valid UTF-8")]
    InvalidUtf8,

    #[error("cannot invert e={e} modulo recovered φ(N)={phi}")]
    NonCoprimeExponent { e: RsaBigInt, phi: RsaBigInt },

    #[error("no divisor of N={n} found up to √N")]
    Unfactored { n: RsaBigInt },

    #[error("factoring N={n} gave up after testing {tested} candidates")]
    Inconclusive { n: RsaBigInt, tested: u64 },
}

/// Result type for RSA core operations
pub type RsaResult<T> = Result<T, RsaError>;
