// RSA Key Generation
// Derives a full key pair from two caller-supplied primes and a public exponent

use num_traits::One;
use tracing::{debug, info};

use super::bigint::{from_u64, gcd, mod_inverse, totient, RsaBigInt};
use super::error::{RsaError, RsaResult};

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt,  // Modulus
    pub e: RsaBigInt,  // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: RsaBigInt,      // Modulus (same as public)
    pub d: RsaBigInt,      // Private exponent
    pub p: RsaBigInt,      // First prime factor
    pub q: RsaBigInt,      // Second prime factor
    // Pre-computed values for faster decryption
    pub d_p: RsaBigInt,    // d mod (p-1)
    pub d_q: RsaBigInt,    // d mod (q-1)
    pub q_inv: RsaBigInt,  // q^(-1) mod p
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Self {
        Self { n, e }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// φ(N) = (p-1)(q-1)
    pub fn phi(&self) -> RsaBigInt {
        totient(&self.p, &self.q)
    }

    /// Project the public half out of the private key.
    ///
    /// `e` is recovered as `d^(-1) mod φ(N)`, which is unique because the
    /// exponent was required to satisfy `1 < e < φ(N)` at generation time.
    pub fn public_key(&self) -> RsaResult<RsaPublicKey> {
        let phi = self.phi();
        let e = mod_inverse(&self.d, &phi).map_err(|_| RsaError::InvalidExponent {
            e: self.d.clone(),
            phi,
        })?;
        Ok(RsaPublicKey::new(self.n.clone(), e))
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }

    pub fn into_parts(self) -> (RsaPublicKey, RsaPrivateKey) {
        (self.public_key, self.private_key)
    }
}

/// Derive an RSA key pair from two distinct primes and a public exponent.
///
/// Primality is not checked; that is the caller's job. Fails with
/// [`RsaError::InvalidPrimes`] when `p == q` or either is below 2, and with
/// [`RsaError::InvalidExponent`] unless `1 < e < φ(N)` and `gcd(e, φ(N)) == 1`.
/// The result is a pure function of the inputs.
pub fn generate(p: &RsaBigInt, q: &RsaBigInt, e: &RsaBigInt) -> RsaResult<RsaKeyPair> {
    let two = from_u64(2);
    if p == q || *p < two || *q < two {
        return Err(RsaError::InvalidPrimes {
            p: p.clone(),
            q: q.clone(),
        });
    }

    // Step 1: Compute n = p * q
    let n = p * q;

    // Step 2: Compute φ(n) = (p-1)(q-1)
    let phi_n = totient(p, q);
    debug!(%n, %phi_n, "derived modulus and totient");

    let invalid_exponent = || RsaError::InvalidExponent {
        e: e.clone(),
        phi: phi_n.clone(),
    };

    // Step 3: Verify 1 < e < φ(n) and gcd(e, φ(n)) == 1
    if *e < two || *e >= phi_n || !gcd(e, &phi_n).is_one() {
        return Err(invalid_exponent());
    }

    // Step 4: Compute d = e^(-1) mod φ(n)
    let d = mod_inverse(e, &phi_n).map_err(|_| invalid_exponent())?;

    // Step 5: Compute CRT parameters for faster decryption
    let d_p = &d % (p - 1u8);
    let d_q = &d % (q - 1u8);
    let q_inv = mod_inverse(q, p)?;

    info!(%n, %e, bits = n.bits(), "generated RSA key pair");

    Ok(RsaKeyPair {
        public_key: RsaPublicKey::new(n.clone(), e.clone()),
        private_key: RsaPrivateKey {
            n,
            d,
            p: p.clone(),
            q: q.clone(),
            d_p,
            d_q,
            q_inv,
        },
    })
}

/// Generate from small machine integers
pub fn generate_u64(p: u64, q: u64, e: u64) -> RsaResult<RsaKeyPair> {
    generate(&from_u64(p), &from_u64(q), &from_u64(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let keypair = generate_u64(11, 17, 3).unwrap();

        assert_eq!(keypair.public_key.n, from_u64(187));
        assert_eq!(keypair.public_key.e, from_u64(3));
        assert_eq!(keypair.private_key.d, from_u64(107));
        assert_eq!(keypair.private_key.phi(), from_u64(160));
        assert_eq!(keypair.bit_length(), 8);
    }

    #[test]
    fn test_crt_parameters() {
        let private = generate_u64(11, 17, 3).unwrap().private_key;

        // 107 mod 10 = 7, 107 mod 16 = 11, 17^-1 mod 11 = 2
        assert_eq!(private.d_p, from_u64(7));
        assert_eq!(private.d_q, from_u64(11));
        assert_eq!(private.q_inv, from_u64(2));
    }

    #[test]
    fn test_key_properties() {
        for (p, q) in [(11u64, 17u64), (17, 11), (61, 53), (3, 5), (101, 103)] {
            let phi = (p - 1) * (q - 1);
            for e in 2..phi {
                let keypair = match generate_u64(p, q, e) {
                    Ok(k) => k,
                    Err(err) => {
                        assert!(matches!(err, RsaError::InvalidExponent { .. }));
                        assert_ne!(gcd(&from_u64(e), &from_u64(phi)), from_u64(1));
                        continue;
                    }
                };
                let private = &keypair.private_key;

                // Verify n = p * q
                assert_eq!(private.n, &private.p * &private.q);

                // Verify e * d ≡ 1 (mod φ(n))
                let product = &keypair.public_key.e * &private.d;
                assert_eq!(product % private.phi(), from_u64(1));

                assert_eq!(private.d_p, &private.d % (&private.p - 1u8));
                assert_eq!(private.d_q, &private.d % (&private.q - 1u8));
                assert_eq!((&private.q * &private.q_inv) % &private.p, from_u64(1));
            }
        }
    }

    #[test]
    fn test_rejects_non_coprime_exponent() {
        // φ = 160 is even, so e = 4 shares a factor
        let result = generate_u64(11, 17, 4);
        assert_eq!(
            result,
            Err(RsaError::InvalidExponent {
                e: from_u64(4),
                phi: from_u64(160)
            })
        );
    }

    #[test]
    fn test_rejects_out_of_range_exponent() {
        for e in [0u64, 1, 160, 161, 163] {
            assert!(matches!(
                generate_u64(11, 17, e),
                Err(RsaError::InvalidExponent { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_bad_primes() {
        assert!(matches!(generate_u64(11, 11, 3), Err(RsaError::InvalidPrimes { .. })));
        assert!(matches!(generate_u64(1, 17, 3), Err(RsaError::InvalidPrimes { .. })));
        assert!(matches!(generate_u64(0, 17, 3), Err(RsaError::InvalidPrimes { .. })));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_u64(61, 53, 17).unwrap(), generate_u64(61, 53, 17).unwrap());
    }

    #[test]
    fn test_public_key_projection() {
        let keypair = generate_u64(61, 53, 17).unwrap();
        assert_eq!(keypair.private_key.public_key().unwrap(), keypair.public_key);
    }
}
