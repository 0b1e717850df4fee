// RSA Decryption Implementation
// Direct m = c^d mod n, plus the Chinese Remainder Theorem (CRT) path

use num_traits::Zero;
use tracing::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPrivateKey;
use super::text::{decode_text, try_decode_utf8, DecodedText};

fn check_ciphertext(c: &RsaBigInt, key: &RsaPrivateKey) -> RsaResult<()> {
    if *c >= key.n {
        return Err(RsaError::CiphertextTooLarge {
            c: c.clone(),
            n: key.n.clone(),
        });
    }
    Ok(())
}

/// c^exp mod prime, where exp is d reduced mod (prime - 1).
/// Reduction is only sound when c is a unit mod prime; a multiple of the
/// prime always decrypts to 0 there (d > 0).
fn crt_residue(c: &RsaBigInt, exp: &RsaBigInt, prime: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if (c % prime).is_zero() {
        return Ok(RsaBigInt::zero());
    }
    mod_pow(c, exp, prime)
}

/// Decrypt an integer ciphertext `0 <= c < n` with the private exponent
pub fn decrypt_int(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<RsaBigInt> {
    check_ciphertext(c, private_key)?;

    let m = mod_pow(c, &private_key.d, &private_key.n)?;
    debug!(%c, %m, "decrypted integer (direct)");
    Ok(m)
}

/// Decrypt using Chinese Remainder Theorem (CRT)
///
/// Always agrees with [`decrypt_int`] for a key produced by `generate`.
pub fn decrypt_int_crt(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<RsaBigInt> {
    check_ciphertext(c, private_key)?;
    let key = private_key;

    // m1 = c^d_p mod p
    let m1 = crt_residue(c, &key.d_p, &key.p)?;

    // m2 = c^d_q mod q
    let m2 = crt_residue(c, &key.d_q, &key.q)?;

    // h = (m1 - m2) * q_inv mod p, kept non-negative
    let m2_mod_p = &m2 % &key.p;
    let diff = if m1 >= m2_mod_p {
        m1 - m2_mod_p
    } else {
        m1 + &key.p - m2_mod_p
    };
    let h = (diff * &key.q_inv) % &key.p;

    // m = m2 + q * h  (< q + q(p-1) = n)
    let m = m2 + &key.q * h;
    debug!(%c, %m, "decrypted integer (crt)");
    Ok(m)
}

/// Decrypt a u64 ciphertext
pub fn decrypt_u64(c: u64, private_key: &RsaPrivateKey) -> RsaResult<RsaBigInt> {
    decrypt_int(&RsaBigInt::from(c), private_key)
}

/// Decrypt to the minimal big-endian byte string (zero decodes to no bytes)
pub fn decrypt_bytes(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<Vec<u8>> {
    decrypt_int(c, private_key).map(|m| decode_text(&m))
}

/// Decrypt and interpret as text, falling back to the raw value on bad UTF-8
pub fn decrypt_to_text(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<DecodedText> {
    Ok(try_decode_utf8(&decrypt_bytes(c, private_key)?))
}
