// RSA Encryption Implementation
// Textbook RSA: c = m^e mod n, no padding

use tracing::debug;

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPublicKey;
use super::text::encode_text_for;

/// Encrypt an integer message `0 <= m < n`
pub fn encrypt_int(m: &RsaBigInt, public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    if *m >= public_key.n {
        return Err(RsaError::MessageTooLarge {
            m: m.clone(),
            n: public_key.n.clone(),
        });
    }

    let c = mod_pow(m, &public_key.e, &public_key.n)?;
    debug!(%m, e = %public_key.e, n = %public_key.n, %c, "encrypted integer");
    Ok(c)
}

/// Encrypt a u64 value
pub fn encrypt_u64(value: u64, public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    encrypt_int(&RsaBigInt::from(value), public_key)
}

/// Encode bytes as a big-endian integer and encrypt it.
/// Fails with `EncodingOverflow` when the encoded value does not fit the modulus.
pub fn encrypt_text(plaintext: &[u8], public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    let m = encode_text_for(plaintext, public_key)?;
    encrypt_int(&m, public_key)
}
