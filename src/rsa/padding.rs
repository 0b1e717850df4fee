// OAEP on a toy key
// Real OAEP-SHA256 encryption goes through the `rsa` crate; the capacity
// helpers only explain why it fails (RFC 8017 §7.1.1: k >= 2*hLen + 2 + mLen).

use rsa::Oaep;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use super::keygen::RsaPublicKey;
use crate::util::pem::to_wire;

#[derive(Error, Debug)]
pub enum PaddingError {
    /// Error reported by the OAEP implementation itself
    #[error("OAEP encryption failed: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("message of {len} bytes too long for OAEP with a {key_bytes}-byte modulus (max {max})")]
    MessageTooLongForPadding {
        len: usize,
        key_bytes: usize,
        max: usize,
    },

    #[error("{key_bytes}-byte modulus is too small for OAEP-SHA256 (needs at least {min} bytes)")]
    KeyTooSmall { key_bytes: usize, min: usize },
}

/// Modulus length in whole bytes (k)
pub fn key_size_bytes(public_key: &RsaPublicKey) -> usize {
    public_key.bit_length().div_ceil(8) as usize
}

/// Maximum OAEP-SHA256 message length, k - 2*hLen - 2
pub fn oaep_max_message_len(public_key: &RsaPublicKey) -> Result<usize, PaddingError> {
    let h_len = <Sha256 as Digest>::output_size();
    let overhead = 2 * h_len + 2;
    let key_bytes = key_size_bytes(public_key);

    key_bytes
        .checked_sub(overhead)
        .ok_or(PaddingError::KeyTooSmall {
            key_bytes,
            min: overhead,
        })
}

/// Fail the way an OAEP encryptor would if `message` cannot fit
pub fn check_oaep_fits(message: &[u8], public_key: &RsaPublicKey) -> Result<(), PaddingError> {
    let key_bytes = key_size_bytes(public_key);
    let max = oaep_max_message_len(public_key)?;

    if message.len() > max {
        return Err(PaddingError::MessageTooLongForPadding {
            len: message.len(),
            key_bytes,
            max,
        });
    }

    Ok(())
}

/// Encrypt `message` with OAEP-SHA256 under `(N, e)`.
///
/// On a toy modulus the `rsa` crate refuses with `MessageTooLong`.
pub fn oaep_encrypt(message: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>, PaddingError> {
    let key = rsa::RsaPublicKey::new(to_wire(&public_key.n), to_wire(&public_key.e))?;
    let mut rng = rand::thread_rng();

    match key.encrypt(&mut rng, Oaep::new::<Sha256>(), message) {
        Ok(ciphertext) => {
            debug!(len = ciphertext.len(), "OAEP encryption succeeded");
            Ok(ciphertext)
        }
        Err(err) => {
            warn!(%err, n = %public_key.n, "OAEP encryption failed");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use num_bigint::BigUint;
    use num_traits::One;

    #[test]
    fn test_tiny_key_rejected() {
        let key = RsaPublicKey::new(from_u64(187), from_u64(3));
        assert_eq!(key_size_bytes(&key), 1);
        assert!(matches!(
            check_oaep_fits(b"X", &key),
            Err(PaddingError::KeyTooSmall {
                key_bytes: 1,
                min: 66
            })
        ));
    }

    #[test]
    fn test_real_oaep_fails_on_tiny_key() {
        let key = RsaPublicKey::new(from_u64(187), from_u64(3));
        assert!(matches!(
            oaep_encrypt(b"X", &key),
            Err(PaddingError::Rsa(rsa::Error::MessageTooLong))
        ));
    }

    #[test]
    fn test_2048_bit_capacity() {
        // 2^2047 + 1 has 2048 bits
        let n = (BigUint::one() << 2047usize) + 1u8;
        let key = RsaPublicKey::new(n, from_u64(65537));

        assert_eq!(key_size_bytes(&key), 256);
        assert_eq!(oaep_max_message_len(&key).unwrap(), 190);
        assert!(check_oaep_fits(&[0u8; 190], &key).is_ok());
        assert!(matches!(
            check_oaep_fits(&[0u8; 191], &key),
            Err(PaddingError::MessageTooLongForPadding {
                len: 191,
                key_bytes: 256,
                max: 190
            })
        ));

        // The library agrees on the boundary
        assert_eq!(oaep_encrypt(&[0u8; 190], &key).unwrap().len(), 256);
        assert!(matches!(
            oaep_encrypt(&[0u8; 191], &key),
            Err(PaddingError::Rsa(rsa::Error::MessageTooLong))
        ));
    }
}
