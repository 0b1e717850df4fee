// Text <-> integer conversion
// Bytes are read as one big-endian unsigned integer

use tracing::warn;

use super::bigint::{from_bytes, to_bytes, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPublicKey;

/// Result of interpreting decrypted bytes as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedText {
    Utf8(String),
    /// Bytes were not UTF-8; the whole value read as a single code point
    RawByteFallback {
        value: RsaBigInt,
        character: Option<char>,
    },
}

impl std::fmt::Display for DecodedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodedText::Utf8(text) => write!(f, "{}", text),
            DecodedText::RawByteFallback {
                character: Some(ch),
                ..
            } => write!(f, "{}", ch),
            DecodedText::RawByteFallback { value, .. } => write!(f, "<{}>", value),
        }
    }
}

/// Bytes -> big-endian unsigned integer. The empty slice is 0.
pub fn encode_text(bytes: &[u8]) -> RsaBigInt {
    from_bytes(bytes)
}

/// Like [`encode_text`], but refuses values that do not fit the modulus.
pub fn encode_text_for(bytes: &[u8], public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    let value = encode_text(bytes);
    if value >= public_key.n {
        warn!(%value, n = %public_key.n, "encoded text does not fit modulus");
        return Err(RsaError::EncodingOverflow {
            value,
            n: public_key.n.clone(),
        });
    }
    Ok(value)
}

/// Integer -> minimal big-endian bytes. Zero maps to an empty vector.
pub fn decode_text(value: &RsaBigInt) -> Vec<u8> {
    to_bytes(value)
}

/// Strict UTF-8 decode
pub fn decode_utf8_strict(bytes: &[u8]) -> RsaResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| RsaError::InvalidUtf8)
}

/// UTF-8 decode that never fails: invalid input is reported as the
/// code point of the whole value instead.
pub fn try_decode_utf8(bytes: &[u8]) -> DecodedText {
    match decode_utf8_strict(bytes) {
        Ok(text) => DecodedText::Utf8(text),
        Err(_) => {
            let value = from_bytes(bytes);
            let character = u32::try_from(&value).ok().and_then(char::from_u32);
            warn!(%value, ?character, "decrypted bytes are not UTF-8, using raw value");
            DecodedText::RawByteFallback { value, character }
        }
    }
}
