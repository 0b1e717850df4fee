// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod attack;
pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod padding;
pub mod text;

pub use attack::{
    assess_strength, factor, factor_with_budget, is_compromised, recover_private_exponent,
    recover_private_exponent_with_budget, recover_private_key, verdict, KeyStrength, Verdict,
};
pub use bigint::{mod_inverse, mod_pow, RsaBigInt};
pub use decrypt::{decrypt_bytes, decrypt_int, decrypt_int_crt, decrypt_to_text, decrypt_u64};
pub use encrypt::{encrypt_int, encrypt_text, encrypt_u64};
pub use error::{RsaError, RsaResult};
pub use keygen::{generate, generate_u64, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use padding::{check_oaep_fits, oaep_encrypt, oaep_max_message_len, PaddingError};
pub use text::{decode_text, encode_text, encode_text_for, try_decode_utf8, DecodedText};
