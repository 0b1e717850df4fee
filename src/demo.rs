// Narrated walkthrough driven by the CLI
// All arithmetic goes through crate::rsa; this module only decides what to
// show and when to substitute a smaller message.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::DemoConfig;
use crate::rsa::attack::{
    assess_strength, factor, recover_private_key, verdict, KeyStrength, Verdict,
};
use crate::rsa::bigint::RsaBigInt;
use crate::rsa::decrypt::{decrypt_int, decrypt_int_crt, decrypt_to_text};
use crate::rsa::encrypt::encrypt_int;
use crate::rsa::error::{RsaError, RsaResult};
use crate::rsa::keygen::{generate, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::rsa::padding::{oaep_encrypt, oaep_max_message_len, PaddingError};
use crate::rsa::text::{encode_text_for, DecodedText};
use crate::util::file_ops;

const RULE: &str = "======================================================================";

/// Everything the walkthrough computed, for callers that want to check it
#[derive(Debug)]
pub struct DemoReport {
    pub keypair: RsaKeyPair,
    pub ciphertext: RsaBigInt,
    pub decrypted: RsaBigInt,
    pub decrypted_crt: RsaBigInt,
    /// Bytes actually encrypted in the text step
    pub text_bytes: Vec<u8>,
    /// True when the configured text overflowed and the fallback byte was used
    pub text_substituted: bool,
    pub text_decoded: DecodedText,
    /// Outcome of a real OAEP-SHA256 encryption of one byte
    pub oaep: Result<Vec<u8>, PaddingError>,
    pub recovered: RsaResult<RsaPrivateKey>,
    pub verdict: Option<Verdict>,
}

pub fn run_demo(config: &DemoConfig) -> Result<DemoReport> {
    println!("{RULE}");
    println!("RSA WALKTHROUGH - TOY MODULUS");
    println!("{RULE}");

    // Step 1: key pair
    println!("\nSTEP 1: Deriving the key pair...");
    let keypair = generate(&config.p, &config.q, &config.e)
        .context("could not derive a key pair from the configured primes")?;
    print_key(&keypair);

    // Step 2: raw integer round trip
    println!("\nSTEP 2: Raw RSA on an integer...");
    let (public, private) = (&keypair.public_key, &keypair.private_key);
    let ciphertext = encrypt_int(&config.message, public).context("integer message")?;
    println!("Encryption: {}^{} mod {} = {}", config.message, public.e, public.n, ciphertext);
    let decrypted = decrypt_int(&ciphertext, private)?;
    println!("Decryption: {}^{} mod {} = {}", ciphertext, private.d, private.n, decrypted);
    let decrypted_crt = decrypt_int_crt(&ciphertext, private)?;
    println!("CRT decryption gives {}", decrypted_crt);
    if decrypted == config.message && decrypted_crt == decrypted {
        println!("Message recovered.");
    } else {
        warn!(%decrypted, %decrypted_crt, "integer round trip mismatch");
        println!("Round trip FAILED.");
    }

    // Step 3: text round trip, substituting explicitly on overflow
    println!("\nSTEP 3: Text message...");
    println!("Text: '{}' bytes: {}", config.text, hex::encode(config.text.as_bytes()));
    let (text_bytes, text_value, text_substituted) =
        match encode_text_for(config.text.as_bytes(), public) {
            Ok(value) => (config.text.as_bytes().to_vec(), value, false),
            Err(RsaError::EncodingOverflow { value, n }) => {
                println!("Message too large! {} >= {}", value, n);
                println!("Using the single byte 0x{:02x} instead...", config.fallback_byte);
                let bytes = vec![config.fallback_byte];
                let value = encode_text_for(&bytes, public)
                    .context("fallback byte does not fit the modulus either")?;
                (bytes, value, true)
            }
            Err(err) => return Err(err.into()),
        };
    let text_cipher = encrypt_int(&text_value, public)?;
    println!("Encrypted {} as {}", text_value, text_cipher);
    let text_decoded = decrypt_to_text(&text_cipher, private)?;
    match &text_decoded {
        DecodedText::Utf8(text) => println!("Decrypted text: '{}'", text),
        other => println!("Decrypted as single character: '{}'", other),
    }

    // Step 4: padding needs room a toy key does not have
    println!("\nSTEP 4: Trying standard OAEP-SHA256 padding with a one-byte message...");
    let oaep = oaep_encrypt(b"X", public);
    match &oaep {
        Ok(ciphertext) => println!("Somehow worked with OAEP: {}", hex::encode(ciphertext)),
        Err(err) => {
            println!("Failed as expected: {}", err);
            if let Err(capacity) = oaep_max_message_len(public) {
                println!("({})", capacity);
            }
        }
    }

    // Step 5: break it with the public key only
    println!("\nSTEP 5: Breaking the key from (N={}, e={})...", public.n, public.e);
    let attacker_view = RsaPublicKey::new(public.n.clone(), public.e.clone());
    let recovered = recover_private_key(&attacker_view, config.budget);
    let verdict = match &recovered {
        Ok(found) => {
            println!("Found secret primes: p={}, q={}", found.p, found.q);
            println!("Private exponent d = {}", found.d);
            let v = verdict(&found.d, &private.d, &public.e, &private.phi());
            report_verdict(v);
            Some(v)
        }
        Err(err) => {
            println!("Attack did not succeed: {}", err);
            None
        }
    };

    Ok(DemoReport {
        keypair,
        ciphertext,
        decrypted,
        decrypted_crt,
        text_bytes,
        text_substituted,
        text_decoded,
        oaep,
        recovered,
        verdict,
    })
}

fn print_key(keypair: &RsaKeyPair) {
    let private = &keypair.private_key;
    let public = &keypair.public_key;
    let phi = private.phi();
    println!("p={}, q={}, N={}, e={}", private.p, private.q, public.n, public.e);
    println!("phi(N) = {}", phi);
    println!("d = {}  check: (e * d) mod phi = {}", private.d, (&public.e * &private.d) % &phi);
    println!("dmp1 = {}, dmq1 = {}, iqmp = {}", private.d_p, private.d_q, private.q_inv);
}

fn report_verdict(v: Verdict) {
    match v {
        Verdict::ExactMatch => println!("PRIVATE KEY COMPLETELY COMPROMISED!"),
        Verdict::EquivalentExponent => {
            println!("Different d, but it decrypts all the same: compromised.")
        }
        Verdict::NotCompromised => println!("Recovered exponent does not work."),
    }
    info!(?v, "attack verdict");
}

/// Derive a key pair and write both PEM files
pub fn run_generate(
    p: &RsaBigInt,
    q: &RsaBigInt,
    e: &RsaBigInt,
    public_out: &Path,
    private_out: &Path,
) -> Result<RsaKeyPair> {
    let keypair = generate(p, q, e).context("key derivation failed")?;
    print_key(&keypair);

    file_ops::write_public_key(public_out, &keypair.public_key)?;
    println!("Public key written to '{}'", public_out.display());
    file_ops::write_private_key(private_out, &keypair.private_key)?;
    println!("Private key written to '{}'", private_out.display());
    Ok(keypair)
}

/// Show the components of a public key file and how weak it is
pub fn run_extract(public_key: &Path) -> Result<KeyStrength> {
    let key = file_ops::read_public_key(public_key)?;
    println!("Modulus (N): {}", key.n);
    println!("  bit length: {} bits", key.bit_length());
    println!("Exponent (e): {}", key.e);

    let strength = assess_strength(&key.n);
    match strength {
        KeyStrength::ExtremelyWeak { bits } => {
            println!("EXTREMELY WEAK - this {}-bit key can be broken instantly", bits);
            match factor(&key.n) {
                Ok((p, q)) => println!("   Found factors: {} x {} = {}", p, q, key.n),
                Err(err) => println!("   {}", err),
            }
        }
        KeyStrength::Reasonable { bits } => {
            println!("This {}-bit key has reasonable security", bits)
        }
    }
    Ok(strength)
}

/// Recover the private key behind a public key file
pub fn run_attack(
    public_key: &Path,
    budget: Option<u64>,
    private_out: Option<&Path>,
) -> Result<RsaPrivateKey> {
    let key = file_ops::read_public_key(public_key)?;
    println!("Public information: N={}, e={}", key.n, key.e);

    let recovered = recover_private_key(&key, budget)
        .with_context(|| format!("could not recover the private key for N={}", key.n))?;
    println!("p={}, q={}, d={}", recovered.p, recovered.q, recovered.d);

    if let Some(path) = private_out {
        file_ops::write_private_key(path, &recovered)?;
        println!("Recovered private key written to '{}'", path.display());
    }
    Ok(recovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_default_walkthrough() {
        let report = run_demo(&DemoConfig::default()).unwrap();

        assert_eq!(report.ciphertext, from_u64(36));
        assert_eq!(report.decrypted, from_u64(42));
        assert_eq!(report.decrypted_crt, from_u64(42));

        // "Hi" overflows N=187, so 'H' is used
        assert!(report.text_substituted);
        assert_eq!(report.text_bytes, vec![0x48]);
        assert_eq!(report.text_decoded, DecodedText::Utf8("H".to_string()));

        assert!(matches!(
            report.oaep,
            Err(PaddingError::Rsa(rsa::Error::MessageTooLong))
        ));
        assert_eq!(report.recovered.unwrap().d, from_u64(107));
        assert_eq!(report.verdict, Some(Verdict::ExactMatch));
    }

    #[test]
    fn test_walkthrough_with_budget_too_small() {
        let config = DemoConfig {
            budget: Some(3),
            ..DemoConfig::default()
        };
        let report = run_demo(&config).unwrap();
        assert!(matches!(report.recovered, Err(RsaError::Inconclusive { tested: 3, .. })));
        assert_eq!(report.verdict, None);
    }

    #[test]
    fn test_walkthrough_text_fits() {
        let config = DemoConfig {
            p: from_u64(61),
            q: from_u64(53),
            e: from_u64(17),
            text: "A".to_string(),
            ..DemoConfig::default()
        };
        let report = run_demo(&config).unwrap();
        assert!(!report.text_substituted);
        assert_eq!(report.text_decoded, DecodedText::Utf8("A".to_string()));
    }

    #[test]
    fn test_walkthrough_rejects_bad_exponent() {
        let config = DemoConfig {
            e: from_u64(4),
            ..DemoConfig::default()
        };
        assert!(run_demo(&config).is_err());
    }

    #[test]
    fn test_generate_extract_attack() {
        let dir = tempfile::tempdir().unwrap();
        let public_path = dir.path().join("public_key.pem");
        let private_path = dir.path().join("private_key.pem");
        let recovered_path = dir.path().join("recovered.pem");

        let keypair = run_generate(
            &from_u64(11),
            &from_u64(17),
            &from_u64(3),
            &public_path,
            &private_path,
        )
        .unwrap();

        assert_eq!(
            run_extract(&public_path).unwrap(),
            KeyStrength::ExtremelyWeak { bits: 8 }
        );

        let recovered = run_attack(&public_path, None, Some(&recovered_path)).unwrap();
        assert_eq!(recovered, keypair.private_key);
        assert_eq!(
            file_ops::read_file(&recovered_path).unwrap(),
            file_ops::read_file(&private_path).unwrap()
        );
    }
}
