//! Passphrase-based encryption of note payloads.
//!
//! Stateless helpers: a key is derived from the passphrase with Argon2id and
//! a random salt, the payload is sealed with AES-256-GCM under a random
//! nonce, and everything needed for decryption travels inside a small JSON
//! envelope. Decryption failure is an explicit [`CryptoError`], never a
//! panic, and never yields partial plaintext.
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENVELOPE_VERSION: u32 = 1;
const ENVELOPE_ALGO: &str = "aes-256-gcm";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("malformed ciphertext envelope")]
    MalformedEnvelope,
    #[error("unsupported envelope algorithm `{0}`")]
    UnsupportedAlgo(String),
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("encryption failed")]
    EncryptionFailed,
    #[error("decryption failed")]
    DecryptionFailed,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u32,
    algo: String,
    salt_b64: String,
    iv_b64: String,
    ciphertext_b64: String,
}

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
    let mut key = [0u8; KEY_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}

/// Encrypt `plaintext` under `password`, returning the serialized envelope.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let envelope = Envelope {
        version: ENVELOPE_VERSION,
        algo: ENVELOPE_ALGO.to_owned(),
        salt_b64: STANDARD.encode(salt),
        iv_b64: STANDARD.encode(iv),
        ciphertext_b64: STANDARD.encode(ciphertext),
    };
    serde_json::to_string(&envelope).map_err(|_| CryptoError::EncryptionFailed)
}

/// Decrypt an envelope produced by [`encrypt`] with the given password.
pub fn decrypt(payload: &str, password: &str) -> Result<String, CryptoError> {
    let envelope: Envelope =
        serde_json::from_str(payload).map_err(|_| CryptoError::MalformedEnvelope)?;
    if envelope.algo != ENVELOPE_ALGO {
        return Err(CryptoError::UnsupportedAlgo(envelope.algo));
    }
    let salt = STANDARD
        .decode(envelope.salt_b64)
        .map_err(|_| CryptoError::MalformedEnvelope)?;
    let iv = STANDARD
        .decode(envelope.iv_b64)
        .map_err(|_| CryptoError::MalformedEnvelope)?;
    let ciphertext = STANDARD
        .decode(envelope.ciphertext_b64)
        .map_err(|_| CryptoError::MalformedEnvelope)?;
    if iv.len() != NONCE_LEN {
        return Err(CryptoError::MalformedEnvelope);
    }

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), ciphertext.as_ref())
        .map_err(|_| CryptoError::DecryptionFailed)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}
