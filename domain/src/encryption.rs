//! AES-256-GCM cipher for client secrets stored in the database.
//!
//! A webhook's LinkedIn client secret must be recoverable in clear text to
//! compute HMAC signatures at delivery time, so it is stored encrypted rather
//! than hashed. The key is a process-wide 32-byte value supplied hex-encoded
//! through configuration and handed to the cipher at construction; the clear
//! secret is never persisted and never logged.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;
use thiserror::Error;

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

/// Errors that can occur during encryption/decryption operations
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Invalid encryption key: must be 32 bytes (64 hex characters)")]
    InvalidKey,

    #[error("Failed to decode hex key: {0}")]
    HexDecodeError(#[from] hex::FromHexError),

    #[error("Failed to decode base64 ciphertext: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed - data may be corrupted or key is incorrect")]
    DecryptionFailed,

    #[error("Ciphertext too short - missing nonce")]
    CiphertextTooShort,
}

/// A reversible cipher over client secrets, bound to one process-wide key.
pub struct SecretCipher {
    key: [u8; 32],
}

impl SecretCipher {
    /// Builds a cipher from a hex-encoded 32-byte key (64 hex characters).
    pub fn new(key_hex: &str) -> Result<Self, EncryptionError> {
        let bytes = hex::decode(key_hex)?;
        if bytes.len() != 32 {
            return Err(EncryptionError::InvalidKey);
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    /// Encrypts a clear secret with a random 12-byte nonce. The nonce is
    /// prepended to the ciphertext and the result base64-encoded for storage
    /// in a text database column.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let cipher =
            Aes256Gcm::new_from_slice(&self.key).map_err(|_| EncryptionError::InvalidKey)?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| EncryptionError::EncryptionFailed)?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypts a base64 string produced by [`SecretCipher::encrypt`] back to
    /// the clear secret.
    pub fn decrypt(&self, ciphertext_b64: &str) -> Result<String, EncryptionError> {
        let cipher =
            Aes256Gcm::new_from_slice(&self.key).map_err(|_| EncryptionError::InvalidKey)?;

        let combined = BASE64.decode(ciphertext_b64)?;
        if combined.len() < NONCE_SIZE {
            return Err(EncryptionError::CiphertextTooShort);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext_bytes = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| EncryptionError::DecryptionFailed)?;

        String::from_utf8(plaintext_bytes).map_err(|_| EncryptionError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test key: 32 bytes = 64 hex characters
    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn cipher() -> SecretCipher {
        SecretCipher::new(TEST_KEY).expect("test key should parse")
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let secret = "WPL_AP1.x7kPt3mQzR9vJwYc.dGVzdA==";
        let encrypted = cipher().encrypt(secret).expect("encryption should succeed");

        assert_ne!(encrypted, secret);
        assert_eq!(cipher().decrypt(&encrypted).unwrap(), secret);
    }

    #[test]
    fn encrypt_produces_different_ciphertexts_for_same_secret() {
        // Random nonce per call: identical plaintexts must not produce
        // identical ciphertexts
        let secret = "client-secret";
        let first = cipher().encrypt(secret).unwrap();
        let second = cipher().encrypt(secret).unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher().decrypt(&first).unwrap(), secret);
        assert_eq!(cipher().decrypt(&second).unwrap(), secret);
    }

    #[test]
    fn rejects_short_keys() {
        assert!(matches!(
            SecretCipher::new("abcd1234"),
            Err(EncryptionError::InvalidKey)
        ));
    }

    #[test]
    fn rejects_non_hex_keys() {
        assert!(matches!(
            SecretCipher::new("not hex at all"),
            Err(EncryptionError::HexDecodeError(_))
        ));
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let encrypted = cipher().encrypt("secret").unwrap();

        let wrong_key = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let other = SecretCipher::new(wrong_key).unwrap();

        assert!(matches!(
            other.decrypt(&encrypted),
            Err(EncryptionError::DecryptionFailed)
        ));
    }

    #[test]
    fn corrupted_ciphertext_fails() {
        assert!(matches!(
            cipher().decrypt("not_valid_base64!!!"),
            Err(EncryptionError::Base64DecodeError(_))
        ));
    }

    #[test]
    fn ciphertext_shorter_than_nonce_fails() {
        // Valid base64 but too short to contain the nonce
        assert!(matches!(
            cipher().decrypt("YWJj"),
            Err(EncryptionError::CiphertextTooShort)
        ));
    }
}
