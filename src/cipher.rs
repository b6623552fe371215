//! Encryption/decryption using SHA-256 + PBKDF2 + AES-256-GCM
//!
//! This module implements passphrase-based encryption using:
//! - SHA-256 to reduce the passphrase to a master key (once per cipher)
//! - PBKDF2-HMAC-SHA256 with a random 64-byte salt for a fresh key per file
//! - AES-256-GCM with a 16-byte nonce for authenticated encryption
//!
//! The output is a [`Container`].

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Key, Nonce, Tag};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::container::{Container, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{ErrorCategory, ErrorKind, Result, ZboxError};
use crate::kdf::{self, KEY_LEN, MasterKey, Passphrase};
use crate::path_policy::Operation;

/// AES-256-GCM parameterized for the container's 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Holds the master key for one `process` call and transforms whole buffers.
pub struct FileCipher {
    master: MasterKey,
}

impl FileCipher {
    pub fn new(passphrase: impl Into<Passphrase>) -> Self {
        let passphrase = passphrase.into();
        Self {
            master: MasterKey::from_passphrase(&passphrase),
        }
    }

    /// Encrypt or decrypt depending on `operation`.
    pub fn apply(&self, operation: Operation, data: &[u8]) -> Result<Vec<u8>> {
        match operation {
            Operation::Encrypt => self.encrypt(data),
            Operation::Decrypt => self.decrypt(data),
        }
    }

    /// Encrypt plaintext using a random salt and nonce
    ///
    /// Returns a container of exactly `HEADER_LEN + plaintext.len()` bytes.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        self.encrypt_deterministic(plaintext, &salt, &nonce)
    }

    /// Encrypt plaintext using provided salt and nonce
    ///
    /// This function is ONLY for testing purposes to generate deterministic output.
    /// NEVER use this in production - always use `encrypt()` which generates random salt/nonce.
    pub fn encrypt_deterministic(
        &self,
        plaintext: &[u8],
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        let key = kdf::derive_file_key(&self.master, salt)?;
        let cipher = aead(&key);

        let mut ciphertext = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(nonce), b"", &mut ciphertext)
            .map_err(|e| {
                ZboxError::with_kind(
                    ErrorCategory::Internal,
                    ErrorKind::CipherFailure,
                    format!("encryption failed: {}", e),
                )
            })?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);

        Ok(Container {
            salt,
            nonce,
            tag: &tag_bytes,
            ciphertext: &ciphertext,
        }
        .encode())
    }

    /// Decrypt a container, returning the plaintext only if the tag verifies.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        let container = Container::decode(data)?;

        let key = kdf::derive_file_key(&self.master, container.salt)?;
        let cipher = aead(&key);

        let mut plaintext = container.ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(container.nonce),
                b"",
                &mut plaintext,
                Tag::<U16>::from_slice(container.tag),
            )
            .map_err(|_| {
                ZboxError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::AuthenticationFailed,
                    "corrupt input, tampered-with data, or bad passphrase",
                )
            })?;

        Ok(plaintext)
    }
}

fn aead(key: &[u8; KEY_LEN]) -> Aes256Gcm16 {
    Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key))
}
