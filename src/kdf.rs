//! Key derivation from passphrase to per-file key
//!
//! Two stages:
//! - master key: SHA-256 over the passphrase bytes, computed once per cipher
//! - file key: PBKDF2-HMAC-SHA256 over the master key with a per-file salt
//!
//! The iteration count is fixed and not configurable.

use hmac::Hmac;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, Result, ZboxError};

/// Length of the master key and of each derived file key in bytes
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count applied for every file
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Passphrase normalized to a byte sequence.
///
/// Strings contribute their UTF-8 bytes and integers their decimal text, so
/// `Passphrase::from(123456)` and `Passphrase::from("123456")` are equal.
pub struct Passphrase(Zeroizing<Vec<u8>>);

impl Passphrase {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Zeroizing<Vec<u8>>> for Passphrase {
    fn from(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for Passphrase {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }
}

impl From<&[u8]> for Passphrase {
    fn from(bytes: &[u8]) -> Self {
        Self(Zeroizing::new(bytes.to_vec()))
    }
}

impl<const N: usize> From<&[u8; N]> for Passphrase {
    fn from(bytes: &[u8; N]) -> Self {
        Self(Zeroizing::new(bytes.to_vec()))
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self(Zeroizing::new(s.into_bytes()))
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self(Zeroizing::new(s.as_bytes().to_vec()))
    }
}

macro_rules! passphrase_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Passphrase {
                fn from(n: $t) -> Self {
                    Self(Zeroizing::new(n.to_string().into_bytes()))
                }
            }
        )*
    };
}

passphrase_from_integer!(i32, i64, u32, u64, usize);

/// SHA-256 digest of a passphrase. Input to every file key derivation.
pub struct MasterKey(Zeroizing<[u8; KEY_LEN]>);

impl MasterKey {
    pub fn from_passphrase(passphrase: &Passphrase) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&digest);
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Derive the effective key for one file from the master key and that file's salt.
pub fn derive_file_key(master: &MasterKey, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(master.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key)
        .map_err(|e| {
            ZboxError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::KeyDerivation,
                format!("pbkdf2 key derivation failed: {}", e),
            )
        })?;
    Ok(key)
}
