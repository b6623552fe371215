//! Binary container layout
//!
//! The format is:
//! - salt length marker: 1 byte, always `SALT_LEN`
//! - salt: 64 bytes
//! - nonce: 16 bytes
//! - authentication tag: 16 bytes
//! - ciphertext: all remaining bytes, same length as the plaintext
//!
//! The ciphertext is not length-prefixed, so a truncated container is only
//! detected when the tag fails to verify.

use crate::error::{ErrorCategory, ErrorKind, Result, ZboxError};

/// Length of salt in bytes. Also the value of the marker byte.
pub const SALT_LEN: usize = 64;

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 16;

/// Length of the AES-GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Size of everything before the ciphertext
pub const HEADER_LEN: usize = 1 + SALT_LEN + NONCE_LEN + TAG_LEN;

/// Marker byte opening every container
pub const MARKER: u8 = SALT_LEN as u8;

/// A decoded container, borrowing from the buffer it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    pub salt: &'a [u8; SALT_LEN],
    pub nonce: &'a [u8; NONCE_LEN],
    pub tag: &'a [u8; TAG_LEN],
    pub ciphertext: &'a [u8],
}

impl<'a> Container<'a> {
    /// Serialize into marker + salt + nonce + tag + ciphertext.
    pub fn encode(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        output.push(MARKER);
        output.extend_from_slice(self.salt);
        output.extend_from_slice(self.nonce);
        output.extend_from_slice(self.tag);
        output.extend_from_slice(self.ciphertext);
        output
    }

    /// Parse a container. The marker is checked before the length so that
    /// foreign data is reported as a format mismatch rather than truncation.
    pub fn decode(data: &'a [u8]) -> Result<Self> {
        let Some((&marker, rest)) = data.split_first() else {
            return Err(ZboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::TruncatedInput,
                "input is empty; not an encrypted container",
            ));
        };

        if marker != MARKER {
            return Err(ZboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::BinaryFormat,
                format!(
                    "invalid container format: salt length marker is {}, expected {}",
                    marker, MARKER
                ),
            ));
        }

        if data.len() < HEADER_LEN {
            return Err(ZboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::TruncatedInput,
                format!(
                    "input likely truncated: {} bytes is shorter than the {} byte header",
                    data.len(),
                    HEADER_LEN
                ),
            ));
        }

        let (salt, rest) = rest.split_at(SALT_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        Ok(Self {
            salt: salt.try_into().map_err(|e| internal_slice_error("salt", e))?,
            nonce: nonce
                .try_into()
                .map_err(|e| internal_slice_error("nonce", e))?,
            tag: tag.try_into().map_err(|e| internal_slice_error("tag", e))?,
            ciphertext,
        })
    }
}

fn internal_slice_error(field: &str, err: std::array::TryFromSliceError) -> ZboxError {
    ZboxError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::BinaryFormat,
        format!("failed to read {}", field),
        err,
    )
}
