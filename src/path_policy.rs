//! Output path naming for encrypt and decrypt

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ErrorCategory, Result, ZboxError};

/// Suffix appended on encryption when none is configured
pub const DEFAULT_ENCRYPTED_SUFFIX: &str = ".encrypted";

/// Suffix appended on decryption when none is configured and the input
/// does not carry [`DEFAULT_ENCRYPTED_SUFFIX`]
pub const DEFAULT_DECRYPTED_SUFFIX: &str = ".decrypted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    /// Suffix a `process` call uses when the caller configured none.
    pub fn default_suffix(self) -> &'static str {
        match self {
            Operation::Encrypt => DEFAULT_ENCRYPTED_SUFFIX,
            Operation::Decrypt => DEFAULT_DECRYPTED_SUFFIX,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Encrypt => f.write_str("encrypt"),
            Operation::Decrypt => f.write_str("decrypt"),
        }
    }
}

impl FromStr for Operation {
    type Err = ZboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "encrypt" => Ok(Operation::Encrypt),
            "decrypt" => Ok(Operation::Decrypt),
            other => Err(ZboxError::new(
                ErrorCategory::User,
                format!("operation must be encrypt or decrypt, got {:?}", other),
            )),
        }
    }
}

/// Compute where the result of `operation` on `input` goes.
///
/// - encrypt: `input + suffix` (default `.encrypted`)
/// - decrypt with a suffix: strip it if present, otherwise append it
/// - decrypt without a suffix: strip `.encrypted` if present, otherwise
///   append `.decrypted`
///
/// An empty suffix counts as not configured. Trailing separators on `input`
/// are ignored.
pub fn output_path(input: &Path, operation: Operation, suffix: Option<&str>) -> PathBuf {
    let input = input.components().as_path();
    let suffix = suffix.filter(|s| !s.is_empty());

    match operation {
        Operation::Encrypt => append(input, suffix.unwrap_or(DEFAULT_ENCRYPTED_SUFFIX)),
        Operation::Decrypt => {
            let (strip, fallback) = match suffix {
                Some(s) => (s, s),
                None => (DEFAULT_ENCRYPTED_SUFFIX, DEFAULT_DECRYPTED_SUFFIX),
            };
            strip_suffix(input, strip).unwrap_or_else(|| append(input, fallback))
        }
    }
}

fn append(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

// Non-UTF-8 paths never match and fall through to appending.
fn strip_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
    path.to_str()
        .and_then(|s| s.strip_suffix(suffix))
        .map(PathBuf::from)
}
