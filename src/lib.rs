//! zbox - Passphrase-based file and directory encryption
//!
//! Files are encrypted with AES-256-GCM under a key stretched from the
//! passphrase with PBKDF2 and a fresh random salt, and stored in a small
//! self-describing container. Directories are mirrored entry by entry.

#![forbid(unsafe_code)]

pub mod cipher;
pub mod container;
pub mod error;
pub mod file_ops;
pub mod kdf;
pub mod mirror;
pub mod options;
pub mod passphrase;
pub mod path_policy;
pub mod sniff;

pub use cipher::FileCipher;
pub use error::{ErrorCategory, ErrorKind, Result, ZboxError};
pub use file_ops::{ProcessOutcome, process};
pub use kdf::Passphrase;
pub use mirror::MirrorReport;
pub use options::{MirrorOptions, ProcessOptions};
pub use path_policy::{Operation, output_path};
pub use sniff::is_container;
