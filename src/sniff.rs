//! Heuristic detection of encrypted containers
//!
//! This only looks at the size and the marker byte. It does not verify
//! anything cryptographically and will accept arbitrary data that happens
//! to start with the marker.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::container::MARKER;

/// Files shorter than this are never reported as containers, even though a
/// valid container can be as small as [`crate::container::HEADER_LEN`].
pub const MIN_SNIFF_LEN: u64 = 100;

/// Whether `path` looks like a container: a regular file of at least
/// [`MIN_SNIFF_LEN`] bytes whose first byte is the marker. Any I/O failure
/// yields `false`.
pub fn is_container(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() || metadata.len() < MIN_SNIFF_LEN {
        return false;
    }

    let mut first = [0u8; 1];
    match File::open(path).and_then(|mut f| f.read_exact(&mut first)) {
        Ok(()) => first[0] == MARKER,
        Err(_) => false,
    }
}
