//! File encryption/decryption operations
//!
//! This module provides the single-file step and the top-level [`process`]
//! entry point, which dispatches to [`crate::mirror`] for directories.
//!
//! Files are read into memory whole, transformed, and written in one go.
//! There is no temp-file-and-rename step.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cipher::FileCipher;
use crate::error::{ErrorCategory, ErrorKind, Result, ZboxError};
use crate::kdf::Passphrase;
use crate::mirror::{self, MirrorReport};
use crate::options::ProcessOptions;
use crate::path_policy::{self, Operation};

/// What a successful [`process`] call produced.
#[derive(Debug)]
pub enum ProcessOutcome {
    File {
        output: PathBuf,
    },
    /// A directory run succeeds even if entries were skipped; inspect
    /// `report.skipped` to detect partial completion.
    Directory {
        output: PathBuf,
        report: MirrorReport,
    },
}

impl ProcessOutcome {
    pub fn output(&self) -> &Path {
        match self {
            ProcessOutcome::File { output } | ProcessOutcome::Directory { output, .. } => output,
        }
    }
}

/// Encrypt or decrypt a file or a directory tree.
///
/// The output location is `options.output` if set, otherwise derived from
/// `input` by [`path_policy::output_path`]. Without a configured suffix the
/// operation's default is used, so `a.txt.encrypted` decrypts to
/// `a.txt.encrypted.decrypted`. Single-file failures are returned
/// as errors; failures of individual entries inside a directory are recorded
/// in the returned report instead.
pub fn process(
    input: &Path,
    operation: Operation,
    passphrase: impl Into<Passphrase>,
    options: &ProcessOptions,
) -> Result<ProcessOutcome> {
    let metadata = fs::metadata(input).map_err(|e| read_error(input, e))?;
    let cipher = FileCipher::new(passphrase);
    let output = match &options.output {
        Some(output) => output.clone(),
        None => path_policy::output_path(input, operation, Some(options.suffix_for(operation))),
    };

    if metadata.is_file() {
        process_file(&cipher, input, &output, operation, options.overwrite)?;
        Ok(ProcessOutcome::File { output })
    } else if metadata.is_dir() {
        let report = mirror::process_directory(
            &cipher,
            input,
            &output,
            operation,
            &options.mirror_options(operation),
        )?;
        Ok(ProcessOutcome::Directory { output, report })
    } else {
        Err(ZboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::UnsupportedEntry,
            format!("{} is neither a file nor a directory", input.display()),
        ))
    }
}

/// Transform one file from `input` into `output`.
///
/// Unless `overwrite` is set, an existing `output` is rejected before the
/// input is read. Missing parent directories of `output` are created.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn process_file(
    cipher: &FileCipher,
    input: &Path,
    output: &Path,
    operation: Operation,
    overwrite: bool,
) -> Result<()> {
    if !overwrite && output_exists(output)? {
        return Err(output_exists_error(output));
    }

    let data = fs::read(input).map_err(|e| read_error(input, e))?;
    let transformed = cipher
        .apply(operation, &data)
        .map_err(|e| e.with_context(format!("failed to {} {}", operation, input.display())))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ZboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to create directory {}", parent.display()),
                e,
            )
        })?;
    }

    write_file_secure(output, &transformed, overwrite)?;
    debug!(
        input = %input.display(),
        output = %output.display(),
        %operation,
        bytes = transformed.len(),
        "processed file"
    );
    Ok(())
}

fn output_exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ZboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to check whether {} exists", path.display()),
            e,
        )),
    }
}

fn output_exists_error(path: &Path) -> ZboxError {
    ZboxError::with_kind(
        ErrorCategory::User,
        ErrorKind::OutputExists,
        format!(
            "output file already exists: {} (use --overwrite to replace it)",
            path.display()
        ),
    )
}

/// Write file with secure permissions (0o600 on Unix)
///
/// Without `overwrite` the file must not exist yet, even if it appeared
/// after the up-front check.
fn write_file_secure(path: &Path, contents: &[u8], overwrite: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            return output_exists_error(path);
        }
        ZboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to open {}", path.display()),
            e,
        )
    })?;

    file.write_all(contents).map_err(|e| {
        ZboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to write {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

pub(crate) fn read_error(path: &Path, err: io::Error) -> ZboxError {
    let (category, kind) = match err.kind() {
        io::ErrorKind::NotFound => (ErrorCategory::User, ErrorKind::NotFound),
        io::ErrorKind::PermissionDenied => (ErrorCategory::User, ErrorKind::Io),
        _ => (ErrorCategory::Internal, ErrorKind::Io),
    };
    ZboxError::with_kind_and_source(
        category,
        kind,
        format!("failed to read from {}", path.display()),
        err,
    )
}
