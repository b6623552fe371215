//! Directory tree mirroring
//!
//! Walks an input directory depth-first, one entry at a time, and writes the
//! transformed files into a parallel output tree. A failure on one entry is
//! recorded in the [`MirrorReport`] and the walk moves on to its siblings.

use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::cipher::FileCipher;
use crate::error::{ErrorCategory, ErrorKind, Result, ZboxError};
use crate::file_ops;
pub use crate::options::MirrorOptions;
use crate::path_policy::{self, Operation};

/// A file that was transformed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedEntry {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// An entry that failed and was left behind.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: ZboxError,
}

/// Outcome of one directory walk.
#[derive(Debug, Default)]
pub struct MirrorReport {
    pub processed: Vec<ProcessedEntry>,
    pub skipped: Vec<SkippedEntry>,
    /// Symlinks, sockets and other entries that are neither files nor
    /// directories, plus the output root if it lies inside the input tree.
    pub ignored: Vec<PathBuf>,
}

impl MirrorReport {
    /// True when no entry was skipped because of an error.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

struct Mirror<'a> {
    cipher: &'a FileCipher,
    operation: Operation,
    options: &'a MirrorOptions,
    output_root: PathBuf,
    report: MirrorReport,
}

/// Mirror `input_dir` into `output_dir`, applying `operation` to every file.
///
/// Only failures on `input_dir` and `output_dir` themselves are returned as
/// errors. Everything below them ends up in the report.
pub fn process_directory(
    cipher: &FileCipher,
    input_dir: &Path,
    output_dir: &Path,
    operation: Operation,
    options: &MirrorOptions,
) -> Result<MirrorReport> {
    create_dir(output_dir)?;

    let mut mirror = Mirror {
        cipher,
        operation,
        options,
        // If the output root lives inside the input tree, it must not be
        // walked into.
        output_root: fs::canonicalize(output_dir).unwrap_or_else(|_| output_dir.to_path_buf()),
        report: MirrorReport::default(),
    };
    mirror.walk(input_dir, output_dir)?;

    let report = mirror.report;
    info!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        %operation,
        processed = report.processed.len(),
        skipped = report.skipped.len(),
        "directory done"
    );
    Ok(report)
}

impl Mirror<'_> {
    /// Mirror the entries of `input_dir` into the existing `output_dir`.
    fn walk(&mut self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        for entry in sorted_entries(input_dir)? {
            let source = entry.path();
            let target = output_dir.join(entry.file_name());

            if let Err(error) = self.entry(&entry, &source, &target) {
                warn!(path = %source.display(), error = %error.chain(), "skipping entry");
                self.report.skipped.push(SkippedEntry {
                    path: source,
                    error,
                });
            }
        }
        Ok(())
    }

    fn entry(&mut self, entry: &DirEntry, source: &Path, target: &Path) -> Result<()> {
        let file_type = entry
            .file_type()
            .map_err(|e| file_ops::read_error(source, e))?;

        if file_type.is_file() {
            // The suffix applies to the mirrored name, not the source path.
            let output =
                path_policy::output_path(target, self.operation, self.options.suffix.as_deref());
            file_ops::process_file(
                self.cipher,
                source,
                &output,
                self.operation,
                self.options.overwrite,
            )?;
            self.report.processed.push(ProcessedEntry {
                input: source.to_path_buf(),
                output,
            });
        } else if file_type.is_dir() {
            if self.is_output_root(source) {
                debug!(path = %source.display(), "not descending into output directory");
                self.report.ignored.push(source.to_path_buf());
            } else {
                create_dir(target)?;
                if self.options.recursive {
                    self.walk(source, target)?;
                }
            }
        } else {
            debug!(path = %source.display(), "ignoring entry that is neither file nor directory");
            self.report.ignored.push(source.to_path_buf());
        }
        Ok(())
    }

    fn is_output_root(&self, dir: &Path) -> bool {
        fs::canonicalize(dir).is_ok_and(|p| p == self.output_root)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        ZboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            format!("failed to create directory {}", dir.display()),
            e,
        )
    })
}

/// Directory entries ordered by file name.
fn sorted_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .and_then(|iter| iter.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| file_ops::read_error(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}
