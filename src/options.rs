//! Options accepted by [`crate::process`]

use std::path::PathBuf;

use crate::path_policy::Operation;

/// Caller-supplied settings for one `process` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Output path override. For a directory input this is the mirror root.
    pub output: Option<PathBuf>,
    /// Descend into subdirectories. When false, subdirectories are
    /// recreated empty.
    pub recursive: bool,
    /// File suffix convention. `None` selects the operation's default,
    /// `.encrypted` or `.decrypted`.
    pub suffix: Option<String>,
    /// Replace existing output files instead of failing.
    pub overwrite: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output: None,
            recursive: true,
            suffix: None,
            overwrite: false,
        }
    }
}

impl ProcessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// An empty suffix is treated as unset.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.suffix = (!suffix.is_empty()).then_some(suffix);
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The configured suffix, or the default one for `operation`.
    pub fn suffix_for(&self, operation: Operation) -> &str {
        self.suffix.as_deref().unwrap_or(operation.default_suffix())
    }

    /// The subset of options that applies inside a directory walk, with the
    /// suffix resolved for `operation`.
    pub fn mirror_options(&self, operation: Operation) -> MirrorOptions {
        MirrorOptions {
            recursive: self.recursive,
            suffix: Some(self.suffix_for(operation).to_string()),
            overwrite: self.overwrite,
        }
    }
}

/// Settings carried through a directory walk.
///
/// A `None` suffix hands naming to the bare path policy, which strips
/// `.encrypted` on decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    pub recursive: bool,
    pub suffix: Option<String>,
    pub overwrite: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            suffix: None,
            overwrite: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ProcessOptions::default();
        assert_eq!(opts.output, None);
        assert!(opts.recursive);
        assert_eq!(opts.suffix, None);
        assert!(!opts.overwrite);
    }

    #[test]
    fn test_builder() {
        let opts = ProcessOptions::new()
            .output("out")
            .recursive(false)
            .suffix(".secret")
            .overwrite(true);

        assert_eq!(opts.output, Some(PathBuf::from("out")));
        assert_eq!(
            opts.mirror_options(Operation::Decrypt),
            MirrorOptions {
                recursive: false,
                suffix: Some(".secret".to_string()),
                overwrite: true,
            }
        );
    }

    #[test]
    fn test_empty_suffix_is_unset() {
        assert_eq!(ProcessOptions::new().suffix("").suffix, None);
    }

    #[test]
    fn test_default_suffix_follows_operation() {
        let opts = ProcessOptions::default();
        assert_eq!(opts.suffix_for(Operation::Encrypt), ".encrypted");
        assert_eq!(opts.suffix_for(Operation::Decrypt), ".decrypted");
        assert_eq!(
            opts.mirror_options(Operation::Decrypt).suffix.as_deref(),
            Some(".decrypted")
        );

        let opts = ProcessOptions::new().suffix(".secret");
        assert_eq!(opts.suffix_for(Operation::Decrypt), ".secret");
    }
}
