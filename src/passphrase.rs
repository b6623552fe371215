//! Passphrase acquisition for the command-line front end

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, Result, ZboxError};
use crate::kdf::Passphrase;

const PROMPT: &str = "Passphrase (zbox): ";

/// Where the passphrase for one run comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassphraseSource {
    /// Everything on standard input, byte for byte.
    Stdin,
    /// An interactive prompt with echo disabled. UTF-8 only.
    Terminal,
}

impl PassphraseSource {
    pub fn from_stdin_flag(passphrase_stdin: bool) -> Self {
        if passphrase_stdin {
            PassphraseSource::Stdin
        } else {
            PassphraseSource::Terminal
        }
    }

    pub fn read(self) -> Result<Passphrase> {
        match self {
            PassphraseSource::Stdin => read_from(io::stdin().lock()),
            PassphraseSource::Terminal => prompt(),
        }
    }
}

/// Take all of `reader` as the passphrase, trailing newline included.
pub fn read_from(mut reader: impl Read) -> Result<Passphrase> {
    let mut data = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut data).map_err(|e| {
        ZboxError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "error reading passphrase",
            e,
        )
    })?;
    Ok(Passphrase::from(data))
}

fn prompt() -> Result<Passphrase> {
    if !io::stdin().is_terminal() {
        return Err(ZboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PassphraseUnavailable,
            "stdin is not a terminal; pass --passphrase-stdin to pipe the passphrase",
        ));
    }

    rpassword::prompt_password(PROMPT)
        .map(Passphrase::from)
        .map_err(|e| {
            ZboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                "failed to read passphrase from terminal",
                e,
            )
        })
}
