//! zbox CLI - Passphrase-based file and directory encryption
//!
//! Command-line interface for encrypting and decrypting files and directory
//! trees with AES-256-GCM and PBKDF2 key derivation.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use zbox::passphrase::PassphraseSource;
use zbox::{Operation, ProcessOptions, ProcessOutcome, ZboxError};

#[derive(Parser)]
#[command(name = "zbox")]
#[command(version)]
#[command(about = "Passphrase-based file and directory encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file or directory
    #[command(alias = "e")]
    Encrypt(TransformArgs),

    /// Decrypt a file or directory
    #[command(alias = "d")]
    Decrypt(TransformArgs),

    /// Report whether files look like zbox containers
    Check {
        /// Files to inspect
        #[arg(required = true, value_name = "FILE")]
        paths: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Path to the file or directory to process
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Where to write the result (defaults to a path derived from the input)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// File suffix to add on encryption or strip on decryption
    /// (defaults to .encrypted or .decrypted)
    #[arg(short, long, value_name = "SUFFIX")]
    extension: Option<String>,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Replace existing output files
    #[arg(long)]
    overwrite: bool,
}

impl TransformArgs {
    fn options(&self) -> ProcessOptions {
        let mut options = ProcessOptions::new()
            .recursive(!self.no_recursive)
            .overwrite(self.overwrite);
        if let Some(output) = &self.output {
            options = options.output(output);
        }
        if let Some(extension) = &self.extension {
            options = options.suffix(extension);
        }
        options
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt(args) => transform(Operation::Encrypt, &args, cli.passphrase_stdin),
        Commands::Decrypt(args) => transform(Operation::Decrypt, &args, cli.passphrase_stdin),
        Commands::Check { paths } => Ok(check(&paths)),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e.chain());
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn transform(
    operation: Operation,
    args: &TransformArgs,
    passphrase_stdin: bool,
) -> Result<bool, ZboxError> {
    let passphrase = PassphraseSource::from_stdin_flag(passphrase_stdin).read()?;
    let outcome = zbox::process(&args.input, operation, passphrase, &args.options())?;
    let verb = match operation {
        Operation::Encrypt => "encrypted",
        Operation::Decrypt => "decrypted",
    };

    match &outcome {
        ProcessOutcome::File { output } => {
            println!("{}: {} -> {}", verb, args.input.display(), output.display());
        }
        ProcessOutcome::Directory { output, report } => {
            println!(
                "{} directory: {} -> {} ({} files)",
                verb,
                args.input.display(),
                output.display(),
                report.processed.len()
            );
            if !report.is_complete() {
                eprintln!("skipped {} entries:", report.skipped.len());
                for skipped in &report.skipped {
                    eprintln!("  {}: {}", skipped.path.display(), skipped.error.chain());
                }
            }
        }
    }
    Ok(true)
}

fn check(paths: &[PathBuf]) -> bool {
    let mut all = true;
    for path in paths {
        let found = zbox::is_container(path);
        println!(
            "{}: {}",
            path.display(),
            if found { "encrypted" } else { "not encrypted" }
        );
        all &= found;
    }
    all
}
