//! xorenc CLI - Passphrase-based in-place file encryption
//!
//! Command-line interface for encrypting a file to `<file>.enc` and back,
//! using a PBKDF2-derived XOR keystream and best-effort destruction of the
//! source file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use xorenc::file_ops::{self, Outcome};
use xorenc::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};

#[derive(Parser)]
#[command(name = "xorenc")]
#[command(version)]
#[command(about = "Passphrase-based in-place file encryption.", long_about = None)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file in place, replacing it with <FILE>.enc
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file to encrypt
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Decrypt a file in place, replacing it with the .enc suffix stripped
    #[command(alias = "d")]
    Decrypt {
        /// Path to the encrypted file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the decrypted file to; required when the input
        /// does not end in .enc
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { input } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::encrypt_file(&input, &mut *reader)
        }
        Commands::Decrypt { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::decrypt_file(&input, output.as_deref(), &mut *reader)
        }
    };

    match result {
        Ok(Outcome::Success) => {}
        Ok(Outcome::SuccessWithWarning(warning)) => {
            eprintln!("Warning: {}", warning);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader)
    }
}
