// Passbox CLI module.
//
// Command-line interface using clap derive macros.
// Subcommands: list, show, add, delete, generate.

mod commands;

use clap::{Parser, Subcommand};

use crate::generator;

pub use commands::execute;

/// Passbox: a local credential vault with password generation.
#[derive(Parser, Debug)]
#[command(name = "passbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all stored credentials (never prints passwords).
    List,

    /// Show the details of one credential.
    Show {
        /// The UUID of the credential to display.
        id: String,

        /// Print the stored password instead of a redaction marker.
        #[arg(long, default_value = "false")]
        reveal: bool,
    },

    /// Add a new credential to the vault.
    Add {
        /// Display label for the entry (free text, may be empty).
        #[arg(long, default_value = "")]
        name: String,

        /// Username or account identifier.
        #[arg(long, default_value = "")]
        username: String,

        /// The password to store.
        /// For production use, prefer --generate to avoid shell history exposure.
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,

        /// Generate a random password instead of supplying one.
        #[arg(long, default_value = "false")]
        generate: bool,

        /// Length of the generated password (with --generate).
        #[arg(long, default_value_t = generator::DEFAULT_LENGTH)]
        length: usize,
    },

    /// Delete a credential by id.
    Delete {
        /// The UUID of the credential to delete.
        id: String,
    },

    /// Generate a random alphanumeric password without storing it.
    Generate {
        /// Password length.
        #[arg(long, default_value_t = generator::DEFAULT_LENGTH)]
        length: usize,
    },
}
