//! CLI argument definitions using clap
//!
//! Commands:
//! - schemaforge check --schema <path>
//! - schemaforge validate --schema <path> --input <path> [--all-errors]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemaforge - compile declarative configuration into validation schemas
#[derive(Parser, Debug)]
#[command(name = "schemaforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a schema declaration file and report whether it is well-formed
    Check {
        /// Path to the schema declaration file
        #[arg(long)]
        schema: PathBuf,
    },

    /// Validate an input value against a schema declaration file
    Validate {
        /// Path to the schema declaration file
        #[arg(long)]
        schema: PathBuf,

        /// Path to the JSON value to validate
        #[arg(long)]
        input: PathBuf,

        /// Collect every violation instead of stopping at the first
        #[arg(long)]
        all_errors: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
