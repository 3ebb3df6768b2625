//! CLI command implementations

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use crate::config::build_schema;
use crate::schema::ValidateOptions;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parses arguments and dispatches to the selected command.
pub fn run() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatches one parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Check { schema } => check(&schema),
        Command::Validate {
            schema,
            input,
            all_errors,
        } => validate(&schema, &input, all_errors),
    }
}

/// Builds a declaration file and reports its field count.
pub fn check(schema_path: &Path) -> CliResult<()> {
    let fields = read_declaration(schema_path)?;
    let schema = build_schema(&fields)?;

    println!("ok: {} field(s)", schema.len());
    Ok(())
}

/// Builds a declaration file, then validates an input value against it.
/// Prints the (possibly coerced) value on success.
pub fn validate(schema_path: &Path, input_path: &Path, all_errors: bool) -> CliResult<()> {
    let fields = read_declaration(schema_path)?;
    let schema = build_schema(&fields)?;
    let input = read_json(input_path)?;

    let options = if all_errors {
        ValidateOptions::collect_all()
    } else {
        ValidateOptions::default()
    };

    let validated = schema.validate(&input, options)?;
    println!("{}", validated);
    Ok(())
}

fn read_json(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path).map_err(|err| CliError::Read {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|err| CliError::Parse {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn read_declaration(path: &Path) -> CliResult<Map<String, Value>> {
    let value = read_json(path)?;

    value.as_object().cloned().ok_or_else(|| CliError::Parse {
        path: path.display().to_string(),
        reason: "expected a top-level object of field declarations".to_string(),
    })
}
