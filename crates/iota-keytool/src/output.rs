//! Output formatting.

use colored::Colorize;
use serde_json::Value as Json;

/// Print a command result as pretty JSON on stdout.
pub fn print_json(value: &Json) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error with its cause chain on stderr.
pub fn print_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), error);
}
