//! Parsed-hand dump command.

use std::io::Write;

use crate::config;
use crate::error::CliError;

/// Prints every parsed hand, positions included, as a pretty JSON array.
pub fn handle_parse_command(
    input: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let hands = super::load_hands(input, &cfg.analysis.table, err)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&hands)?)?;
    Ok(())
}
