//! Position table command.

use std::collections::BTreeMap;
use std::io::Write;

use crate::config;
use crate::error::CliError;

/// Prints the position table, keyed by table size, and the reporting groups.
pub fn handle_positions_command(out: &mut dyn Write) -> Result<(), CliError> {
    let cfg = config::load()?;
    let analysis = &cfg.analysis;
    let table: BTreeMap<usize, _> = analysis
        .table
        .rows()
        .map(|(size, labels)| (size, labels.to_vec()))
        .collect();
    let display = serde_json::json!({
        "table": table,
        "groups": analysis.groups,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&display)?)?;
    Ok(())
}
