//! Command handler modules for the handscope CLI.
//!
//! Each subcommand lives in its own file and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`, writing to the
//! injected output streams.

mod cfg;
mod parse;
mod positions;
mod rfi;

pub use cfg::handle_cfg_command;
pub use parse::handle_parse_command;
pub use positions::handle_positions_command;
pub use rfi::{handle_rfi_command, FilterOverrides, RfiOptions};

use handscope_engine::{CanonicalPositionTable, Hand};

use crate::error::CliError;
use crate::io_utils::read_text_auto;
use crate::ui;
use std::io::Write;

/// Reads and parses a transcript, warning about anything that will not count.
fn load_hands(
    input: &str,
    table: &CanonicalPositionTable,
    err: &mut dyn Write,
) -> Result<Vec<Hand>, CliError> {
    let text = read_text_auto(input).map_err(CliError::InvalidInput)?;
    let hands = handscope_engine::parse_hands(&text, table);

    if hands.is_empty() {
        ui::display_warning(err, &format!("no hands found in {}", input))?;
    }
    let unassigned = hands
        .iter()
        .filter(|h| !h.players.is_empty() && h.players.iter().all(|p| p.position.is_none()))
        .count();
    if unassigned > 0 {
        ui::display_warning(
            err,
            &format!(
                "{} of {} hands have no positions and are skipped",
                unassigned,
                hands.len()
            ),
        )?;
    }
    tracing::debug!(input, hands = hands.len(), unassigned, "transcript parsed");
    Ok(hands)
}
