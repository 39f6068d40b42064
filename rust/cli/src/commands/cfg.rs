//! Configuration command handler.
//!
//! Prints the resolved configuration as JSON, every value paired with where
//! it came from:
//!
//! ```json
//! {
//!   "policy": {
//!     "value": { "ante_adjusted_stack": false, ... },
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::collections::BTreeMap;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved {
        config,
        sources,
        path,
    } = resolved;
    let table: BTreeMap<usize, _> = config
        .analysis
        .table
        .rows()
        .map(|(size, labels)| (size, labels.to_vec()))
        .collect();
    let display = serde_json::json!({
        "config_file": path,
        "policy": {
            "value": config.analysis.policy,
            "source": sources.policy,
        },
        "table": {
            "value": table,
            "source": sources.table,
        },
        "groups": {
            "value": config.analysis.groups,
            "source": sources.groups,
        },
        "min_seat": {
            "value": config.filters.min_seat,
            "source": sources.min_seat,
        },
        "max_seat": {
            "value": config.filters.max_seat,
            "source": sources.max_seat,
        }
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&display)?)?;
    Ok(())
}
