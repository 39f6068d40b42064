//! Raise-first-in frequency command.

use handscope_engine::{
    calculate_raise_frequencies, Filters, PlayerTarget, PositionGroupFrequencies,
    RaiseQualificationPolicy,
};
use serde::Serialize;
use std::io::Write;

use crate::cli::OutputFormat;
use crate::config;
use crate::error::CliError;
use crate::formatters::format_frequency_table;
use crate::validation::validate_filters;

/// Filter bounds given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterOverrides {
    pub min_bb: Option<f64>,
    pub max_bb: Option<f64>,
    pub min_bet_bb: Option<f64>,
    pub max_bet_bb: Option<f64>,
    pub min_seat: Option<usize>,
    pub max_seat: Option<usize>,
}

impl FilterOverrides {
    fn apply(self, base: Filters) -> Filters {
        Filters {
            min_bb: self.min_bb.unwrap_or(base.min_bb),
            max_bb: self.max_bb.unwrap_or(base.max_bb),
            min_bet_bb: self.min_bet_bb.unwrap_or(base.min_bet_bb),
            max_bet_bb: self.max_bet_bb.unwrap_or(base.max_bet_bb),
            min_seat: self.min_seat.unwrap_or(base.min_seat),
            max_seat: self.max_seat.unwrap_or(base.max_seat),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RfiOptions {
    pub input: String,
    pub target: PlayerTarget,
    pub policy: Option<RaiseQualificationPolicy>,
    pub overrides: FilterOverrides,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct RfiReport<'a> {
    input: &'a str,
    player: Option<&'a str>,
    policy: RaiseQualificationPolicy,
    filters: Filters,
    hands: usize,
    groups: &'a PositionGroupFrequencies,
}

/// Computes group frequencies for one transcript and prints them.
///
/// Flags take precedence over the configuration, which supplies the position
/// table, the groups, the policy and the seat bounds.
pub fn handle_rfi_command(
    options: RfiOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let filters = options.overrides.apply(cfg.filters);
    validate_filters(&filters).map_err(CliError::InvalidInput)?;
    let policy = options.policy.unwrap_or(cfg.analysis.policy);

    let hands = super::load_hands(&options.input, &cfg.analysis.table, err)?;
    let frequencies = calculate_raise_frequencies(
        &hands,
        &cfg.analysis.groups,
        &options.target,
        &filters,
        policy,
    );

    match options.format {
        OutputFormat::Json => {
            let report = RfiReport {
                input: &options.input,
                player: match &options.target {
                    PlayerTarget::Player(name) => Some(name.as_str()),
                    PlayerTarget::AnyPlayer => None,
                },
                policy,
                filters,
                hands: hands.len(),
                groups: &frequencies,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        OutputFormat::Text => write!(out, "{}", format_frequency_table(&frequencies))?,
    }
    Ok(())
}
