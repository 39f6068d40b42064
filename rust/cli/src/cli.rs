//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use handscope_engine::RaiseQualificationPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "handscope",
    version,
    about = "Preflop raise-first-in analysis of poker hand histories"
)]
pub struct HandscopeCli {
    /// Print engine diagnostics to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Raise-first-in frequencies per position group
    Rfi {
        /// Transcript file (`.zst` is decompressed)
        #[arg(long)]
        input: String,
        /// Screen name to analyse
        #[arg(long, required_unless_present = "any_player", conflicts_with = "any_player")]
        player: Option<String>,
        /// Pool every player's decisions
        #[arg(long)]
        any_player: bool,
        /// Qualification policy; defaults to the configured one
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        #[arg(long)]
        min_bb: Option<f64>,
        #[arg(long)]
        max_bb: Option<f64>,
        #[arg(long)]
        min_bet_bb: Option<f64>,
        #[arg(long)]
        max_bet_bb: Option<f64>,
        #[arg(long)]
        min_seat: Option<usize>,
        #[arg(long)]
        max_seat: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Parsed, position-labelled hands as JSON
    Parse {
        #[arg(long)]
        input: String,
    },
    /// Canonical position table and reporting groups
    Positions,
    /// Resolved configuration with value sources
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    OpenRaise,
    Shove,
}

impl PolicyArg {
    pub fn policy(self) -> RaiseQualificationPolicy {
        match self {
            PolicyArg::OpenRaise => RaiseQualificationPolicy::OPEN_RAISE,
            PolicyArg::Shove => RaiseQualificationPolicy::SHOVE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
