//! # Handscope CLI Library
//!
//! Batch front-end over `handscope-engine`: raise-first-in frequencies,
//! parsed hands and position tables for hand-history transcripts.
//!
//! ## Main Entry Point
//!
//! [`run`] parses command-line arguments and executes the subcommand.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["handscope", "rfi", "--input", "session.txt", "--player", "Hero"];
//! let code = handscope_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `rfi`: Raise-first-in frequencies per position group
//! - `parse`: Parsed, position-labelled hands as JSON
//! - `positions`: The canonical position table and reporting groups
//! - `cfg`: Display current configuration settings and their sources

use clap::Parser;
use std::io::Write;
#[macro_use]
mod macros;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, HandscopeCli};
use commands::{
    handle_cfg_command, handle_parse_command, handle_positions_command, handle_rfi_command,
    FilterOverrides, RfiOptions,
};
use handscope_engine::PlayerTarget;

pub use error::CliError;

const COMMANDS: &[&str] = &["rfi", "parse", "positions", "cfg"];

/// Main entry point for the CLI application.
///
/// Returns the process exit code: `0` for success, `2` for errors.
///
/// # Example
///
/// ```
/// use std::io;
/// let mut out = Vec::new();
/// let code = handscope_cli::run(["handscope", "positions"], &mut out, &mut io::stderr());
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().contains("\"BTN\""));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match HandscopeCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout and succeed
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "Usage: handscope <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: handscope --help");
                    exit_code::ERROR
                }
            };
        }
    };

    if cli.verbose {
        init_verbose_logging();
    }

    let result = match cli.cmd {
        Commands::Rfi {
            input,
            player,
            any_player,
            policy,
            min_bb,
            max_bb,
            min_bet_bb,
            max_bet_bb,
            min_seat,
            max_seat,
            format,
        } => {
            let target = match (player, any_player) {
                (Some(name), false) => PlayerTarget::Player(name),
                _ => PlayerTarget::AnyPlayer,
            };
            let options = RfiOptions {
                input,
                target,
                policy: policy.map(|p| p.policy()),
                overrides: FilterOverrides {
                    min_bb,
                    max_bb,
                    min_bet_bb,
                    max_bet_bb,
                    min_seat,
                    max_seat,
                },
                format,
            };
            handle_rfi_command(options, out, err)
        }
        Commands::Parse { input } => handle_parse_command(&input, out, err),
        Commands::Positions => handle_positions_command(out),
        // cfg reports its own configuration errors
        Commands::Cfg => return finish_quiet(handle_cfg_command(out, err)),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}

fn finish_quiet(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(_) => exit_code::ERROR,
    }
}

/// Sends engine and CLI diagnostics to stderr; `RUST_LOG` still wins when set.
fn init_verbose_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("handscope_engine=debug,handscope_cli=debug"));
    // A second install (repeated runs in one process) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
