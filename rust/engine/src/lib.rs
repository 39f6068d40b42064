//! # handscope-engine: Hand-History Analysis Core
//!
//! Turns raw poker hand-history transcripts into position-labelled hand
//! records and computes preflop raise-first-in frequencies per position
//! group. Nothing here performs I/O except [`config::AnalysisConfig::load`].
//!
//! ## Core Modules
//!
//! - [`street`] - Streets, street markers and the street state machine
//! - [`action`] - One classified token per action-log line
//! - [`hand`] - Hand and player records
//! - [`parser`] - Transcript segmentation and hand parsing
//! - [`positions`] - Canonical position table, groups and assignment
//! - [`frequency`] - Filters, qualification policy and the calculator
//! - [`config`] - TOML analysis configuration
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use handscope_engine::config::AnalysisConfig;
//! use handscope_engine::frequency::{compute, Filters, PlayerTarget};
//!
//! let transcript = "Game 1 *** 01 02 2024 10:00:00
//! Seat 1: Hero ( 2,000 )
//! Seat 2: Villain ( 2,000 )
//! Seat 3: Carol ( 2,000 )
//! Hero posts small blind [50]
//! Villain posts big blind [100]
//! ** Dealing down cards **
//! Dealt to Hero [ Ah, Kd ]
//! Carol folds
//! Hero raises [300]
//! ";
//!
//! let config = AnalysisConfig::default();
//! let filters = Filters { min_seat: 2, max_seat: 9, ..Filters::default() };
//! let result = compute(
//!     transcript,
//!     &config.table,
//!     &config.groups,
//!     &PlayerTarget::Player("Hero".to_string()),
//!     &filters,
//!     config.policy,
//! );
//! assert_eq!(result.get("SB").map(|g| g.frequency), Some(100.0));
//! ```

pub mod action;
pub mod config;
pub mod errors;
pub mod frequency;
pub mod hand;
pub mod parser;
pub mod positions;
pub mod street;

pub use config::AnalysisConfig;
pub use frequency::{
    calculate_raise_frequencies, compute, Filters, PlayerTarget, PositionGroupFrequencies,
    RaiseQualificationPolicy,
};
pub use hand::{Hand, Player};
pub use parser::{parse_hand, parse_hands, segment_hands};
pub use positions::{assign_positions, CanonicalPositionTable, Position, PositionGroups};
