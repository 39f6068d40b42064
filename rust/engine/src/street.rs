use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Represents a betting street in Texas Hold'em poker.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn as_str(&self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

/// Dealer lines that delimit streets in a transcript.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StreetMarker {
    DealingDownCards,
    DealingFlop,
    DealingTurn,
    DealingRiver,
}

impl StreetMarker {
    const PATTERNS: [(&'static str, StreetMarker); 4] = [
        ("** dealing down cards **", StreetMarker::DealingDownCards),
        ("** dealing flop **", StreetMarker::DealingFlop),
        ("** dealing turn **", StreetMarker::DealingTurn),
        ("** dealing river **", StreetMarker::DealingRiver),
    ];

    /// Recognises a marker anywhere in the line, ignoring ASCII case.
    pub fn detect(line: &str) -> Option<StreetMarker> {
        let lowered = line.to_ascii_lowercase();
        Self::PATTERNS
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern))
            .map(|(_, marker)| *marker)
    }

    /// Street whose community cards this marker deals, if any.
    pub fn board_street(&self) -> Option<Street> {
        match self {
            StreetMarker::DealingDownCards => None,
            StreetMarker::DealingFlop => Some(Street::Flop),
            StreetMarker::DealingTurn => Some(Street::Turn),
            StreetMarker::DealingRiver => Some(Street::River),
        }
    }
}

/// Finite-state machine tracking which street the log is currently on.
///
/// Flop, turn and river markers only move the tracker forward. The down-cards
/// marker is the one backward transition: it resets the tracker to preflop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StreetTracker {
    current: Street,
}

impl Default for StreetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StreetTracker {
    pub fn new() -> Self {
        Self {
            current: Street::Preflop,
        }
    }

    pub fn current(&self) -> Street {
        self.current
    }

    /// Applies one marker and returns the resulting street.
    pub fn transition(&mut self, marker: StreetMarker) -> Street {
        self.current = match marker {
            StreetMarker::DealingDownCards => Street::Preflop,
            StreetMarker::DealingFlop => self.current.max(Street::Flop),
            StreetMarker::DealingTurn => self.current.max(Street::Turn),
            StreetMarker::DealingRiver => self.current.max(Street::River),
        };
        self.current
    }
}

/// One bucket per street, indexable by [`Street`].
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StreetMap<T> {
    pub preflop: T,
    pub flop: T,
    pub turn: T,
    pub river: T,
}

impl<T> Index<Street> for StreetMap<T> {
    type Output = T;

    fn index(&self, street: Street) -> &T {
        match street {
            Street::Preflop => &self.preflop,
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }
}

impl<T> IndexMut<Street> for StreetMap<T> {
    fn index_mut(&mut self, street: Street) -> &mut T {
        match street {
            Street::Preflop => &mut self.preflop,
            Street::Flop => &mut self.flop,
            Street::Turn => &mut self.turn,
            Street::River => &mut self.river,
        }
    }
}

/// Community cards as dealt by the flop, turn and river markers.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub flop: Vec<String>,
    pub turn: Vec<String>,
    pub river: Vec<String>,
}

impl Board {
    pub fn bucket_mut(&mut self, street: Street) -> Option<&mut Vec<String>> {
        match street {
            Street::Preflop => None,
            Street::Flop => Some(&mut self.flop),
            Street::Turn => Some(&mut self.turn),
            Street::River => Some(&mut self.river),
        }
    }
}
