//! Table positions and their inference from the big-blind poster.
//!
//! Transcripts rarely say reliably who has the button, but the big-blind post
//! is always there. The button therefore sits two seats before the big blind
//! in roster order, and the rest of the table follows the canonical ordering
//! for its size.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::errors::{PositionError, TableError};
use crate::hand::Hand;

/// Canonical seating label.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "BTN")]
    Button,
    #[serde(rename = "SB")]
    SmallBlind,
    #[serde(rename = "BB")]
    BigBlind,
    #[serde(rename = "UTG")]
    UnderTheGun,
    #[serde(rename = "UTG+1")]
    UnderTheGun1,
    #[serde(rename = "UTG+2")]
    UnderTheGun2,
    #[serde(rename = "MP")]
    Middle,
    #[serde(rename = "MP+1")]
    Middle1,
    #[serde(rename = "MP+2")]
    Middle2,
    #[serde(rename = "LJ")]
    Lojack,
    #[serde(rename = "HJ")]
    Hijack,
    #[serde(rename = "CO")]
    Cutoff,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::UnderTheGun1 => "UTG+1",
            Position::UnderTheGun2 => "UTG+2",
            Position::Middle => "MP",
            Position::Middle1 => "MP+1",
            Position::Middle2 => "MP+2",
            Position::Lojack => "LJ",
            Position::Hijack => "HJ",
            Position::Cutoff => "CO",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable map from table size to position labels, button first and then
/// clockwise.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CanonicalPositionTable {
    rows: BTreeMap<usize, Vec<Position>>,
}

impl Default for CanonicalPositionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CanonicalPositionTable {
    /// Orderings for two to nine seats.
    pub fn standard() -> Self {
        use Position::*;
        let rows = BTreeMap::from([
            (2, vec![Button, BigBlind]),
            (3, vec![Button, SmallBlind, BigBlind]),
            (4, vec![Button, SmallBlind, BigBlind, Middle]),
            (5, vec![Button, SmallBlind, BigBlind, Middle1, Cutoff]),
            (6, vec![Button, SmallBlind, BigBlind, UnderTheGun1, Middle1, Cutoff]),
            (
                7,
                vec![Button, SmallBlind, BigBlind, Middle1, Lojack, Hijack, Cutoff],
            ),
            (
                8,
                vec![
                    Button, SmallBlind, BigBlind, UnderTheGun1, Middle1, Lojack, Hijack, Cutoff,
                ],
            ),
            (
                9,
                vec![
                    Button,
                    SmallBlind,
                    BigBlind,
                    UnderTheGun1,
                    UnderTheGun2,
                    Middle1,
                    Lojack,
                    Hijack,
                    Cutoff,
                ],
            ),
        ]);
        Self { rows }
    }

    pub fn new(rows: BTreeMap<usize, Vec<Position>>) -> Result<Self, TableError> {
        for (size, labels) in &rows {
            validate_row(*size, labels)?;
        }
        Ok(Self { rows })
    }

    /// Returns a copy with the ordering for `size` replaced.
    pub fn with_row(&self, size: usize, labels: Vec<Position>) -> Result<Self, TableError> {
        validate_row(size, &labels)?;
        let mut rows = self.rows.clone();
        rows.insert(size, labels);
        Ok(Self { rows })
    }

    pub fn ordering(&self, size: usize) -> Option<&[Position]> {
        self.rows.get(&size).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Position])> {
        self.rows.iter().map(|(size, labels)| (*size, labels.as_slice()))
    }
}

fn validate_row(size: usize, labels: &[Position]) -> Result<(), TableError> {
    if size < 2 {
        return Err(TableError::TooFewSeats(size));
    }
    if labels.len() != size {
        return Err(TableError::LengthMismatch {
            size,
            labels: labels.len(),
        });
    }
    if labels.first() != Some(&Position::Button) {
        return Err(TableError::ButtonNotFirst { size });
    }
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(*label) {
            return Err(TableError::DuplicateLabel {
                size,
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

/// Named aggregation of canonical positions used for reporting.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PositionGroup {
    pub label: String,
    pub positions: Vec<Position>,
}

impl PositionGroup {
    pub fn new(label: impl Into<String>, positions: Vec<Position>) -> Self {
        Self {
            label: label.into(),
            positions,
        }
    }
}

/// Ordered list of reporting groups.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionGroups(Vec<PositionGroup>);

impl Default for PositionGroups {
    fn default() -> Self {
        Self::standard()
    }
}

impl PositionGroups {
    /// EP, MP, HJ, CO, BTN and SB; the big blind never opens.
    pub fn standard() -> Self {
        use Position::*;
        Self(vec![
            PositionGroup::new("EP", vec![UnderTheGun1, UnderTheGun2]),
            PositionGroup::new("MP", vec![Middle1, Lojack]),
            PositionGroup::new("HJ", vec![Hijack]),
            PositionGroup::new("CO", vec![Cutoff]),
            PositionGroup::new("BTN", vec![Button]),
            PositionGroup::new("SB", vec![SmallBlind]),
        ])
    }

    pub fn new(groups: Vec<PositionGroup>) -> Self {
        Self(groups)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PositionGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Labels every player of `hand` from the big-blind poster.
///
/// Existing labels are cleared first, so on error every position is `None`.
/// `number_of_players` is always refreshed.
pub fn assign_positions(
    hand: &mut Hand,
    table: &CanonicalPositionTable,
) -> Result<(), PositionError> {
    let n = hand.players.len();
    hand.number_of_players = Some(n);
    for player in hand.players.iter_mut() {
        player.position = None;
    }

    let ordering = table
        .ordering(n)
        .ok_or(PositionError::UnsupportedTableSize(n))?;
    let bb_index = hand
        .big_blind_index()
        .ok_or(PositionError::BigBlindNotFound)?;
    let btn_index = (bb_index + n - 2) % n;

    for (i, position) in ordering.iter().enumerate() {
        hand.players[(btn_index + i) % n].position = Some(*position);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rows_are_valid() {
        let table = CanonicalPositionTable::standard();
        for (size, labels) in table.rows() {
            assert_eq!(validate_row(size, labels), Ok(()));
        }
        assert_eq!(table.rows().count(), 8);
    }

    #[test]
    fn rejects_malformed_rows() {
        use Position::*;
        let table = CanonicalPositionTable::standard();
        assert_eq!(
            table.with_row(3, vec![Button, BigBlind]),
            Err(TableError::LengthMismatch { size: 3, labels: 2 })
        );
        assert_eq!(
            table.with_row(3, vec![Button, BigBlind, BigBlind]),
            Err(TableError::DuplicateLabel {
                size: 3,
                label: "BB".to_string()
            })
        );
        assert_eq!(
            table.with_row(2, vec![BigBlind, Button]),
            Err(TableError::ButtonNotFirst { size: 2 })
        );
        assert_eq!(
            table.with_row(1, vec![Button]),
            Err(TableError::TooFewSeats(1))
        );
    }

    #[test]
    fn with_row_adds_new_size() {
        use Position::*;
        let table = CanonicalPositionTable::standard()
            .with_row(
                10,
                vec![
                    Button,
                    SmallBlind,
                    BigBlind,
                    Middle,
                    Middle1,
                    Middle2,
                    UnderTheGun,
                    UnderTheGun1,
                    UnderTheGun2,
                    Cutoff,
                ],
            )
            .expect("valid ten-seat row");
        assert_eq!(table.ordering(10).map(|o| o.len()), Some(10));
        assert!(CanonicalPositionTable::standard().ordering(10).is_none());
    }

    #[test]
    fn position_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Position::UnderTheGun1).expect("serialize");
        assert_eq!(json, "\"UTG+1\"");
        let back: Position = serde_json::from_str("\"MP+1\"").expect("deserialize");
        assert_eq!(back, Position::Middle1);
        assert_eq!(Position::Cutoff.to_string(), "CO");
    }

    #[test]
    fn standard_groups_keep_reporting_order() {
        let groups = PositionGroups::standard();
        let labels: Vec<&str> = groups
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["EP", "MP", "HJ", "CO", "BTN", "SB"]);
    }
}
