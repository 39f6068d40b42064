use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, ActionLine};
use crate::positions::Position;
use crate::street::{Board, Street, StreetMap};

/// A seated player, owned by its [`Hand`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Seat number, unique within a hand
    pub seat: u32,
    /// Free-text screen name; the key used to attribute action lines
    pub name: String,
    /// Stack at the start of the hand
    pub chips: u64,
    /// Hole cards: empty, or exactly two card tokens
    #[serde(default)]
    pub cards: Vec<String>,
    /// Assigned after parsing; stays `None` when assignment fails
    #[serde(default)]
    pub position: Option<Position>,
}

impl Player {
    pub fn new(seat: u32, name: impl Into<String>, chips: u64) -> Self {
        Self {
            seat,
            name: name.into(),
            chips,
            cards: Vec::new(),
            position: None,
        }
    }
}

/// One played-out round parsed from a transcript block.
///
/// Every field is optional or empty by default: a block that yields nothing
/// recognisable still produces a `Hand`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub game_id: Option<u64>,
    /// Header timestamp, kept verbatim
    pub date: Option<String>,
    pub button_seat: Option<u32>,
    /// Roster in transcript order
    pub players: Vec<Player>,
    pub community_cards: Board,
    /// Action lines per street, in transcript order
    pub actions: StreetMap<Vec<ActionLine>>,
    pub number_of_players: Option<usize>,
}

impl Hand {
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_at(&self, position: Position) -> Option<&Player> {
        self.players.iter().find(|p| p.position == Some(position))
    }

    /// Lines on `street` performed by `name`.
    pub fn actions_by<'a>(
        &'a self,
        name: &'a str,
        street: Street,
    ) -> impl Iterator<Item = &'a ActionLine> + 'a {
        self.actions[street].iter().filter(move |a| a.is_by(name))
    }

    /// Amount of the first preflop big-blind post, if it could be read.
    pub fn big_blind(&self) -> Option<u64> {
        self.actions
            .preflop
            .iter()
            .find(|a| a.kind == ActionKind::PostsBigBlind)
            .and_then(|a| a.amount)
    }

    /// Ante posted preflop by `name`.
    ///
    /// `Some(0)` when the player posted no ante, `None` when an ante line
    /// exists but its amount is unreadable.
    pub fn ante_posted_by(&self, name: &str) -> Option<u64> {
        match self
            .actions_by(name, Street::Preflop)
            .find(|a| a.kind == ActionKind::PostsAnte)
        {
            Some(line) => line.amount,
            None => Some(0),
        }
    }

    /// Index in `players` of the first player who posted the big blind.
    pub fn big_blind_index(&self) -> Option<usize> {
        self.players.iter().position(|p| {
            self.actions_by(&p.name, Street::Preflop)
                .any(|a| a.kind == ActionKind::PostsBigBlind)
        })
    }
}
