//! Preflop raise-first-in statistics per position group.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{ActionKind, ActionLine};
use crate::hand::{Hand, Player};
use crate::parser::parse_hands;
use crate::positions::{CanonicalPositionTable, PositionGroup, PositionGroups};

/// Stack-depth, bet-size and table-size bounds, all inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub max_bb: f64,
    pub min_bb: f64,
    pub min_bet_bb: f64,
    pub max_bet_bb: f64,
    pub min_seat: usize,
    pub max_seat: usize,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            max_bb: 40.0,
            min_bb: 0.0,
            min_bet_bb: 0.0,
            max_bet_bb: 5.0,
            min_seat: 7,
            max_seat: 9,
        }
    }
}

impl Filters {
    fn seats_in_range(&self, n: usize) -> bool {
        self.min_seat <= n && n <= self.max_seat
    }

    fn stack_in_range(&self, stack_bb: f64) -> bool {
        self.min_bb <= stack_bb && stack_bb <= self.max_bb
    }

    fn bet_in_range(&self, bet_bb: f64) -> bool {
        self.min_bet_bb <= bet_bb && bet_bb <= self.max_bet_bb
    }
}

/// Which decisions count, and how the stack is measured.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaiseQualificationPolicy {
    /// Measure the stack after the player's ante
    pub ante_adjusted_stack: bool,
    /// An all-in decision is never an opportunity
    pub exclude_all_in: bool,
    /// A raise only counts when it commits at least the whole stack
    pub require_full_stack_raise: bool,
}

impl RaiseQualificationPolicy {
    /// Standard open-raise statistic.
    pub const OPEN_RAISE: Self = Self {
        ante_adjusted_stack: false,
        exclude_all_in: true,
        require_full_stack_raise: false,
    };

    /// Open-shove statistic.
    pub const SHOVE: Self = Self {
        ante_adjusted_stack: true,
        exclude_all_in: false,
        require_full_stack_raise: true,
    };

    /// Looks up a preset by its command-line name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "open-raise" => Some(Self::OPEN_RAISE),
            "shove" => Some(Self::SHOVE),
            _ => None,
        }
    }
}

impl Default for RaiseQualificationPolicy {
    fn default() -> Self {
        Self::OPEN_RAISE
    }
}

/// Whose decisions are counted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlayerTarget {
    /// Exact name match
    Player(String),
    AnyPlayer,
}

impl PlayerTarget {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            PlayerTarget::Player(target) => target == name,
            PlayerTarget::AnyPlayer => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct GroupStats {
    pub opportunities: u32,
    pub raises: u32,
}

impl GroupStats {
    /// Percentage in `[0, 100]`; zero without opportunities.
    pub fn frequency(&self) -> f64 {
        if self.opportunities == 0 {
            0.0
        } else {
            100.0 * f64::from(self.raises) / f64::from(self.opportunities)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupFrequency {
    pub label: String,
    pub opportunities: u32,
    pub raises: u32,
    pub frequency: f64,
}

impl GroupFrequency {
    fn new(label: &str, stats: GroupStats) -> Self {
        Self {
            label: label.to_string(),
            opportunities: stats.opportunities,
            raises: stats.raises,
            frequency: stats.frequency(),
        }
    }
}

/// Results in the order of the groups they were computed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PositionGroupFrequencies(Vec<GroupFrequency>);

impl PositionGroupFrequencies {
    pub fn get(&self, label: &str) -> Option<&GroupFrequency> {
        self.0.iter().find(|g| g.label == label)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupFrequency> {
        self.0.iter()
    }

    pub fn percentages(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|g| (g.label.as_str(), g.frequency))
    }
}

/// Counts raise opportunities and qualifying raises for every group.
pub fn calculate_raise_frequencies(
    hands: &[Hand],
    groups: &PositionGroups,
    target: &PlayerTarget,
    filters: &Filters,
    policy: RaiseQualificationPolicy,
) -> PositionGroupFrequencies {
    let results = groups
        .iter()
        .map(|group| {
            let mut stats = GroupStats::default();
            for hand in hands {
                tally_hand(hand, group, target, filters, policy, &mut stats);
            }
            GroupFrequency::new(&group.label, stats)
        })
        .collect();
    PositionGroupFrequencies(results)
}

/// Parses `transcript` and computes the group frequencies in one call.
pub fn compute(
    transcript: &str,
    table: &CanonicalPositionTable,
    groups: &PositionGroups,
    target: &PlayerTarget,
    filters: &Filters,
    policy: RaiseQualificationPolicy,
) -> PositionGroupFrequencies {
    let hands = parse_hands(transcript, table);
    calculate_raise_frequencies(&hands, groups, target, filters, policy)
}

fn tally_hand(
    hand: &Hand,
    group: &PositionGroup,
    target: &PlayerTarget,
    filters: &Filters,
    policy: RaiseQualificationPolicy,
    stats: &mut GroupStats,
) {
    let n = hand.players.len();
    if n == 0 || !filters.seats_in_range(n) {
        return;
    }
    let Some(bb) = hand.big_blind().filter(|bb| *bb > 0) else {
        debug!(game_id = ?hand.game_id, "Skipping hand without usable big blind");
        return;
    };

    for position in &group.positions {
        let Some(player) = hand.player_at(*position) else {
            continue;
        };
        if !target.matches(&player.name) {
            continue;
        }
        if let Some(raised) = evaluate_decision(hand, player, bb, filters, policy) {
            stats.opportunities += 1;
            if raised {
                stats.raises += 1;
            }
        }
    }
}

/// `Some(raised)` when the player faced an unopened pot, `None` when the
/// hand does not count for this player.
fn evaluate_decision(
    hand: &Hand,
    player: &Player,
    bb: u64,
    filters: &Filters,
    policy: RaiseQualificationPolicy,
) -> Option<bool> {
    let stack = if policy.ante_adjusted_stack {
        let Some(ante) = hand.ante_posted_by(&player.name) else {
            debug!(game_id = ?hand.game_id, player = %player.name, "Unreadable ante");
            return None;
        };
        player.chips.saturating_sub(ante)
    } else {
        player.chips
    };
    let stack_bb = stack as f64 / bb as f64;
    if !filters.stack_in_range(stack_bb) {
        return None;
    }

    let preflop = &hand.actions.preflop;
    let (at, decision) = first_decision(preflop, &player.name)?;
    if preflop[..at].iter().any(ActionLine::opens_pot) {
        return None;
    }
    if policy.exclude_all_in && decision.all_in {
        return None;
    }
    if decision.kind != ActionKind::Raises {
        return Some(false);
    }

    let Some(amount) = decision.amount else {
        debug!(game_id = ?hand.game_id, line = decision.index, "Raise without usable amount");
        return None;
    };
    let bet_bb = amount as f64 / bb as f64;
    let full_stack = !policy.require_full_stack_raise || amount >= stack;
    Some(filters.bet_in_range(bet_bb) && full_stack)
}

// First preflop line acted by `name` after their own dealt line.
fn first_decision<'a>(preflop: &'a [ActionLine], name: &str) -> Option<(usize, &'a ActionLine)> {
    let dealt = preflop
        .iter()
        .position(|a| a.kind == ActionKind::Dealt && a.is_by(name))?;
    preflop
        .iter()
        .enumerate()
        .skip(dealt + 1)
        .find(|(_, a)| a.is_by(name))
}
