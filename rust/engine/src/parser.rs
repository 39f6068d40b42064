//! Transcript segmentation and single-pass hand parsing.
//!
//! Parsing never fails: anything that cannot be recognised is left at its
//! default, and a block with no roster still yields an empty [`Hand`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::action::{mentions_all_in, parse_bracket_amount, ActionKind, ActionLine, DEALT_PREFIX};
use crate::hand::{Hand, Player};
use crate::positions::{assign_positions, CanonicalPositionTable};
use crate::street::{Street, StreetMarker, StreetTracker};

static HAND_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*Game \d+").expect("hand start pattern"));
static GAME_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"Game (\d+)").expect("game id pattern"));
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*\* (\d{2} \d{2} \d{4} \d{2}:\d{2}:\d{2})").expect("date pattern")
});
static BUTTON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Seat (\d+) is the button").expect("button pattern"));
static ROSTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*Seat (\d+): ([^()\n]+?) \( ([\d,]+) \)").expect("roster pattern")
});
static HOLE_CARDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*(\S{2}),?\s*(\S{2})\s*\]").expect("hole cards pattern"));

/// Splits a transcript into hand blocks, each starting at a `Game <digits>`
/// line. Text before the first marker is kept as its own block; blank blocks
/// are dropped.
pub fn segment_hands(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut bounds: Vec<usize> = HAND_START.find_iter(text).map(|m| m.start()).collect();
    if bounds.first() != Some(&0) {
        bounds.insert(0, 0);
    }
    bounds.push(text.len());
    let blocks = bounds.len() - 1;
    (0..blocks)
        .map(move |i| &text[bounds[i]..bounds[i + 1]])
        .filter(|block| !block.trim().is_empty())
}

/// Parses one hand block. Positions are left unassigned.
pub fn parse_hand(block: &str) -> Hand {
    let mut players = parse_roster(block);
    let mut hand = Hand {
        game_id: GAME_ID
            .captures(block)
            .and_then(|c| c[1].parse::<u64>().ok()),
        date: DATE.captures(block).map(|c| c[1].to_string()),
        button_seat: BUTTON
            .captures(block)
            .and_then(|c| c[1].parse::<u32>().ok()),
        ..Hand::default()
    };

    let mut tracker = StreetTracker::new();
    for (index, raw) in block.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(marker) = StreetMarker::detect(line) {
            tracker.transition(marker);
            if let Some(bucket) = marker
                .board_street()
                .and_then(|street| hand.community_cards.bucket_mut(street))
            {
                let cards = board_cards(line);
                if !cards.is_empty() {
                    *bucket = cards;
                }
            }
            continue;
        }
        if line.starts_with("Seat") {
            continue;
        }
        if !players.iter().any(|p| line.contains(p.name.as_str())) {
            continue;
        }

        let token = tokenize(index, tracker.current(), line, &players);
        if token.kind == ActionKind::Dealt {
            if let Some(player) = token
                .actor
                .as_deref()
                .and_then(|name| players.iter_mut().find(|p| p.name == name))
            {
                if player.cards.is_empty() {
                    player.cards = hole_cards(line);
                }
            }
        }
        hand.actions[token.street].push(token);
    }

    hand.players = players;
    hand
}

/// Segments, parses and position-labels every hand of a transcript.
///
/// Hands whose positions cannot be inferred are kept with every position
/// unset.
pub fn parse_hands(text: &str, table: &CanonicalPositionTable) -> Vec<Hand> {
    segment_hands(text)
        .map(|block| {
            let mut hand = parse_hand(block);
            if let Err(err) = assign_positions(&mut hand, table) {
                warn!(
                    game_id = ?hand.game_id,
                    players = hand.players.len(),
                    error = %err,
                    "Position assignment failed"
                );
            }
            hand
        })
        .collect()
}

fn parse_roster(block: &str) -> Vec<Player> {
    let mut players: Vec<Player> = Vec::new();
    for caps in ROSTER.captures_iter(block) {
        let Ok(seat) = caps[1].parse::<u32>() else {
            continue;
        };
        let Ok(chips) = caps[3].replace(',', "").parse::<u64>() else {
            continue;
        };
        let name = caps[2].trim();
        if name.is_empty() || players.iter().any(|p| p.seat == seat) {
            continue;
        }
        players.push(Player::new(seat, name, chips));
    }
    players
}

fn tokenize(index: usize, street: Street, line: &str, players: &[Player]) -> ActionLine {
    let dealt = line.strip_prefix(DEALT_PREFIX);
    let resolved = resolve_actor(dealt.unwrap_or(line), players);
    // Verbs are read after the actor so names never classify a line.
    let rest = resolved.map_or(line, |(_, rest)| rest);
    let kind = if dealt.is_some() {
        ActionKind::Dealt
    } else {
        ActionKind::classify(rest)
    };
    let amount = if kind.carries_amount() {
        match parse_bracket_amount(rest) {
            Ok(amount) => Some(amount),
            Err(err) => {
                debug!(line = index, error = %err, "Unreadable amount");
                None
            }
        }
    } else {
        None
    };
    ActionLine {
        index,
        street,
        actor: resolved.map(|(name, _)| name.to_string()),
        kind,
        amount,
        all_in: mentions_all_in(rest),
        text: line.to_string(),
    }
}

// Longest roster name that starts `subject` and ends at whitespace or the end
// of the line, with the text that follows it.
fn resolve_actor<'a>(subject: &'a str, players: &'a [Player]) -> Option<(&'a str, &'a str)> {
    players
        .iter()
        .filter_map(|p| {
            let rest = subject.strip_prefix(p.name.as_str())?;
            (rest.is_empty() || rest.starts_with(char::is_whitespace))
                .then_some((p.name.as_str(), rest))
        })
        .max_by_key(|(name, _)| name.len())
}

fn hole_cards(line: &str) -> Vec<String> {
    HOLE_CARDS
        .captures(line)
        .map(|c| vec![c[1].to_string(), c[2].to_string()])
        .unwrap_or_default()
}

fn board_cards(line: &str) -> Vec<String> {
    let Some(open) = line.rfind('[') else {
        return Vec::new();
    };
    let rest = &line[open + 1..];
    let inner = rest.find(']').map_or(rest, |close| &rest[..close]);
    inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|card| !card.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::Position;

    const HAND: &str = "Game 42 *** 03 14 2024 18:22:05
Seat 3 is the button
Seat 1: Bob ( 1,000 )
Seat 2: Bob Smith ( 2,000 )
Seat 3: x*y+ ( 3,000 )
Bob posts small blind [5]
Bob Smith posts big blind [10]
** Dealing down cards **
Dealt to Bob [ Ah, Kd ]
x*y+ raises [30]
Bob folds
Bob Smith calls [20]
** Dealing flop ** [ 2h, 7d, Tc ]
Bob Smith checks
x*y+ bets [40]
** Dealing turn ** [ 9s ]
** Dealing river ** [ Qh ]
Bob Smith shows [ Qs, Qd ]
";

    #[test]
    fn segments_on_game_lines() {
        let text = "Game 1 first\nline\nGame 2 second\n\n  \nGame 3 third\n";
        let blocks: Vec<&str> = segment_hands(text).collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].starts_with("Game 1"));
        assert!(blocks[1].starts_with("Game 2"));
        assert!(blocks[2].starts_with("Game 3"));
    }

    #[test]
    fn segmenter_keeps_non_blank_preamble_and_drops_blank_input() {
        let blocks: Vec<&str> = segment_hands("header\nGame 7 x\n").collect();
        assert_eq!(blocks, vec!["header\n", "Game 7 x\n"]);
        assert_eq!(segment_hands("  \n\n").count(), 0);
        assert_eq!(segment_hands("").count(), 0);
        assert_eq!(segment_hands("no markers here").count(), 1);
    }

    #[test]
    fn segmenter_ignores_game_mid_line() {
        let blocks: Vec<&str> = segment_hands("Game 1\nHero says Game 2 was fun\n").collect();
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn parses_header_metadata_and_roster() {
        let hand = parse_hand(HAND);
        assert_eq!(hand.game_id, Some(42));
        assert_eq!(hand.date.as_deref(), Some("03 14 2024 18:22:05"));
        assert_eq!(hand.button_seat, Some(3));
        let names: Vec<&str> = hand.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Bob Smith", "x*y+"]);
        assert_eq!(hand.players[0].chips, 1000);
        assert_eq!(hand.players[2].chips, 3000);
        assert!(hand.players.iter().all(|p| p.position.is_none()));
    }

    #[test]
    fn attributes_lines_to_longest_leading_name() {
        let hand = parse_hand(HAND);
        let bb = &hand.actions.preflop[1];
        assert_eq!(bb.kind, ActionKind::PostsBigBlind);
        assert_eq!(bb.actor.as_deref(), Some("Bob Smith"));
        assert_eq!(bb.amount, Some(10));
        assert_eq!(hand.actions_by("Bob", Street::Preflop).count(), 3);
        assert_eq!(hand.actions_by("x*y+", Street::Preflop).count(), 1);
        assert_eq!(hand.big_blind(), Some(10));
    }

    #[test]
    fn splits_actions_by_street_and_reads_board() {
        let hand = parse_hand(HAND);
        assert_eq!(hand.actions.preflop.len(), 6);
        assert_eq!(hand.actions.flop.len(), 2);
        assert_eq!(hand.actions.turn.len(), 0);
        assert_eq!(hand.actions.river.len(), 1);
        assert_eq!(hand.community_cards.flop, vec!["2h", "7d", "Tc"]);
        assert_eq!(hand.community_cards.turn, vec!["9s"]);
        assert_eq!(hand.community_cards.river, vec!["Qh"]);
        assert!(hand
            .actions
            .flop
            .iter()
            .all(|a| a.street == Street::Flop));
    }

    #[test]
    fn hole_cards_come_from_dealt_line() {
        let hand = parse_hand(HAND);
        assert_eq!(hand.players[0].cards, vec!["Ah", "Kd"]);
        assert!(hand.players[1].cards.is_empty());
        let dealt = &hand.actions.preflop[2];
        assert_eq!(dealt.kind, ActionKind::Dealt);
        assert_eq!(dealt.actor.as_deref(), Some("Bob"));
        assert_eq!(dealt.amount, None);
    }

    #[test]
    fn malformed_amount_is_kept_as_unusable() {
        let block = "Game 5\nSeat 1: Hero ( 100 )\nSeat 2: Villain ( 100 )\nHero raises [lots]\n";
        let hand = parse_hand(block);
        assert_eq!(hand.actions.preflop.len(), 1);
        assert_eq!(hand.actions.preflop[0].kind, ActionKind::Raises);
        assert_eq!(hand.actions.preflop[0].amount, None);
    }

    #[test]
    fn block_without_metadata_or_roster_still_yields_hand() {
        let hand = parse_hand("just some chatter\nnothing to see\n");
        assert_eq!(hand, Hand::default());
    }

    #[test]
    fn duplicate_seat_lines_keep_first_occurrence() {
        let block = "Game 9\nSeat 1: Hero ( 100 )\nSeat 1: Hero ( 90 )\n";
        let hand = parse_hand(block);
        assert_eq!(hand.players.len(), 1);
        assert_eq!(hand.players[0].chips, 100);
    }

    #[test]
    fn verbs_inside_names_do_not_classify_lines() {
        let block = "Game 11
Seat 1: Callsy ( 1,000 )
Seat 2: RaisesHell ( 1,000 )
Seat 3: Folds All-In ( 1,000 )
Callsy posts small blind [5]
RaisesHell posts big blind [10]
** Dealing down cards **
Dealt to RaisesHell [ Ah, Kd ]
Folds All-In calls [10]
Callsy folds
RaisesHell checks
";
        let hand = parse_hand(block);
        let preflop = &hand.actions.preflop;
        assert_eq!(preflop[0].kind, ActionKind::PostsSmallBlind);
        assert_eq!(preflop[2].kind, ActionKind::Dealt);
        assert_eq!(preflop[2].actor.as_deref(), Some("RaisesHell"));
        assert_eq!(preflop[3].kind, ActionKind::Calls);
        assert_eq!(preflop[3].actor.as_deref(), Some("Folds All-In"));
        assert!(!preflop[3].all_in);
        assert_eq!(preflop[4].kind, ActionKind::Folds);
        assert!(!preflop[4].opens_pot());
        assert_eq!(preflop[5].kind, ActionKind::Checks);
    }

    #[test]
    fn dealt_line_without_cards_still_names_the_player() {
        let block = "Game 12\nSeat 1: Hero ( 100 )\nSeat 2: Villain ( 100 )\nDealt to Hero\nHero folds\n";
        let hand = parse_hand(block);
        let dealt = &hand.actions.preflop[0];
        assert_eq!(dealt.kind, ActionKind::Dealt);
        assert_eq!(dealt.actor.as_deref(), Some("Hero"));
        assert!(hand.players[0].cards.is_empty());
    }

    #[test]
    fn hole_cards_without_spaces_are_read() {
        let block = "Game 13\nSeat 1: Hero ( 100 )\nSeat 2: Villain ( 100 )\nDealt to Hero [Ah,Kd]\n";
        let hand = parse_hand(block);
        assert_eq!(hand.players[0].cards, vec!["Ah", "Kd"]);
        assert_eq!(hole_cards("Dealt to Hero [ 9c 9d ]"), vec!["9c", "9d"]);
    }

    #[test]
    fn parse_hands_assigns_positions() {
        let table = CanonicalPositionTable::standard();
        let hands = parse_hands(HAND, &table);
        assert_eq!(hands.len(), 1);
        let hand = &hands[0];
        assert_eq!(hand.number_of_players, Some(3));
        // BB at roster index 1, so the button is index 2.
        assert_eq!(hand.players[2].position, Some(Position::Button));
        assert_eq!(hand.players[0].position, Some(Position::SmallBlind));
        assert_eq!(hand.players[1].position, Some(Position::BigBlind));
    }
}
