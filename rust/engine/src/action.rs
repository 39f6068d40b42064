use serde::{Deserialize, Serialize};

use crate::errors::AmountError;
use crate::street::Street;

/// Verb of a recognised action-log line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// `Dealt to <name> [ c1, c2 ]`
    Dealt,
    PostsAnte,
    PostsSmallBlind,
    PostsBigBlind,
    Raises,
    Calls,
    Bets,
    Checks,
    Folds,
    AllIn,
    /// Mentions a player but carries no recognised verb (chat, wins, shows, ...)
    Other,
}

impl ActionKind {
    // Order matters: a blind post that also says "all-in" is still a post.
    const KEYWORDS: [(&'static str, ActionKind); 9] = [
        ("posts ante", ActionKind::PostsAnte),
        ("posts small blind", ActionKind::PostsSmallBlind),
        ("posts big blind", ActionKind::PostsBigBlind),
        ("raises", ActionKind::Raises),
        ("calls", ActionKind::Calls),
        ("bets", ActionKind::Bets),
        ("checks", ActionKind::Checks),
        ("folds", ActionKind::Folds),
        ("all-in", ActionKind::AllIn),
    ];

    pub fn classify(line: &str) -> ActionKind {
        if line.starts_with(DEALT_PREFIX) {
            return ActionKind::Dealt;
        }
        let lowered = line.to_ascii_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, kind)| *kind)
            .unwrap_or(ActionKind::Other)
    }

    /// Whether lines of this kind carry a bracketed chip amount.
    pub fn carries_amount(&self) -> bool {
        !matches!(
            self,
            ActionKind::Dealt | ActionKind::Checks | ActionKind::Folds | ActionKind::Other
        )
    }
}

pub(crate) const DEALT_PREFIX: &str = "Dealt to ";

/// One log line of a hand, attributed and classified in a single pass.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionLine {
    /// Zero-based line number inside the hand block
    pub index: usize,
    pub street: Street,
    /// Roster name that performed the action, when one could be resolved
    pub actor: Option<String>,
    pub kind: ActionKind,
    /// Last bracketed amount; `None` when absent or unparseable
    pub amount: Option<u64>,
    pub all_in: bool,
    /// Verbatim line, trimmed
    pub text: String,
}

impl ActionLine {
    pub fn is_by(&self, name: &str) -> bool {
        self.actor.as_deref() == Some(name)
    }

    /// A call, raise or all-in means the pot is no longer unopened.
    pub fn opens_pot(&self) -> bool {
        matches!(self.kind, ActionKind::Calls | ActionKind::Raises) || self.all_in
    }
}

pub(crate) fn mentions_all_in(line: &str) -> bool {
    line.to_ascii_lowercase().contains("all-in")
}

/// Parses the amount inside the last `[...]` group of a line.
///
/// Grouping commas and surrounding whitespace are ignored, text after the
/// closing bracket is allowed.
pub fn parse_bracket_amount(line: &str) -> Result<u64, AmountError> {
    let open = line.rfind('[').ok_or(AmountError::Missing)?;
    let rest = &line[open + 1..];
    let close = rest.find(']').ok_or(AmountError::Unterminated)?;
    let raw = rest[..close].trim();
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    digits
        .parse::<u64>()
        .map_err(|_| AmountError::NotNumeric(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_verbs() {
        assert_eq!(ActionKind::classify("Dealt to Hero [ Ah, Kd ]"), ActionKind::Dealt);
        assert_eq!(
            ActionKind::classify("Villain posts big blind [100]"),
            ActionKind::PostsBigBlind
        );
        assert_eq!(
            ActionKind::classify("Hero posts small blind [50]"),
            ActionKind::PostsSmallBlind
        );
        assert_eq!(ActionKind::classify("Hero posts ante [10]"), ActionKind::PostsAnte);
        assert_eq!(ActionKind::classify("Hero raises [300]"), ActionKind::Raises);
        assert_eq!(ActionKind::classify("Hero calls [100]"), ActionKind::Calls);
        assert_eq!(ActionKind::classify("Hero folds"), ActionKind::Folds);
        assert_eq!(ActionKind::classify("Hero checks"), ActionKind::Checks);
        assert_eq!(ActionKind::classify("Hero bets [200]"), ActionKind::Bets);
        assert_eq!(ActionKind::classify("Hero is all-In [900]"), ActionKind::AllIn);
        assert_eq!(ActionKind::classify("Hero wins 1,000"), ActionKind::Other);
    }

    #[test]
    fn raise_that_goes_all_in_stays_a_raise() {
        let line = "Hero raises [1,490] and is all-in";
        assert_eq!(ActionKind::classify(line), ActionKind::Raises);
        assert!(mentions_all_in(line));
    }

    #[test]
    fn parses_plain_and_grouped_amounts() {
        assert_eq!(parse_bracket_amount("Hero raises [500]"), Ok(500));
        assert_eq!(parse_bracket_amount("Hero raises [ 1,500 ]"), Ok(1500));
        assert_eq!(
            parse_bracket_amount("Hero raises [1,490] and is all-in"),
            Ok(1490)
        );
    }

    #[test]
    fn uses_the_last_bracket_group() {
        assert_eq!(parse_bracket_amount("Hero [note] raises [250]"), Ok(250));
    }

    #[test]
    fn reports_malformed_amounts() {
        assert_eq!(parse_bracket_amount("Hero folds"), Err(AmountError::Missing));
        assert_eq!(
            parse_bracket_amount("Hero raises [500"),
            Err(AmountError::Unterminated)
        );
        assert_eq!(
            parse_bracket_amount("Hero raises [abc]"),
            Err(AmountError::NotNumeric("abc".to_string()))
        );
        assert_eq!(
            parse_bracket_amount("Hero raises []"),
            Err(AmountError::NotNumeric(String::new()))
        );
    }

    #[test]
    fn opens_pot_for_calls_raises_and_all_ins() {
        let mut line = ActionLine {
            index: 0,
            street: Street::Preflop,
            actor: Some("Hero".to_string()),
            kind: ActionKind::Folds,
            amount: None,
            all_in: false,
            text: "Hero folds".to_string(),
        };
        assert!(!line.opens_pot());
        line.kind = ActionKind::Calls;
        assert!(line.opens_pot());
        line.kind = ActionKind::Raises;
        assert!(line.opens_pot());
        line.kind = ActionKind::PostsBigBlind;
        assert!(!line.opens_pot());
        line.all_in = true;
        assert!(line.opens_pot());
    }
}
