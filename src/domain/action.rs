//! Trading-action classification.
//!
//! The selected model's risk/return profile is matched against an ordered rule
//! table; the first rule that holds decides the action. Profiles that match no
//! rule are [`Action::Hold`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NEUTRAL_SENTIMENT: &str = "Neutral";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StrongBuy,
    Buy,
    Accumulate,
    Hold,
    Sell,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::StrongBuy,
        Action::Buy,
        Action::Accumulate,
        Action::Hold,
        Action::Sell,
    ];

    /// Canonical label, e.g. `STRONG_BUY`.
    pub fn label(self) -> &'static str {
        match self {
            Action::StrongBuy => "STRONG_BUY",
            Action::Buy => "BUY",
            Action::Accumulate => "ACCUMULATE",
            Action::Hold => "HOLD",
            Action::Sell => "SELL",
        }
    }

    pub fn sentiment(self) -> &'static str {
        match self {
            Action::StrongBuy => "Highly Bullish",
            Action::Buy => "Bullish",
            Action::Accumulate => "Cautiously Optimistic",
            Action::Hold => NEUTRAL_SENTIMENT,
            Action::Sell => "Bearish",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action label: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts the canonical label and the space-separated display form
    /// (`STRONG BUY`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(' ', "_");
        Action::ALL
            .into_iter()
            .find(|a| a.label() == normalized)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Sentiment for an action given by label; unknown labels are neutral.
pub fn sentiment_for_label(label: &str) -> &'static str {
    label
        .parse::<Action>()
        .map(Action::sentiment)
        .unwrap_or(NEUTRAL_SENTIMENT)
}

/// The metrics the classifier looks at, all in percent except Sharpe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskProfile {
    pub total_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
}

pub struct ActionRule {
    pub action: Action,
    pub description: &'static str,
    predicate: fn(&RiskProfile) -> bool,
}

impl ActionRule {
    pub fn matches(&self, profile: &RiskProfile) -> bool {
        (self.predicate)(profile)
    }
}

impl fmt::Debug for ActionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRule")
            .field("action", &self.action)
            .field("description", &self.description)
            .finish()
    }
}

fn strong_buy(p: &RiskProfile) -> bool {
    p.total_return > 100.0 && p.sharpe >= 1.5 && p.max_drawdown >= -30.0
}

fn buy(p: &RiskProfile) -> bool {
    p.total_return >= 20.0 && p.sharpe >= 0.8
}

fn accumulate(p: &RiskProfile) -> bool {
    p.total_return >= 5.0
}

fn sell(p: &RiskProfile) -> bool {
    p.total_return < -5.0
}

/// Evaluated top to bottom, first match wins.
pub static ACTION_RULES: [ActionRule; 4] = [
    ActionRule {
        action: Action::StrongBuy,
        description: "Return > 100% AND Sharpe >= 1.5 AND MaxDD >= -30%",
        predicate: strong_buy,
    },
    ActionRule {
        action: Action::Buy,
        description: "Return >= 20% AND Sharpe >= 0.8",
        predicate: buy,
    },
    ActionRule {
        action: Action::Accumulate,
        description: "Return >= 5%",
        predicate: accumulate,
    },
    ActionRule {
        action: Action::Sell,
        description: "Return < -5%",
        predicate: sell,
    },
];

pub const DEFAULT_ACTION: Action = Action::Hold;
pub const DEFAULT_RULE_DESCRIPTION: &str = "-5% <= Return < 5%";

/// The first rule satisfied by `profile`, if any.
pub fn applied_rule(profile: &RiskProfile) -> Option<&'static ActionRule> {
    ACTION_RULES.iter().find(|rule| rule.matches(profile))
}

pub fn classify(profile: &RiskProfile) -> Action {
    applied_rule(profile)
        .map(|rule| rule.action)
        .unwrap_or(DEFAULT_ACTION)
}
