use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bidding round: 1 offers the up-card suit, 2 offers the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CallRound {
    One,
    Two,
}

impl CallRound {
    pub const BOTH: [CallRound; 2] = [CallRound::One, CallRound::Two];

    pub const fn number(self) -> u8 {
        match self {
            CallRound::One => 1,
            CallRound::Two => 2,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(CallRound::One),
            2 => Some(CallRound::Two),
            _ => None,
        }
    }
}

impl fmt::Display for CallRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bidding round must be 1 or 2, got {0}")]
pub struct InvalidCallRound(pub u8);

impl TryFrom<u8> for CallRound {
    type Error = InvalidCallRound;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CallRound::from_number(value).ok_or(InvalidCallRound(value))
    }
}

impl From<CallRound> for u8 {
    fn from(round: CallRound) -> Self {
        round.number()
    }
}

/// What one seat says during bidding: a suit (possibly alone) or pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDecision {
    pub trump: Option<Suit>,
    pub going_alone: bool,
}

impl CallDecision {
    pub const PASS: CallDecision = CallDecision {
        trump: None,
        going_alone: false,
    };

    pub const fn call(trump: Suit, going_alone: bool) -> Self {
        Self {
            trump: Some(trump),
            going_alone,
        }
    }

    pub const fn is_pass(&self) -> bool {
        self.trump.is_none()
    }
}

impl fmt::Display for CallDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.trump, self.going_alone) {
            (None, _) => f.write_str("pass"),
            (Some(suit), false) => write!(f, "{suit}"),
            (Some(suit), true) => write!(f, "{suit} (alone)"),
        }
    }
}

/// The call that settled trump for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpCall {
    pub trump: Suit,
    pub caller: PlayerPosition,
    pub going_alone: bool,
    pub round: CallRound,
}

impl TrumpCall {
    pub const fn new(
        trump: Suit,
        caller: PlayerPosition,
        going_alone: bool,
        round: CallRound,
    ) -> Self {
        Self {
            trump,
            caller,
            going_alone,
            round,
        }
    }

    /// The caller's partner when the caller plays alone.
    pub const fn sitting_out(&self) -> Option<PlayerPosition> {
        if self.going_alone {
            Some(self.caller.partner())
        } else {
            None
        }
    }
}

/// A bidding action named relative to the up-card rather than by suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallAction {
    Pass,
    OrderUp,
    Next,
    Reverse1,
    Reverse2,
}

impl CallAction {
    pub const ALL: [CallAction; 5] = [
        CallAction::Pass,
        CallAction::OrderUp,
        CallAction::Next,
        CallAction::Reverse1,
        CallAction::Reverse2,
    ];

    /// Actions a seat may take in `round`, in table order for reports.
    pub const fn for_round(round: CallRound) -> &'static [CallAction] {
        match round {
            CallRound::One => &[CallAction::Pass, CallAction::OrderUp],
            CallRound::Two => &[
                CallAction::Pass,
                CallAction::Next,
                CallAction::Reverse1,
                CallAction::Reverse2,
            ],
        }
    }

    pub fn allowed_in(self, round: CallRound) -> bool {
        Self::for_round(round).contains(&self)
    }

    /// Trump suit this action names for a given up-card, `None` for pass.
    pub fn trump_for(self, up_card: Card) -> Option<Suit> {
        let up = up_card.suit;
        let [reverse1, reverse2] = up.reverse_suits();
        match self {
            CallAction::Pass => None,
            CallAction::OrderUp => Some(up),
            CallAction::Next => Some(up.partner()),
            CallAction::Reverse1 => Some(reverse1),
            CallAction::Reverse2 => Some(reverse2),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CallAction::Pass => "pass",
            CallAction::OrderUp => "order_up",
            CallAction::Next => "next",
            CallAction::Reverse1 => "reverse1",
            CallAction::Reverse2 => "reverse2",
        }
    }
}

impl fmt::Display for CallAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown call action '{0}' (expected pass, order_up, next, reverse1 or reverse2)")]
pub struct ParseCallActionError(pub String);

impl FromStr for CallAction {
    type Err = ParseCallActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pass" => Ok(CallAction::Pass),
            "order_up" | "orderup" => Ok(CallAction::OrderUp),
            "next" => Ok(CallAction::Next),
            "reverse1" => Ok(CallAction::Reverse1),
            "reverse2" => Ok(CallAction::Reverse2),
            _ => Err(ParseCallActionError(s.to_string())),
        }
    }
}
