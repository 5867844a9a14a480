mod call;
mod discard;
mod evaluate;
mod params;
mod play;
mod tracker;

pub use call::{CallPlan, CallPlanner, CallReason};
pub use discard::{after_pickup, worst_card};
pub use evaluate::{HandScore, ace_strength, evaluate_hand, trump_strength, void_strength};
pub use params::{
    BotParams, ROUND_ONE_THRESHOLDS, ROUND_TWO_THRESHOLDS, RoundTwoThresholds, Threshold,
};
pub use play::{FollowRule, LeadRule, PlayChoice, PlayPlanner, PlayReason};
pub use tracker::BossTracker;

use euchre_core::model::call::CallRound;
use euchre_core::model::card::Card;
use euchre_core::model::hand::{HandError, ensure_distinct};
use euchre_core::model::player::{PlayerPosition, SeatPosition};
use euchre_core::model::round::HAND_SIZE;
use euchre_core::model::suit::Suit;
use euchre_core::model::trick::{Play, Trick};
use thiserror::Error;

/// Malformed input to a decision. Well-formed inputs always produce a decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("hand is empty")]
    EmptyHand,
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error("{0} is in hand but has already been played")]
    AlreadyPlayed(Card),
    #[error("up-card {0} is also in the hand")]
    UpCardInHand(Card),
}

/// What a seat sees when asked to bid.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a [Card],
    pub dealer: PlayerPosition,
    pub up_card: Card,
    pub round: CallRound,
}

impl<'a> CallContext<'a> {
    pub fn new(
        seat: PlayerPosition,
        hand: &'a [Card],
        dealer: PlayerPosition,
        up_card: Card,
        round: CallRound,
    ) -> Self {
        Self {
            seat,
            hand,
            dealer,
            up_card,
            round,
        }
    }

    pub fn position(&self) -> SeatPosition {
        SeatPosition::of(self.seat, self.dealer)
    }

    pub fn is_dealer(&self) -> bool {
        self.seat == self.dealer
    }

    pub fn validate(&self) -> Result<(), DecisionError> {
        if self.hand.len() != HAND_SIZE {
            return Err(HandError::WrongSize {
                expected: HAND_SIZE,
                actual: self.hand.len(),
            }
            .into());
        }
        ensure_distinct(self.hand)?;
        if self.hand.contains(&self.up_card) {
            return Err(DecisionError::UpCardInHand(self.up_card));
        }
        Ok(())
    }
}

/// Everything a seat knows when choosing a card during trick play.
#[derive(Debug, Clone, Copy)]
pub struct BotContext<'a> {
    pub seat: PlayerPosition,
    pub hand: &'a [Card],
    pub trump: Suit,
    /// Cards already on the table this trick, in play order.
    pub current: &'a [Play],
    pub completed: &'a [Trick],
    pub caller: PlayerPosition,
    pub going_alone: bool,
    /// Tricks taken so far by the calling team.
    pub team_tricks_won: u8,
}

impl<'a> BotContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seat: PlayerPosition,
        hand: &'a [Card],
        trump: Suit,
        current: &'a [Play],
        completed: &'a [Trick],
        caller: PlayerPosition,
        going_alone: bool,
        team_tricks_won: u8,
    ) -> Self {
        Self {
            seat,
            hand,
            trump,
            current,
            completed,
            caller,
            going_alone,
            team_tricks_won,
        }
    }

    pub fn is_leading(&self) -> bool {
        self.current.is_empty()
    }

    pub fn trick_number(&self) -> usize {
        self.completed.len() + 1
    }

    pub fn seat_called(&self) -> bool {
        self.caller == self.seat
    }

    pub fn partner_called(&self) -> bool {
        self.caller == self.seat.partner()
    }

    pub fn opponent_called(&self) -> bool {
        self.caller.team() != self.seat.team()
    }

    /// True only for the lone caller itself.
    pub fn playing_alone(&self) -> bool {
        self.going_alone && self.seat_called()
    }

    pub fn players_in_trick(&self) -> usize {
        if self.going_alone { 3 } else { 4 }
    }

    pub fn is_last_to_act(&self) -> bool {
        self.current.len() + 1 == self.players_in_trick()
    }

    /// Whether any earlier trick was opened with a trump card.
    pub fn trump_led_before(&self) -> bool {
        self.completed.iter().any(|trick| {
            trick
                .plays()
                .first()
                .is_some_and(|lead| lead.card.is_trump(self.trump))
        })
    }

    pub fn tracker(&self) -> BossTracker {
        BossTracker::from_tricks(self.trump, self.completed)
    }

    pub fn validate(&self) -> Result<(), DecisionError> {
        if self.hand.is_empty() {
            return Err(DecisionError::EmptyHand);
        }
        ensure_distinct(self.hand)?;
        let played = self
            .completed
            .iter()
            .flat_map(|trick| trick.plays().iter())
            .chain(self.current.iter());
        for play in played {
            if self.hand.contains(&play.card) {
                return Err(DecisionError::AlreadyPlayed(play.card));
            }
        }
        Ok(())
    }
}
