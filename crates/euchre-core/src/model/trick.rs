use crate::model::card::Card;
use crate::model::player::PlayerPosition;
use crate::model::ranking::rank_strength;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Trick {
    leader: PlayerPosition,
    sitting_out: Option<PlayerPosition>,
    plays: Vec<Play>,
}

/// A card as played by a seat. Order inside a trick is play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub position: PlayerPosition,
    pub card: Card,
}

impl Play {
    pub const fn new(position: PlayerPosition, card: Card) -> Self {
        Self { position, card }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(PlayerPosition),
    #[error("{0} is sitting out this hand")]
    SittingOut(PlayerPosition),
}

impl Trick {
    pub fn new(leader: PlayerPosition) -> Self {
        Self::with_sitting_out(leader, None)
    }

    /// A trick in which `sitting_out` (the partner of a lone caller) does not play.
    pub fn with_sitting_out(leader: PlayerPosition, sitting_out: Option<PlayerPosition>) -> Self {
        Self {
            leader,
            sitting_out,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> PlayerPosition {
        self.leader
    }

    pub fn sitting_out(&self) -> Option<PlayerPosition> {
        self.sitting_out
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    /// Number of cards that complete this trick: 3 when someone sits out.
    pub fn size(&self) -> usize {
        if self.sitting_out.is_some() { 3 } else { 4 }
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == self.size()
    }

    /// Suit led, with a led left bower counting as trump.
    pub fn lead_suit(&self, trump: Suit) -> Option<Suit> {
        lead_suit(&self.plays, trump)
    }

    pub fn play(&mut self, position: PlayerPosition, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.sitting_out == Some(position) {
            return Err(TrickError::SittingOut(position));
        }

        if self.plays.iter().any(|play| play.position == position) {
            return Err(TrickError::AlreadyPlayed(position));
        }

        let expected = self.expected_position();
        if expected != position {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: position,
            });
        }

        self.plays.push(Play { position, card });
        Ok(())
    }

    /// Play currently holding the trick, complete or not.
    pub fn current_winner(&self, trump: Suit) -> Option<Play> {
        winning_play(&self.plays, trump)
    }

    pub fn winner(&self, trump: Suit) -> Option<PlayerPosition> {
        if !self.is_complete() {
            return None;
        }
        resolve_trick(trump, &self.plays)
    }

    pub fn expected_position(&self) -> PlayerPosition {
        let mut next = self
            .plays
            .last()
            .map(|play| play.position.next())
            .unwrap_or(self.leader);
        if Some(next) == self.sitting_out {
            next = next.next();
        }
        next
    }
}

pub fn lead_suit(plays: &[Play], trump: Suit) -> Option<Suit> {
    plays.first().map(|play| play.card.effective_suit(trump))
}

pub fn winning_play(plays: &[Play], trump: Suit) -> Option<Play> {
    let lead = lead_suit(plays, trump)?;
    plays
        .iter()
        .copied()
        .max_by_key(|play| rank_strength(play.card, trump, Some(lead)))
}

/// Seat that takes a trick: highest strength relative to the led suit.
pub fn resolve_trick(trump: Suit, plays: &[Play]) -> Option<PlayerPosition> {
    winning_play(plays, trump).map(|play| play.position)
}
