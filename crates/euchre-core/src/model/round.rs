use crate::model::call::{CallRound, TrumpCall};
use crate::model::card::Card;
use crate::model::deck::{Deck, DeckError};
use crate::model::hand::{Hand, HandError, ensure_distinct};
use crate::model::player::{PlayerPosition, Team};
use crate::model::score::{RoundPoints, TRICKS_PER_ROUND, score_round};
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use std::array;
use thiserror::Error;

pub const HAND_SIZE: usize = 5;

/// One deal: bidding, the dealer's pickup, then five tricks.
#[derive(Debug, Clone)]
pub struct RoundState {
    dealer: PlayerPosition,
    up_card: Card,
    hands: [Hand; 4],
    phase: RoundPhase,
    call: Option<TrumpCall>,
    discarded: Option<Card>,
    current_trick: Trick,
    trick_history: Vec<Trick>,
    tricks_won: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Calling,
    /// Up-card ordered up; the dealer holds six cards until discarding.
    Discarding,
    Playing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted { winner: PlayerPosition },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("trump has already been settled for this round")]
    AlreadyCalled,
    #[error("round 1 can only order up {up_suit}, not {called}")]
    NotUpCardSuit { up_suit: Suit, called: Suit },
    #[error("{0} was turned down and cannot be named in round 2")]
    TurnedDown(Suit),
    #[error("no dealer discard is pending")]
    NoDiscardPending,
    #[error("dealer does not hold {0}")]
    DiscardNotInHand(Card),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("round is not in the play phase")]
    NotInPlayPhase,
    #[error("card {0} is not in hand")]
    CardNotInHand(Card),
    #[error("must follow {0}")]
    MustFollowSuit(Suit),
    #[error(transparent)]
    Trick(#[from] TrickError),
}

impl RoundState {
    /// Deal five cards to each seat starting left of the dealer, then turn the up-card.
    pub fn deal(deck: &mut Deck, dealer: PlayerPosition) -> Result<Self, DeckError> {
        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        for seat in PlayerPosition::order_from_dealer(dealer) {
            hands[seat.index()] = Hand::with_cards(deck.draw(HAND_SIZE)?);
        }
        let up_card = deck
            .draw(1)?
            .into_iter()
            .next()
            .ok_or(DeckError::Exhausted {
                wanted: 1,
                remaining: 0,
            })?;
        Ok(Self::new_unchecked(dealer, hands, up_card))
    }

    /// Build a round from known hands. Every hand must hold five cards and no
    /// card may appear twice across the hands and the up-card.
    pub fn from_hands(
        dealer: PlayerPosition,
        hands: [Hand; 4],
        up_card: Card,
    ) -> Result<Self, HandError> {
        let mut all = Vec::with_capacity(HAND_SIZE * 4 + 1);
        for hand in &hands {
            if hand.len() != HAND_SIZE {
                return Err(HandError::WrongSize {
                    expected: HAND_SIZE,
                    actual: hand.len(),
                });
            }
            all.extend_from_slice(hand.cards());
        }
        all.push(up_card);
        ensure_distinct(&all)?;
        Ok(Self::new_unchecked(dealer, hands, up_card))
    }

    fn new_unchecked(dealer: PlayerPosition, hands: [Hand; 4], up_card: Card) -> Self {
        Self {
            dealer,
            up_card,
            hands,
            phase: RoundPhase::Calling,
            call: None,
            discarded: None,
            current_trick: Trick::new(dealer.next()),
            trick_history: Vec::with_capacity(TRICKS_PER_ROUND as usize),
            tricks_won: [0; 2],
        }
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.dealer
    }

    pub fn up_card(&self) -> Card {
        self.up_card
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn call(&self) -> Option<&TrumpCall> {
        self.call.as_ref()
    }

    pub fn trump(&self) -> Option<Suit> {
        self.call.map(|call| call.trump)
    }

    pub fn discarded(&self) -> Option<Card> {
        self.discarded
    }

    pub fn sitting_out(&self) -> Option<PlayerPosition> {
        self.call.and_then(|call| call.sitting_out())
    }

    /// Seats taking part in play, in table order from the dealer's left.
    pub fn active_seats(&self) -> Vec<PlayerPosition> {
        let sitting_out = self.sitting_out();
        PlayerPosition::order_from_dealer(self.dealer)
            .into_iter()
            .filter(|seat| Some(*seat) != sitting_out)
            .collect()
    }

    pub fn hand(&self, seat: PlayerPosition) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn tricks_won(&self, team: Team) -> u8 {
        self.tricks_won[team.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RoundPhase::Complete
    }

    pub fn apply_call(&mut self, call: TrumpCall) -> Result<(), CallError> {
        if self.phase != RoundPhase::Calling {
            return Err(CallError::AlreadyCalled);
        }
        let up_suit = self.up_card.suit;
        match call.round {
            CallRound::One if call.trump != up_suit => {
                return Err(CallError::NotUpCardSuit {
                    up_suit,
                    called: call.trump,
                });
            }
            CallRound::Two if call.trump == up_suit => {
                return Err(CallError::TurnedDown(up_suit));
            }
            _ => {}
        }

        self.call = Some(call);
        match call.round {
            CallRound::One => {
                self.hands[self.dealer.index()].add(self.up_card);
                self.phase = RoundPhase::Discarding;
            }
            CallRound::Two => self.start_play(),
        }
        Ok(())
    }

    /// Dealer buries one card after the up-card was ordered up.
    pub fn discard(&mut self, card: Card) -> Result<(), CallError> {
        if self.phase != RoundPhase::Discarding {
            return Err(CallError::NoDiscardPending);
        }
        if !self.hands[self.dealer.index()].remove(card) {
            return Err(CallError::DiscardNotInHand(card));
        }
        self.discarded = Some(card);
        self.start_play();
        Ok(())
    }

    fn start_play(&mut self) {
        let sitting_out = self.sitting_out();
        let leader = PlayerPosition::order_from_dealer(self.dealer)
            .into_iter()
            .find(|seat| Some(*seat) != sitting_out)
            .unwrap_or(self.dealer.next());
        self.current_trick = Trick::with_sitting_out(leader, sitting_out);
        self.phase = RoundPhase::Playing;
    }

    /// Cards `seat` may play now: the led suit if it can follow, else anything.
    pub fn legal_cards(&self, seat: PlayerPosition) -> Vec<Card> {
        let hand = self.hand(seat);
        let (Some(trump), Some(lead)) = (self.trump(), self.current_lead_suit()) else {
            return hand.cards().to_vec();
        };
        let following: Vec<Card> = hand
            .iter()
            .copied()
            .filter(|card| card.effective_suit(trump) == lead)
            .collect();
        if following.is_empty() {
            hand.cards().to_vec()
        } else {
            following
        }
    }

    fn current_lead_suit(&self) -> Option<Suit> {
        self.trump()
            .and_then(|trump| self.current_trick.lead_suit(trump))
    }

    pub fn play_card(
        &mut self,
        seat: PlayerPosition,
        card: Card,
    ) -> Result<PlayOutcome, PlayError> {
        let (RoundPhase::Playing, Some(trump)) = (self.phase, self.trump()) else {
            return Err(PlayError::NotInPlayPhase);
        };

        let hand = &self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(PlayError::CardNotInHand(card));
        }

        if let Some(lead) = self.current_trick.lead_suit(trump) {
            let can_follow = hand.iter().any(|c| c.effective_suit(trump) == lead);
            if can_follow && card.effective_suit(trump) != lead {
                return Err(PlayError::MustFollowSuit(lead));
            }
        }

        self.current_trick.play(seat, card)?;
        self.hands[seat.index()].remove(card);

        let Some(winner) = self.current_trick.winner(trump) else {
            return Ok(PlayOutcome::Played);
        };

        self.tricks_won[winner.team().index()] += 1;
        let next = Trick::with_sitting_out(winner, self.sitting_out());
        let finished = std::mem::replace(&mut self.current_trick, next);
        self.trick_history.push(finished);
        if self.trick_history.len() == TRICKS_PER_ROUND as usize {
            self.phase = RoundPhase::Complete;
        }
        Ok(PlayOutcome::TrickCompleted { winner })
    }

    /// Points for the finished round; `None` until all five tricks are in.
    pub fn points(&self) -> Option<RoundPoints> {
        let call = self.call?;
        if !self.is_complete() {
            return None;
        }
        score_round(
            self.tricks_won[Team::One.index()],
            self.tricks_won[Team::Two.index()],
            call.caller.team(),
            call.going_alone,
        )
        .ok()
    }
}
