//! Deal drivers shared by the forced-EV batches and the call-rate survey.

mod forced;

pub use forced::{BatchSummary, ForcedBatch, ForcedScenario, TrialOutcome};

use euchre_bot::{BotContext, CallContext, DecisionError, Policy};
use euchre_core::model::call::{CallAction, CallDecision, CallRound, TrumpCall};
use euchre_core::model::card::Card;
use euchre_core::model::deck::DeckError;
use euchre_core::model::hand::HandError;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::round::{CallError, PlayError, RoundPhase, RoundState};
use euchre_core::model::score::RoundPoints;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// One bid replaced by a fixed decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidOverride {
    pub seat: PlayerPosition,
    pub round: CallRound,
    pub decision: CallDecision,
}

impl BidOverride {
    pub fn from_action(
        seat: PlayerPosition,
        round: CallRound,
        action: CallAction,
        going_alone: bool,
        up_card: Card,
    ) -> Result<Self, RunnerError> {
        if !action.allowed_in(round) {
            return Err(RunnerError::ActionNotAllowed { action, round });
        }
        let decision = match action.trump_for(up_card) {
            Some(trump) => CallDecision::call(trump, going_alone),
            None => CallDecision::PASS,
        };
        Ok(Self {
            seat,
            round,
            decision,
        })
    }
}

/// How bidding ended for one deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bidding {
    pub call: Option<TrumpCall>,
    /// The override seat was reached in its round.
    pub override_applied: bool,
}

/// Run both bidding rounds from the dealer's left, stopping at the first call.
///
/// A round-1 call adds the up-card to the dealer's hand and asks the policy
/// for the dealer's discard before returning.
pub fn settle_trump<P: Policy + ?Sized>(
    round: &mut RoundState,
    policy: &mut P,
    forced: Option<&BidOverride>,
) -> Result<Bidding, RunnerError> {
    let dealer = round.dealer();
    let up_card = round.up_card();
    let mut override_applied = false;

    for bidding in CallRound::BOTH {
        for seat in PlayerPosition::order_from_dealer(dealer) {
            let decision = match forced {
                Some(forced) if forced.seat == seat && forced.round == bidding => {
                    override_applied = true;
                    forced.decision
                }
                _ => {
                    let hand = round.hand(seat).cards().to_vec();
                    let ctx = CallContext::new(seat, &hand, dealer, up_card, bidding);
                    policy.choose_call(&ctx)?
                }
            };

            let Some(trump) = decision.trump else {
                continue;
            };
            let call = TrumpCall::new(trump, seat, decision.going_alone, bidding);
            round.apply_call(call)?;
            if round.phase() == RoundPhase::Discarding {
                let hand = round.hand(dealer).cards().to_vec();
                let card = policy.choose_discard(dealer, &hand, trump)?;
                round.discard(card)?;
            }
            return Ok(Bidding {
                call: Some(call),
                override_applied,
            });
        }
    }

    Ok(Bidding {
        call: None,
        override_applied,
    })
}

/// Play all five tricks with `policy` in every active seat.
///
/// `forced_lead` replaces the first card of trick one when the leader holds it.
/// `after_trick` sees the round after each completed trick.
pub fn play_out<P, F>(
    round: &mut RoundState,
    policy: &mut P,
    forced_lead: Option<Card>,
    mut after_trick: F,
) -> Result<RoundPoints, RunnerError>
where
    P: Policy + ?Sized,
    F: FnMut(&RoundState),
{
    let call = *round.call().ok_or(RunnerError::NoCall)?;
    let caller_team = call.caller.team();

    while !round.is_complete() {
        let seat = round.current_trick().expected_position();
        let opening = round.tricks_completed() == 0 && round.current_trick().plays().is_empty();
        let card = match forced_lead {
            Some(lead) if opening && round.hand(seat).contains(lead) => lead,
            _ => {
                let hand = round.hand(seat).cards().to_vec();
                let ctx = BotContext::new(
                    seat,
                    &hand,
                    call.trump,
                    round.current_trick().plays(),
                    round.trick_history(),
                    call.caller,
                    call.going_alone,
                    round.tricks_won(caller_team),
                );
                policy.choose_play(&ctx)?
            }
        };

        let completed_before = round.tricks_completed();
        round.play_card(seat, card)?;
        if round.tricks_completed() > completed_before {
            after_trick(round);
        }
    }

    round.points().ok_or(RunnerError::Incomplete)
}

pub(crate) fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{action} cannot be forced in round {}", .round.number())]
    ActionNotAllowed { action: CallAction, round: CallRound },
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("invalid hand: {0}")]
    Hand(#[from] HandError),
    #[error("invalid call: {0}")]
    Call(#[from] CallError),
    #[error("invalid play: {0}")]
    Play(#[from] PlayError),
    #[error("bot decision failed: {0}")]
    Decision(#[from] DecisionError),
    #[error("round has no trump call")]
    NoCall,
    #[error("round ended without a score")]
    Incomplete,
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize trace row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
