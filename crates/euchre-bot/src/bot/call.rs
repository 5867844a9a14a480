use super::discard::after_pickup;
use super::evaluate::HandScore;
use super::params::{BotParams, Threshold};
use super::{CallContext, DecisionError};
use euchre_core::model::call::{CallDecision, CallRound};
use euchre_core::model::card::Card;
use euchre_core::model::player::SeatPosition;
use euchre_core::model::rank::Rank;
use euchre_core::model::suit::Suit;

/// Which branch of the bidding logic produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallReason {
    BelowThreshold,
    ClearedThreshold,
    /// First seat passing round 1 to keep a stronger "next" call for round 2.
    HoldingForNext,
    DealerStuck,
}

impl CallReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            CallReason::BelowThreshold => "below_threshold",
            CallReason::ClearedThreshold => "cleared_threshold",
            CallReason::HoldingForNext => "holding_for_next",
            CallReason::DealerStuck => "dealer_stuck",
        }
    }
}

/// A bidding decision together with the numbers behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallPlan {
    pub decision: CallDecision,
    /// Best suit considered, whether or not it was called.
    pub candidate: Suit,
    pub score: f64,
    pub margin: f64,
    pub reason: CallReason,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    suit: Suit,
    score: f64,
    threshold: Threshold,
}

impl Candidate {
    fn new(cards: &[Card], suit: Suit, threshold: Threshold, params: &BotParams) -> Self {
        Self {
            suit,
            score: HandScore::evaluate(cards, suit, params).total,
            threshold,
        }
    }

    fn margin(&self) -> f64 {
        self.threshold.margin(self.score)
    }

    fn plan(&self, call: bool, going_alone: bool, reason: CallReason) -> CallPlan {
        let decision = if call {
            CallDecision::call(self.suit, going_alone)
        } else {
            CallDecision::PASS
        };
        CallPlan {
            decision,
            candidate: self.suit,
            score: self.score,
            margin: self.margin(),
            reason,
        }
    }
}

pub struct CallPlanner;

impl CallPlanner {
    pub fn decide(ctx: &CallContext<'_>, params: &BotParams) -> Result<CallDecision, DecisionError> {
        Ok(Self::plan(ctx, params)?.decision)
    }

    pub fn plan(ctx: &CallContext<'_>, params: &BotParams) -> Result<CallPlan, DecisionError> {
        ctx.validate()?;
        Ok(match ctx.round {
            CallRound::One => Self::round_one(ctx, params),
            CallRound::Two => Self::round_two(ctx, params),
        })
    }

    fn round_one(ctx: &CallContext<'_>, params: &BotParams) -> CallPlan {
        let position = ctx.position();
        let trump = ctx.up_card.suit;
        let threshold = params.round_one(position);

        let candidate = if ctx.is_dealer() {
            let kept = after_pickup(ctx.hand, ctx.up_card, trump);
            Candidate::new(&kept, trump, threshold, params)
        } else {
            Candidate::new(ctx.hand, trump, threshold, params)
        };

        if !threshold.calls(candidate.score) {
            return candidate.plan(false, false, CallReason::BelowThreshold);
        }

        if position == SeatPosition::First {
            let next = Candidate::new(
                ctx.hand,
                trump.partner(),
                params.round_two(position).next,
                params,
            );
            if next.margin() > candidate.margin() {
                return candidate.plan(false, false, CallReason::HoldingForNext);
            }
        }

        // No loner on a turned-up bower from first or third seat.
        let bower_up = ctx.up_card.rank == Rank::Jack
            && matches!(position, SeatPosition::First | SeatPosition::Third);
        let alone = threshold.goes_alone(candidate.score) && !bower_up;
        candidate.plan(true, alone, CallReason::ClearedThreshold)
    }

    fn round_two(ctx: &CallContext<'_>, params: &BotParams) -> CallPlan {
        let thresholds = params.round_two(ctx.position());
        let up_suit = ctx.up_card.suit;
        let [reverse1, reverse2] = up_suit.reverse_suits();

        let next = Candidate::new(ctx.hand, up_suit.partner(), thresholds.next, params);
        let first_reverse = Candidate::new(ctx.hand, reverse1, thresholds.reverse, params);
        let second_reverse = Candidate::new(ctx.hand, reverse2, thresholds.reverse, params);

        if ctx.is_dealer() {
            let mut best = next;
            for candidate in [first_reverse, second_reverse] {
                if candidate.margin() > best.margin() {
                    best = candidate;
                }
            }
            let alone = best.threshold.goes_alone(best.score);
            return best.plan(true, alone, CallReason::DealerStuck);
        }

        let reverse = if first_reverse.score >= second_reverse.score {
            first_reverse
        } else {
            second_reverse
        };
        let chosen = match (next.threshold.calls(next.score), reverse.threshold.calls(reverse.score)) {
            (true, true) if next.margin() >= reverse.margin() => next,
            (true, true) => reverse,
            (true, false) => next,
            (false, true) => reverse,
            (false, false) => {
                let best = if next.margin() >= reverse.margin() {
                    next
                } else {
                    reverse
                };
                return best.plan(false, false, CallReason::BelowThreshold);
            }
        };
        let alone = chosen.threshold.goes_alone(chosen.score);
        chosen.plan(true, alone, CallReason::ClearedThreshold)
    }
}
