pub mod bot;
pub mod policy;

pub use bot::{
    BossTracker, BotContext, BotParams, CallContext, CallPlan, CallPlanner, DecisionError,
    HandScore, PlayChoice, PlayPlanner, PlayReason, evaluate_hand, worst_card,
};
pub use policy::{HeuristicPolicy, Policy};

use euchre_core::model::call::{CallDecision, CallRound};
use euchre_core::model::card::Card;
use euchre_core::model::hand::ensure_distinct;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::suit::Suit;

/// Bid for `seat` with default parameters.
pub fn call_trump(
    hand: &[Card],
    seat: PlayerPosition,
    dealer: PlayerPosition,
    up_card: Card,
    round: CallRound,
) -> Result<CallDecision, DecisionError> {
    let ctx = CallContext::new(seat, hand, dealer, up_card, round);
    CallPlanner::decide(&ctx, &BotParams::default())
}

/// The card to drop from `hand` if `trump` were trump.
pub fn choose_discard(hand: &[Card], trump: Suit) -> Result<Card, DecisionError> {
    ensure_distinct(hand)?;
    worst_card(hand, trump).ok_or(DecisionError::EmptyHand)
}

pub fn choose_card(ctx: &BotContext<'_>) -> Result<Card, DecisionError> {
    PlayPlanner::choose(ctx)
}
