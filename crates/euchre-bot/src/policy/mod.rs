mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::{BotContext, CallContext, DecisionError};
use euchre_core::model::call::CallDecision;
use euchre_core::model::card::Card;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::suit::Suit;

/// Unified interface for seat decision-making during one round.
pub trait Policy: Send {
    /// Bid or pass (called once per seat per bidding round).
    fn choose_call(&mut self, ctx: &CallContext<'_>) -> Result<CallDecision, DecisionError>;

    /// Card the dealer drops after picking up the up-card.
    fn choose_discard(
        &mut self,
        seat: PlayerPosition,
        hand: &[Card],
        trump: Suit,
    ) -> Result<Card, DecisionError>;

    /// Choose 1 card to play (called during trick play)
    fn choose_play(&mut self, ctx: &BotContext<'_>) -> Result<Card, DecisionError>;
}
