use super::Policy;
use crate::bot::{
    BotContext, BotParams, CallContext, CallPlan, CallPlanner, DecisionError, PlayChoice,
    PlayPlanner, worst_card,
};
use euchre_core::model::call::CallDecision;
use euchre_core::model::card::Card;
use euchre_core::model::hand::ensure_distinct;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::suit::Suit;
use tracing::{Level, event};

/// Adapter that wraps CallPlanner/PlayPlanner to implement the Policy trait
#[derive(Debug, Clone, Default)]
pub struct HeuristicPolicy {
    params: BotParams,
}

impl HeuristicPolicy {
    pub fn new(params: BotParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }
}

impl Policy for HeuristicPolicy {
    fn choose_call(&mut self, ctx: &CallContext<'_>) -> Result<CallDecision, DecisionError> {
        let plan = CallPlanner::plan(ctx, &self.params)?;
        log_call_decision(ctx, &plan);
        Ok(plan.decision)
    }

    fn choose_discard(
        &mut self,
        seat: PlayerPosition,
        hand: &[Card],
        trump: Suit,
    ) -> Result<Card, DecisionError> {
        ensure_distinct(hand)?;
        let card = worst_card(hand, trump).ok_or(DecisionError::EmptyHand)?;
        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "euchre_bot::call",
                Level::DEBUG,
                seat = %seat,
                trump = %trump,
                hand_size = hand.len(),
                discard = %card,
                reason = "dealer_discard",
            );
        }
        Ok(card)
    }

    fn choose_play(&mut self, ctx: &BotContext<'_>) -> Result<Card, DecisionError> {
        let choice = PlayPlanner::plan(ctx)?;
        log_play_decision(ctx, &choice);
        Ok(choice.card)
    }
}

fn log_call_decision(ctx: &CallContext<'_>, plan: &CallPlan) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    event!(
        target: "euchre_bot::call",
        Level::DEBUG,
        seat = %ctx.seat,
        position = %ctx.position(),
        round = ctx.round.number(),
        up_card = %ctx.up_card,
        candidate = %plan.candidate,
        score = plan.score,
        margin = plan.margin,
        decision = %plan.decision,
        alone = plan.decision.going_alone,
        reason = plan.reason.as_str(),
    );
}

fn log_play_decision(ctx: &BotContext<'_>, choice: &PlayChoice) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let hand_preview = ctx
        .hand
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(",");

    event!(
        target: "euchre_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        trick = ctx.trick_number(),
        trump = %ctx.trump,
        hand = %hand_preview,
        trick_cards = ctx.current.len(),
        chosen = %choice.card,
        reason = choice.reason.as_str(),
    );
}
