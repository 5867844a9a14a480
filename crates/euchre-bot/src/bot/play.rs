use super::discard::worst_card;
use super::tracker::BossTracker;
use super::{BotContext, DecisionError};
use euchre_core::model::card::Card;
use euchre_core::model::hand::{off_suit_cards, trump_cards};
use euchre_core::model::ranking::{highest, lowest, rank_strength};
use euchre_core::model::trick::{lead_suit, winning_play};

/// Lead priorities, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadRule {
    /// Holding the top trump and an off-suit boss.
    TopTrumpWithBoss,
    /// Fourth trick with one trump and one off-suit card left.
    EndgameSplit,
    PartnerCalled,
    CallerTopTrump,
    CallerDrawTrump,
    LonerOffSuit,
    DefendWithTrump,
    OffSuitBoss,
    ShedWorst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowRule {
    PartnerHolds,
    CheapestWinner,
    Duck,
    SecureWithTrump,
    Ruff,
    Overtrump,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayReason {
    OnlyCard,
    Lead(LeadRule),
    Follow(FollowRule),
}

impl PlayReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayReason::OnlyCard => "only_card",
            PlayReason::Lead(rule) => match rule {
                LeadRule::TopTrumpWithBoss => "lead_top_trump_with_boss",
                LeadRule::EndgameSplit => "lead_endgame_split",
                LeadRule::PartnerCalled => "lead_partner_called",
                LeadRule::CallerTopTrump => "lead_caller_top_trump",
                LeadRule::CallerDrawTrump => "lead_caller_draw_trump",
                LeadRule::LonerOffSuit => "lead_loner_off_suit",
                LeadRule::DefendWithTrump => "lead_defend_with_trump",
                LeadRule::OffSuitBoss => "lead_off_suit_boss",
                LeadRule::ShedWorst => "lead_shed_worst",
            },
            PlayReason::Follow(rule) => match rule {
                FollowRule::PartnerHolds => "follow_partner_holds",
                FollowRule::CheapestWinner => "follow_cheapest_winner",
                FollowRule::Duck => "follow_duck",
                FollowRule::SecureWithTrump => "follow_secure_with_trump",
                FollowRule::Ruff => "follow_ruff",
                FollowRule::Overtrump => "follow_overtrump",
                FollowRule::Discard => "follow_discard",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayChoice {
    pub card: Card,
    pub reason: PlayReason,
}

impl PlayChoice {
    fn lead(card: Option<Card>, rule: LeadRule) -> Option<Self> {
        card.map(|card| Self {
            card,
            reason: PlayReason::Lead(rule),
        })
    }

    fn follow(card: Option<Card>, rule: FollowRule) -> Option<Self> {
        card.map(|card| Self {
            card,
            reason: PlayReason::Follow(rule),
        })
    }
}

/// Trump and boss facts about the hand, computed once per decision.
struct HandView {
    trumps: Vec<Card>,
    off_suit: Vec<Card>,
    off_bosses: Vec<Card>,
    holds_top_trump: bool,
}

impl HandView {
    fn new(ctx: &BotContext<'_>, tracker: &BossTracker) -> Self {
        let holds_top_trump = tracker
            .boss(ctx.trump)
            .is_some_and(|boss| ctx.hand.contains(&boss));
        Self {
            trumps: trump_cards(ctx.hand, ctx.trump),
            off_suit: off_suit_cards(ctx.hand, ctx.trump),
            off_bosses: tracker.off_suit_bosses_in(ctx.hand),
            holds_top_trump,
        }
    }
}

pub struct PlayPlanner;

impl PlayPlanner {
    pub fn choose(ctx: &BotContext<'_>) -> Result<Card, DecisionError> {
        Ok(Self::plan(ctx)?.card)
    }

    pub fn plan(ctx: &BotContext<'_>) -> Result<PlayChoice, DecisionError> {
        ctx.validate()?;
        if let [only] = ctx.hand {
            return Ok(PlayChoice {
                card: *only,
                reason: PlayReason::OnlyCard,
            });
        }

        let tracker = ctx.tracker();
        let choice = if ctx.is_leading() {
            Self::lead(ctx, &tracker)
        } else {
            Self::follow(ctx, &tracker)
        };
        choice.ok_or(DecisionError::EmptyHand)
    }

    fn lead(ctx: &BotContext<'_>, tracker: &BossTracker) -> Option<PlayChoice> {
        let view = HandView::new(ctx, tracker);
        Self::lead_top_trump_with_boss(ctx, &view)
            .or_else(|| Self::lead_endgame_split(ctx, &view))
            .or_else(|| Self::lead_for_partner(ctx, &view))
            .or_else(|| Self::lead_as_caller(ctx, &view))
            .or_else(|| Self::lead_as_defender(ctx, &view))
            .or_else(|| {
                PlayChoice::lead(highest(&view.off_bosses, ctx.trump, None), LeadRule::OffSuitBoss)
            })
            .or_else(|| PlayChoice::lead(worst_card(ctx.hand, ctx.trump), LeadRule::ShedWorst))
    }

    fn lead_top_trump_with_boss(ctx: &BotContext<'_>, view: &HandView) -> Option<PlayChoice> {
        let entitled = ctx.seat_called()
            || ctx.partner_called()
            || (ctx.opponent_called() && ctx.trump_led_before());
        if view.holds_top_trump && !view.off_bosses.is_empty() && entitled {
            return PlayChoice::lead(
                highest(&view.trumps, ctx.trump, None),
                LeadRule::TopTrumpWithBoss,
            );
        }
        None
    }

    fn lead_endgame_split(ctx: &BotContext<'_>, view: &HandView) -> Option<PlayChoice> {
        if ctx.completed.len() != 3 || ctx.hand.len() != 2 || view.trumps.len() != 1 {
            return None;
        }
        let secured = ctx.team_tricks_won >= 3;
        let card = if ctx.playing_alone() && secured {
            view.trumps.first().copied()
        } else {
            lowest(ctx.hand, ctx.trump, None)
        };
        PlayChoice::lead(card, LeadRule::EndgameSplit)
    }

    fn lead_for_partner(ctx: &BotContext<'_>, view: &HandView) -> Option<PlayChoice> {
        if !ctx.partner_called() || view.trumps.is_empty() {
            return None;
        }
        let still_worth_it =
            !ctx.trump_led_before() || (view.trumps.len() > 1 && !view.off_bosses.is_empty());
        if !still_worth_it {
            return None;
        }
        PlayChoice::lead(highest(&view.trumps, ctx.trump, None), LeadRule::PartnerCalled)
    }

    fn lead_as_caller(ctx: &BotContext<'_>, view: &HandView) -> Option<PlayChoice> {
        if !ctx.seat_called() {
            return None;
        }
        if view.holds_top_trump {
            return PlayChoice::lead(
                highest(&view.trumps, ctx.trump, None),
                LeadRule::CallerTopTrump,
            );
        }
        if view.trumps.len() > 1 {
            let card = if ctx.going_alone {
                highest(&view.trumps, ctx.trump, None)
            } else {
                lowest(&view.trumps, ctx.trump, None)
            };
            return PlayChoice::lead(card, LeadRule::CallerDrawTrump);
        }
        if ctx.going_alone {
            return PlayChoice::lead(highest(&view.off_suit, ctx.trump, None), LeadRule::LonerOffSuit);
        }
        None
    }

    fn lead_as_defender(ctx: &BotContext<'_>, view: &HandView) -> Option<PlayChoice> {
        if !ctx.opponent_called() || view.off_bosses.is_empty() || view.trumps.len() < 3 {
            return None;
        }
        let card = if view.holds_top_trump {
            highest(&view.trumps, ctx.trump, None)
        } else {
            lowest(&view.trumps, ctx.trump, None)
        };
        PlayChoice::lead(card, LeadRule::DefendWithTrump)
    }

    fn follow(ctx: &BotContext<'_>, tracker: &BossTracker) -> Option<PlayChoice> {
        let trump = ctx.trump;
        let lead = lead_suit(ctx.current, trump)?;
        let winner = winning_play(ctx.current, trump)?;
        let winner_strength = rank_strength(winner.card, trump, Some(lead));
        let partner_winning = winner.position == ctx.seat.partner();
        let last = ctx.is_last_to_act();
        let beats = |card: &Card| rank_strength(*card, trump, Some(lead)) > winner_strength;

        let following: Vec<Card> = ctx
            .hand
            .iter()
            .copied()
            .filter(|card| card.effective_suit(trump) == lead)
            .collect();
        if !following.is_empty() {
            let low = lowest(&following, trump, Some(lead));
            if partner_winning && (last || tracker.is_boss(winner.card)) {
                return PlayChoice::follow(low, FollowRule::PartnerHolds);
            }
            let winners: Vec<Card> = following.iter().copied().filter(beats).collect();
            if !winners.is_empty() {
                return PlayChoice::follow(
                    lowest(&winners, trump, Some(lead)),
                    FollowRule::CheapestWinner,
                );
            }
            return PlayChoice::follow(low, FollowRule::Duck);
        }

        let worst = worst_card(ctx.hand, trump);
        let trumps = trump_cards(ctx.hand, trump);
        let trump_on_table = ctx.current.iter().any(|play| play.card.is_trump(trump));

        if !trump_on_table {
            if trumps.is_empty() {
                return PlayChoice::follow(worst, FollowRule::Discard);
            }
            let small = lowest(&trumps, trump, None);
            if !partner_winning {
                return PlayChoice::follow(small, FollowRule::Ruff);
            }
            if !last && !tracker.is_boss(winner.card) {
                return PlayChoice::follow(small, FollowRule::SecureWithTrump);
            }
            return PlayChoice::follow(worst, FollowRule::PartnerHolds);
        }

        if partner_winning {
            return PlayChoice::follow(worst, FollowRule::PartnerHolds);
        }
        let overtrumps: Vec<Card> = trumps.iter().copied().filter(beats).collect();
        if !overtrumps.is_empty() {
            return PlayChoice::follow(lowest(&overtrumps, trump, None), FollowRule::Overtrump);
        }
        PlayChoice::follow(worst, FollowRule::Discard)
    }
}
