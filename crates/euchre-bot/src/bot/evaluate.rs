//! Hand strength for a candidate trump suit, as a weighted blend of trump
//! quality, off-suit aces and short suits.

use super::params::{
    ACE_NORMALIZER, ACE_SINGLE_SUIT_BONUS, ACE_TRUMP_SUPPORT_BONUS, ACE_TRUMP_VALUE,
    BOTH_BOWERS_BONUS, BotParams, KING_TRUMP_VALUE, LEFT_BOWER_VALUE, NINE_TRUMP_VALUE,
    QUEEN_TRUMP_VALUE, RIGHT_BOWER_VALUE, TEN_TRUMP_VALUE, TRUMP_NORMALIZER,
    VULNERABLE_ACE_VALUE, ace_length_multiplier, trump_count_multiplier,
};
use euchre_core::model::card::Card;
use euchre_core::model::rank::Rank;
use euchre_core::model::suit::Suit;

/// Component scores for one hand and trump candidate, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandScore {
    pub trump: f64,
    pub aces: f64,
    pub voids: f64,
    pub total: f64,
}

impl HandScore {
    pub fn evaluate(cards: &[Card], trump: Suit, params: &BotParams) -> Self {
        let trump_score = trump_strength(cards, trump);
        let aces = ace_strength(cards, trump);
        let voids = void_strength(cards, trump);
        Self {
            trump: trump_score,
            aces,
            voids,
            total: trump_score * params.trump_weight
                + aces * params.aces_weight
                + voids * params.voids_weight,
        }
    }
}

pub fn evaluate_hand(cards: &[Card], trump: Suit) -> f64 {
    HandScore::evaluate(cards, trump, &BotParams::default()).total
}

fn trump_card_value(card: Card, trump: Suit) -> f64 {
    if card.is_right_bower(trump) {
        return RIGHT_BOWER_VALUE;
    }
    if card.is_left_bower(trump) {
        return LEFT_BOWER_VALUE;
    }
    match card.rank {
        Rank::Ace => ACE_TRUMP_VALUE,
        Rank::King => KING_TRUMP_VALUE,
        Rank::Queen => QUEEN_TRUMP_VALUE,
        Rank::Ten => TEN_TRUMP_VALUE,
        Rank::Nine => NINE_TRUMP_VALUE,
        Rank::Jack => RIGHT_BOWER_VALUE,
    }
}

pub fn trump_strength(cards: &[Card], trump: Suit) -> f64 {
    let trumps: Vec<Card> = cards.iter().copied().filter(|c| c.is_trump(trump)).collect();
    let sum: f64 = trumps.iter().map(|c| trump_card_value(*c, trump)).sum();

    let mut multiplier = trump_count_multiplier(trumps.len());
    let has_right = trumps.iter().any(|c| c.is_right_bower(trump));
    let has_left = trumps.iter().any(|c| c.is_left_bower(trump));
    if has_right && has_left {
        multiplier += BOTH_BOWERS_BONUS;
    }

    (sum * multiplier / TRUMP_NORMALIZER).min(1.0)
}

/// Off-suit lengths indexed by suit, ignoring trump (including the left bower).
fn off_suit_lengths(cards: &[Card], trump: Suit) -> [usize; 4] {
    let mut lengths = [0usize; 4];
    for card in cards.iter().filter(|c| !c.is_trump(trump)) {
        lengths[card.suit.index()] += 1;
    }
    lengths
}

pub fn ace_strength(cards: &[Card], trump: Suit) -> f64 {
    let lengths = off_suit_lengths(cards, trump);
    let trump_count = cards.iter().filter(|c| c.is_trump(trump)).count();

    let mut aces = 0usize;
    let mut sum = 0.0;
    for card in cards
        .iter()
        .filter(|c| !c.is_trump(trump) && c.rank == Rank::Ace)
    {
        aces += 1;
        let base = if card.suit == trump.partner() {
            VULNERABLE_ACE_VALUE
        } else {
            1.0
        };
        sum += base * ace_length_multiplier(lengths[card.suit.index()]);
    }

    if trump_count >= 3 && aces > 0 {
        sum *= ACE_TRUMP_SUPPORT_BONUS;
        let off_suits = lengths.iter().filter(|len| **len > 0).count();
        if off_suits == 1 {
            sum *= ACE_SINGLE_SUIT_BONUS;
        }
    }

    (sum / ACE_NORMALIZER).min(1.0)
}

pub fn void_strength(cards: &[Card], trump: Suit) -> f64 {
    let trump_count = cards.iter().filter(|c| c.is_trump(trump)).count();
    if trump_count == 0 {
        return 0.0;
    }
    let off_suits = off_suit_lengths(cards, trump)
        .iter()
        .filter(|len| **len > 0)
        .count();
    match off_suits {
        0 => 1.0,
        1 if trump_count == 3 => 1.0,
        1 => 0.9,
        2 => 0.15,
        _ => 0.0,
    }
}
