//! The single strength ordering used wherever one card must be compared
//! against another under a trump context.

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

pub const RIGHT_BOWER_STRENGTH: u8 = 25;
pub const LEFT_BOWER_STRENGTH: u8 = 24;
const TRUMP_BASE: u8 = 15;
const LEAD_BASE: u8 = 6;

/// Trump order once both bowers are removed.
pub const TRUMP_ORDER: [Rank; 5] = [Rank::Nine, Rank::Ten, Rank::Queen, Rank::King, Rank::Ace];

/// Strength of `card` given trump and (optionally) the suit that was led.
///
/// Right bower 25, left bower 24, other trump `15..=19`, lead suit `6..=11`,
/// anything else `0..=5`. Distinct cards never tie for a fixed trump and lead.
pub fn rank_strength(card: Card, trump: Suit, lead_suit: Option<Suit>) -> u8 {
    if card.is_right_bower(trump) {
        return RIGHT_BOWER_STRENGTH;
    }
    if card.is_left_bower(trump) {
        return LEFT_BOWER_STRENGTH;
    }
    if card.suit == trump {
        return TRUMP_BASE + trump_offset(card.rank);
    }
    let plain = card.rank.index() as u8;
    if lead_suit == Some(card.suit) {
        LEAD_BASE + plain
    } else {
        plain
    }
}

fn trump_offset(rank: Rank) -> u8 {
    match rank {
        Rank::Nine => 0,
        Rank::Ten => 1,
        Rank::Queen => 2,
        Rank::King => 3,
        Rank::Ace => 4,
        // The jack of trump is the right bower and never reaches here.
        Rank::Jack => RIGHT_BOWER_STRENGTH - TRUMP_BASE,
    }
}

/// Highest card among `cards` under trump/lead, if any.
pub fn highest(cards: &[Card], trump: Suit, lead_suit: Option<Suit>) -> Option<Card> {
    cards
        .iter()
        .copied()
        .max_by_key(|card| rank_strength(*card, trump, lead_suit))
}

/// Lowest card among `cards` under trump/lead, if any.
pub fn lowest(cards: &[Card], trump: Suit, lead_suit: Option<Suit>) -> Option<Card> {
    cards
        .iter()
        .copied()
        .min_by_key(|card| rank_strength(*card, trump, lead_suit))
}
