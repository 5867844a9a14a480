use crate::model::card::Card;
use crate::model::suit::Suit;
use std::cmp::Reverse;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("card {0} appears more than once")]
    Duplicate(Card),
    #[error("expected {expected} cards but got {actual}")]
    WrongSize { expected: usize, actual: usize },
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Display order: right bower, left bower, remaining trump high to low,
    /// then the other suits in table order, each high to low.
    pub fn sorted_for_trump(&self, trump: Suit) -> Vec<Card> {
        let mut cards = self.cards.clone();
        cards.sort_by_key(|card| {
            let group = if card.is_right_bower(trump) {
                0
            } else if card.is_left_bower(trump) {
                1
            } else if card.suit == trump {
                2
            } else {
                3 + card.suit.index()
            };
            (group, Reverse(card.rank))
        });
        cards
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| a.suit.cmp(&b.suit).then(a.rank.cmp(&b.rank)));
    }
}

pub fn trump_cards(cards: &[Card], trump: Suit) -> Vec<Card> {
    cards.iter().copied().filter(|c| c.is_trump(trump)).collect()
}

pub fn off_suit_cards(cards: &[Card], trump: Suit) -> Vec<Card> {
    cards.iter().copied().filter(|c| !c.is_trump(trump)).collect()
}

pub fn ensure_distinct(cards: &[Card]) -> Result<(), HandError> {
    let mut seen = [false; 24];
    for card in cards {
        let slot = &mut seen[card.index()];
        if *slot {
            return Err(HandError::Duplicate(*card));
        }
        *slot = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Hand, HandError, ensure_distinct, off_suit_cards, trump_cards};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Ten, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
    }

    #[test]
    fn duplicates_are_rejected() {
        let card = Card::new(Rank::Ace, Suit::Spades);
        assert_eq!(ensure_distinct(&[card, card]), Err(HandError::Duplicate(card)));
    }

    #[test]
    fn left_bower_counts_as_trump() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Jack, Suit::Spades),
            Card::new(Rank::King, Suit::Spades),
            Card::new(Rank::Nine, Suit::Clubs),
        ]);
        let trump = trump_cards(hand.cards(), Suit::Clubs);
        assert_eq!(trump.len(), 2);
        assert_eq!(
            off_suit_cards(hand.cards(), Suit::Clubs),
            vec![Card::new(Rank::King, Suit::Spades)]
        );
    }

    #[test]
    fn trump_sort_puts_bowers_first() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Nine, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Clubs),
            Card::new(Rank::Jack, Suit::Diamonds),
            Card::new(Rank::King, Suit::Hearts),
            Card::new(Rank::Jack, Suit::Hearts),
        ]);
        let sorted = hand.sorted_for_trump(Suit::Hearts);
        assert_eq!(
            sorted,
            vec![
                Card::new(Rank::Jack, Suit::Hearts),
                Card::new(Rank::Jack, Suit::Diamonds),
                Card::new(Rank::King, Suit::Hearts),
                Card::new(Rank::Nine, Suit::Hearts),
                Card::new(Rank::Ace, Suit::Clubs),
            ]
        );
    }
}
