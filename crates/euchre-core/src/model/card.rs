use crate::model::rank::{ParseRankError, Rank};
use crate::model::suit::{ParseSuitError, Suit};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single card. Serialized as its text form, e.g. `"9 of clubs"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn is_right_bower(self, trump: Suit) -> bool {
        self.rank == Rank::Jack && self.suit == trump
    }

    pub fn is_left_bower(self, trump: Suit) -> bool {
        self.rank == Rank::Jack && self.suit == trump.partner()
    }

    pub fn is_bower(self, trump: Suit) -> bool {
        self.is_right_bower(trump) || self.is_left_bower(trump)
    }

    /// Suit the card belongs to once trump is known: the left bower is trump.
    pub fn effective_suit(self, trump: Suit) -> Suit {
        if self.is_left_bower(trump) {
            trump
        } else {
            self.suit
        }
    }

    pub fn is_trump(self, trump: Suit) -> bool {
        self.effective_suit(trump) == trump
    }

    /// Dense index into a 24-card table, suit-major.
    pub const fn index(self) -> usize {
        self.suit.index() * Rank::ORDERED.len() + self.rank.index()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCardError {
    #[error("expected '<rank> of <suit>' but got '{0}'")]
    Format(String),
    #[error(transparent)]
    Rank(#[from] ParseRankError),
    #[error(transparent)]
    Suit(#[from] ParseSuitError),
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split_whitespace();
        let (Some(rank), Some(of), Some(suit), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseCardError::Format(trimmed.to_string()));
        };
        if !of.eq_ignore_ascii_case("of") {
            return Err(ParseCardError::Format(trimmed.to_string()));
        }
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }
}

impl TryFrom<String> for Card {
    type Error = ParseCardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

/// Parse a comma-separated card list such as `"J of spades, K of spades"`.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardError> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Card, ParseCardError, Rank, Suit, parse_cards};

    #[test]
    fn bowers_follow_same_color_pairing() {
        let jack_spades = Card::new(Rank::Jack, Suit::Spades);
        assert!(jack_spades.is_right_bower(Suit::Spades));
        assert!(jack_spades.is_left_bower(Suit::Clubs));
        assert!(!jack_spades.is_bower(Suit::Hearts));
        assert_eq!(jack_spades.effective_suit(Suit::Clubs), Suit::Clubs);
        assert_eq!(jack_spades.effective_suit(Suit::Diamonds), Suit::Spades);
    }

    #[test]
    fn text_form_roundtrips() {
        let card: Card = "9 of clubs".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Nine, Suit::Clubs));
        assert_eq!(card.to_string(), "9 of clubs");
        assert_eq!(
            "10 Of Diamonds".parse::<Card>(),
            Ok(Card::new(Rank::Ten, Suit::Diamonds))
        );
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(
            "nine clubs".parse::<Card>(),
            Err(ParseCardError::Format(_))
        ));
        assert!(matches!(
            "2 of clubs".parse::<Card>(),
            Err(ParseCardError::Rank(_))
        ));
        assert!(matches!(
            "A of stars".parse::<Card>(),
            Err(ParseCardError::Suit(_))
        ));
    }

    #[test]
    fn serde_uses_text_form() {
        let card = Card::new(Rank::Jack, Suit::Hearts);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"J of hearts\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn parses_comma_separated_lists() {
        let cards = parse_cards("J of spades, K of spades,J of hearts").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2], Card::new(Rank::Jack, Suit::Hearts));
    }

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = [false; 24];
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let idx = Card::new(rank, suit).index();
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&v| v));
    }
}
