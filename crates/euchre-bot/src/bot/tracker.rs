use euchre_core::model::card::Card;
use euchre_core::model::rank::Rank;
use euchre_core::model::suit::Suit;
use euchre_core::model::trick::Trick;

const DECK_SIZE: usize = 24;

/// Plain trump order once both bowers are gone, high to low.
const TRUMP_DESCENDING: [Rank; 5] = [Rank::Ace, Rank::King, Rank::Queen, Rank::Ten, Rank::Nine];
const PLAIN_DESCENDING: [Rank; 6] = [
    Rank::Ace,
    Rank::King,
    Rank::Queen,
    Rank::Jack,
    Rank::Ten,
    Rank::Nine,
];

/// Tracks which cards have left play this round so the highest unplayed card
/// ("boss") of each trump-adjusted suit can be named.
#[derive(Debug, Clone)]
pub struct BossTracker {
    trump: Suit,
    played: [bool; DECK_SIZE],
}

impl BossTracker {
    pub fn new(trump: Suit) -> Self {
        Self {
            trump,
            played: [false; DECK_SIZE],
        }
    }

    /// Tracker seeded with every card of the completed tricks.
    pub fn from_tricks(trump: Suit, completed: &[Trick]) -> Self {
        let mut tracker = Self::new(trump);
        for trick in completed {
            for play in trick.plays() {
                tracker.note_card_played(play.card);
            }
        }
        tracker
    }

    pub fn note_card_played(&mut self, card: Card) {
        self.played[card.index()] = true;
    }

    pub fn is_played(&self, card: Card) -> bool {
        self.played[card.index()]
    }

    /// Highest unplayed card of `suit`. Plain suits walk the full A-K-Q-J-10-9
    /// ladder, so an unplayed left bower still blocks the cards under its jack.
    pub fn boss(&self, suit: Suit) -> Option<Card> {
        if suit == self.trump {
            let right = Card::new(Rank::Jack, self.trump);
            let left = Card::new(Rank::Jack, self.trump.partner());
            return [right, left]
                .into_iter()
                .chain(TRUMP_DESCENDING.iter().map(|rank| Card::new(*rank, suit)))
                .find(|card| !self.is_played(*card));
        }

        PLAIN_DESCENDING
            .iter()
            .map(|rank| Card::new(*rank, suit))
            .find(|card| !self.is_played(*card))
    }

    pub fn is_boss(&self, card: Card) -> bool {
        self.boss(card.effective_suit(self.trump)) == Some(card)
    }

    /// Cards in `hand` that are currently boss, in hand order.
    pub fn bosses_in(&self, hand: &[Card]) -> Vec<Card> {
        hand.iter().copied().filter(|c| self.is_boss(*c)).collect()
    }

    /// Boss cards in `hand` outside the trump suit.
    pub fn off_suit_bosses_in(&self, hand: &[Card]) -> Vec<Card> {
        hand.iter()
            .copied()
            .filter(|c| !c.is_trump(self.trump) && self.is_boss(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_core::model::player::PlayerPosition;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn trump_boss_walks_through_the_bowers() {
        let mut tracker = BossTracker::new(Suit::Spades);
        assert_eq!(tracker.boss(Suit::Spades), Some(card(Rank::Jack, Suit::Spades)));

        tracker.note_card_played(card(Rank::Jack, Suit::Spades));
        assert_eq!(tracker.boss(Suit::Spades), Some(card(Rank::Jack, Suit::Clubs)));

        tracker.note_card_played(card(Rank::Jack, Suit::Clubs));
        assert_eq!(tracker.boss(Suit::Spades), Some(card(Rank::Ace, Suit::Spades)));

        tracker.note_card_played(card(Rank::Ace, Suit::Spades));
        tracker.note_card_played(card(Rank::King, Suit::Spades));
        assert!(tracker.is_boss(card(Rank::Queen, Suit::Spades)));
    }

    #[test]
    fn unplayed_left_bower_keeps_lower_cards_from_boss() {
        let mut tracker = BossTracker::new(Suit::Spades);
        for rank in [Rank::Ace, Rank::King, Rank::Queen] {
            tracker.note_card_played(card(rank, Suit::Clubs));
        }
        assert_eq!(tracker.boss(Suit::Clubs), Some(card(Rank::Jack, Suit::Clubs)));
        assert!(!tracker.is_boss(card(Rank::Ten, Suit::Clubs)));
        // The jack itself answers to trump.
        assert!(!tracker.is_boss(card(Rank::Jack, Suit::Clubs)));

        tracker.note_card_played(card(Rank::Jack, Suit::Clubs));
        assert!(tracker.is_boss(card(Rank::Ten, Suit::Clubs)));
    }

    #[test]
    fn plain_suit_includes_its_jack() {
        let mut tracker = BossTracker::new(Suit::Spades);
        for rank in [Rank::Ace, Rank::King, Rank::Queen] {
            tracker.note_card_played(card(rank, Suit::Hearts));
        }
        assert_eq!(tracker.boss(Suit::Hearts), Some(card(Rank::Jack, Suit::Hearts)));
    }

    #[test]
    fn seeded_from_completed_tricks() {
        let mut trick = Trick::new(PlayerPosition::North);
        trick.play(PlayerPosition::North, card(Rank::Ace, Suit::Hearts)).unwrap();
        trick.play(PlayerPosition::East, card(Rank::Nine, Suit::Hearts)).unwrap();
        trick.play(PlayerPosition::South, card(Rank::Ten, Suit::Hearts)).unwrap();
        trick.play(PlayerPosition::West, card(Rank::King, Suit::Hearts)).unwrap();

        let tracker = BossTracker::from_tricks(Suit::Clubs, &[trick]);
        assert!(tracker.is_played(card(Rank::King, Suit::Hearts)));
        assert_eq!(tracker.boss(Suit::Hearts), Some(card(Rank::Queen, Suit::Hearts)));

        let hand = [card(Rank::Queen, Suit::Hearts), card(Rank::Nine, Suit::Diamonds)];
        assert_eq!(tracker.off_suit_bosses_in(&hand), vec![card(Rank::Queen, Suit::Hearts)]);
    }

    #[test]
    fn exhausted_suit_has_no_boss() {
        let mut tracker = BossTracker::new(Suit::Hearts);
        for rank in PLAIN_DESCENDING {
            tracker.note_card_played(card(rank, Suit::Spades));
        }
        assert_eq!(tracker.boss(Suit::Spades), None);
    }
}
