use euchre_core::model::card::Card;
use euchre_core::model::rank::Rank;
use euchre_core::model::ranking::lowest;
use euchre_core::model::suit::Suit;

/// The card a seat would most like to be rid of under `trump`.
///
/// A lone non-ace off-suit card goes first since shedding it opens a void;
/// otherwise the lowest off-suit card, and the lowest trump only when the
/// hand holds nothing else. `None` for an empty hand.
pub fn worst_card(cards: &[Card], trump: Suit) -> Option<Card> {
    let off_suit: Vec<Card> = cards.iter().copied().filter(|c| !c.is_trump(trump)).collect();
    if off_suit.is_empty() {
        return lowest(cards, trump, None);
    }

    let singletons: Vec<Card> = off_suit
        .iter()
        .copied()
        .filter(|card| {
            card.rank != Rank::Ace && off_suit.iter().filter(|c| c.suit == card.suit).count() == 1
        })
        .collect();
    if !singletons.is_empty() {
        return lowest(&singletons, trump, None);
    }

    lowest(&off_suit, trump, None)
}

/// Hand left after adding `pickup` and discarding the worst card.
pub fn after_pickup(cards: &[Card], pickup: Card, trump: Suit) -> Vec<Card> {
    let mut six = cards.to_vec();
    six.push(pickup);
    if let Some(worst) = worst_card(&six, trump) {
        if let Some(idx) = six.iter().position(|c| *c == worst) {
            six.remove(idx);
        }
    }
    six
}
