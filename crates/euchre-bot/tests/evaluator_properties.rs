use euchre_bot::{BotParams, HandScore, evaluate_hand};
use euchre_core::model::card::{Card, parse_cards};
use euchre_core::model::deck::Deck;
use euchre_core::model::suit::Suit;

fn for_each_five_card_hand(mut visit: impl FnMut(&[Card])) {
    let deck = Deck::standard();
    let cards = deck.cards();
    let n = cards.len();
    let mut hand = [cards[0]; 5];
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        hand[0] = cards[a];
                        hand[1] = cards[b];
                        hand[2] = cards[c];
                        hand[3] = cards[d];
                        hand[4] = cards[e];
                        visit(&hand);
                    }
                }
            }
        }
    }
}

#[test]
fn every_hand_scores_within_unit_interval() {
    let params = BotParams::default();
    let mut hands = 0usize;
    let mut best = 0.0f64;
    for_each_five_card_hand(|hand| {
        hands += 1;
        for trump in Suit::ALL {
            let score = HandScore::evaluate(hand, trump, &params);
            for part in [score.trump, score.aces, score.voids, score.total] {
                assert!((0.0..=1.0).contains(&part), "{hand:?} under {trump}: {score:?}");
            }
            best = best.max(score.total);
        }
    });
    assert_eq!(hands, 42_504);

    let top = parse_cards("J of hearts, J of diamonds, A of hearts, K of hearts, Q of hearts").unwrap();
    let top_score = evaluate_hand(&top, Suit::Hearts);
    assert!((best - top_score).abs() < 1e-12, "best {best} top {top_score}");
}

#[test]
fn top_trump_hand_is_the_same_for_every_suit() {
    let mut scores = Vec::new();
    for trump in Suit::ALL {
        let text = format!(
            "J of {trump}, J of {left}, A of {trump}, K of {trump}, Q of {trump}",
            left = trump.partner()
        );
        let hand = parse_cards(&text).unwrap();
        scores.push(evaluate_hand(&hand, trump));
    }
    assert!(scores.iter().all(|s| (s - 0.8).abs() < 1e-12));
}

#[test]
fn adding_trump_never_lowers_the_trump_component() {
    let params = BotParams::default();
    let base = parse_cards("9 of spades, 10 of clubs, Q of diamonds, K of diamonds").unwrap();
    let weak = HandScore::evaluate(&base, Suit::Hearts, &params).trump;
    for extra in parse_cards("9 of hearts, 10 of hearts, Q of hearts, K of hearts, A of hearts, J of diamonds, J of hearts")
        .unwrap()
    {
        let mut hand = base.clone();
        hand.push(extra);
        assert!(HandScore::evaluate(&hand, Suit::Hearts, &params).trump > weak);
    }
}
