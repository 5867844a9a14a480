use euchre_bot::{
    BossTracker, BotContext, CallContext, HeuristicPolicy, Policy, call_trump, choose_discard,
};
use euchre_core::model::call::{CallDecision, CallRound, TrumpCall};
use euchre_core::model::card::{Card, parse_cards};
use euchre_core::model::deck::Deck;
use euchre_core::model::hand::ensure_distinct;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::rank::Rank;
use euchre_core::model::ranking::rank_strength;
use euchre_core::model::round::{RoundPhase, RoundState};
use euchre_core::model::suit::Suit;

fn scenario_hand() -> Vec<Card> {
    parse_cards("J of spades, K of spades, J of hearts, 10 of diamonds, 9 of diamonds").unwrap()
}

#[test]
fn scenario_hand_is_deterministic_in_every_seat_and_round() {
    let up = Card::new(Rank::Nine, Suit::Clubs);
    let hand = scenario_hand();
    assert!(Card::new(Rank::Jack, Suit::Spades).is_left_bower(up.suit));

    for seat in PlayerPosition::LOOP {
        for round in CallRound::BOTH {
            let first = call_trump(&hand, seat, PlayerPosition::West, up, round).unwrap();
            for _ in 0..10 {
                assert_eq!(
                    call_trump(&hand, seat, PlayerPosition::West, up, round).unwrap(),
                    first
                );
            }
        }
    }

    assert_eq!(
        call_trump(&hand, PlayerPosition::West, PlayerPosition::West, up, CallRound::One).unwrap(),
        CallDecision::PASS
    );
    assert_eq!(
        call_trump(&hand, PlayerPosition::West, PlayerPosition::West, up, CallRound::Two).unwrap(),
        CallDecision::call(Suit::Diamonds, false)
    );
}

#[test]
fn discard_always_leaves_five_distinct_cards() {
    for seed in 0..400u64 {
        let mut deck = Deck::shuffled_with_seed(seed);
        let six = deck.draw(6).unwrap();
        for trump in Suit::ALL {
            let worst = choose_discard(&six, trump).unwrap();
            assert!(six.contains(&worst));
            let kept: Vec<Card> = six.iter().copied().filter(|c| *c != worst).collect();
            assert_eq!(kept.len(), 5);
            ensure_distinct(&kept).unwrap();
        }
    }
}

/// Bid with the heuristic policy; `None` when all eight bids pass.
fn run_bidding(round: &RoundState, policy: &mut HeuristicPolicy) -> Option<TrumpCall> {
    let dealer = round.dealer();
    for bidding in CallRound::BOTH {
        for seat in PlayerPosition::order_from_dealer(dealer) {
            let hand = round.hand(seat).cards().to_vec();
            let ctx = CallContext::new(seat, &hand, dealer, round.up_card(), bidding);
            let decision = policy.choose_call(&ctx).unwrap();
            if let Some(trump) = decision.trump {
                return Some(TrumpCall::new(trump, seat, decision.going_alone, bidding));
            }
        }
    }
    None
}

#[test]
fn bot_rounds_are_legal_and_bosses_only_move_down() {
    let mut policy = HeuristicPolicy::default();
    for seed in 0..300u64 {
        let mut deck = Deck::shuffled_with_seed(seed);
        let mut round = RoundState::deal(&mut deck, PlayerPosition::West).unwrap();
        let call = run_bidding(&round, &mut policy).expect("stuck dealer always calls");
        round.apply_call(call).unwrap();
        if round.phase() == RoundPhase::Discarding {
            let dealer = round.dealer();
            let hand = round.hand(dealer).cards().to_vec();
            let card = policy.choose_discard(dealer, &hand, call.trump).unwrap();
            round.discard(card).unwrap();
        }

        let trump = call.trump;
        let mut bosses: [Option<Card>; 4] = [None; 4];
        while !round.is_complete() {
            let tracker = BossTracker::from_tricks(trump, round.trick_history());
            for suit in Suit::ALL {
                // Plain suits rank by printed rank, so an unplayed left bower
                // sits between the queen and the ten of its suit.
                let ladder = |card: Card| {
                    if suit == trump {
                        rank_strength(card, trump, None)
                    } else {
                        card.rank.index() as u8
                    }
                };
                let now = tracker.boss(suit);
                if let (Some(before), Some(now)) = (bosses[suit.index()], now) {
                    if !tracker.is_played(before) {
                        assert_eq!(now, before, "seed {seed} suit {suit}");
                    } else {
                        assert!(
                            ladder(now) < ladder(before),
                            "seed {seed} suit {suit}"
                        );
                    }
                }
                bosses[suit.index()] = now;
            }

            let seat = round.current_trick().expected_position();
            let hand = round.hand(seat).cards().to_vec();
            let caller_team = call.caller.team();
            let ctx = BotContext::new(
                seat,
                &hand,
                trump,
                round.current_trick().plays(),
                round.trick_history(),
                call.caller,
                call.going_alone,
                round.tricks_won(caller_team),
            );
            let card = policy.choose_play(&ctx).unwrap();
            assert!(round.legal_cards(seat).contains(&card), "seed {seed}");
            round.play_card(seat, card).unwrap();
        }

        let points = round.points().unwrap();
        assert!(points.team_one + points.team_two > 0);
    }
}
