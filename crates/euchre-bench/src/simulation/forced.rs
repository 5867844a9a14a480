use super::{BidOverride, Bidding, RunnerError, play_out, settle_trump};
use crate::trace::{HandTrace, SeatInfo, TraceSink, TrickTrace, TrumpSelection};
use euchre_bot::{BotParams, HeuristicPolicy};
use euchre_core::model::call::{CallAction, CallRound};
use euchre_core::model::card::Card;
use euchre_core::model::deck::{Deck, DeckError};
use euchre_core::model::hand::Hand;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::round::{HAND_SIZE, RoundState};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::array;
use tracing::{Level, event};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

/// One seat's bid replaced by a fixed action, plus optional pinned cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedScenario {
    pub controlled: PlayerPosition,
    pub round: CallRound,
    pub action: CallAction,
    pub going_alone: bool,
    /// Dealt to the controlled seat every trial when set.
    pub hand: Option<Vec<Card>>,
    pub up_card: Option<Card>,
    /// Led to trick one by whoever leads it, if they hold it.
    pub lead_card: Option<Card>,
}

impl ForcedScenario {
    pub fn new(controlled: PlayerPosition, round: CallRound, action: CallAction) -> Self {
        Self {
            controlled,
            round,
            action,
            going_alone: false,
            hand: None,
            up_card: None,
            lead_card: None,
        }
    }

    /// Copy of this scenario with a different forced bid.
    pub fn with_action(&self, round: CallRound, action: CallAction) -> Self {
        Self {
            round,
            action,
            ..self.clone()
        }
    }

    /// Table label such as `R1 order_up` or `R2 next (spades)`.
    pub fn label(&self) -> String {
        let base = format!("R{} {}", self.round.number(), self.action);
        match (self.action, self.up_card) {
            (CallAction::Pass | CallAction::OrderUp, _) | (_, None) => base,
            (action, Some(up)) => match action.trump_for(up) {
                Some(suit) => format!("{base} ({suit})"),
                None => base,
            },
        }
    }

    /// Deal one trial: pinned cards come out of the deck before the shuffle,
    /// the rest is dealt five at a time from the dealer's left.
    pub fn deal(&self, dealer: PlayerPosition, rng: &mut StdRng) -> Result<RoundState, RunnerError> {
        let mut deck = Deck::standard();
        if let Some(up) = self.up_card {
            deck.remove(up)?;
        }
        if let Some(hand) = &self.hand {
            for card in hand {
                deck.remove(*card)?;
            }
        }
        deck.shuffle_in_place(rng);

        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        for seat in PlayerPosition::order_from_dealer(dealer) {
            hands[seat.index()] = match &self.hand {
                Some(pinned) if seat == self.controlled => Hand::with_cards(pinned.clone()),
                _ => Hand::with_cards(deck.draw(HAND_SIZE)?),
            };
        }
        let up_card = match self.up_card {
            Some(card) => card,
            None => deck
                .draw(1)?
                .into_iter()
                .next()
                .ok_or(DeckError::Exhausted {
                    wanted: 1,
                    remaining: 0,
                })?,
        };
        Ok(RoundState::from_hands(dealer, hands, up_card)?)
    }
}

/// What one trial contributed to the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub sim_idx: usize,
    /// The controlled seat reached its forced bid.
    pub applied: bool,
    /// Controlled team's points minus the opponents'.
    pub net: i32,
    pub trace: Option<HandTrace>,
}

impl TrialOutcome {
    fn skipped(sim_idx: usize) -> Self {
        Self {
            sim_idx,
            applied: false,
            net: 0,
            trace: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchSummary {
    pub scenario: String,
    pub ev: f64,
    pub applied: usize,
    pub requested: usize,
    pub positive: usize,
    pub positive_ev_rate: f64,
    pub std_dev: f64,
    pub ci95: (f64, f64),
    /// Two-sided normal p-value for EV different from zero.
    pub p_value: f64,
}

impl BatchSummary {
    pub fn from_outcomes(scenario: String, requested: usize, outcomes: &[TrialOutcome]) -> Self {
        let nets: Vec<f64> = outcomes
            .iter()
            .filter(|outcome| outcome.applied)
            .map(|outcome| f64::from(outcome.net))
            .collect();
        let applied = nets.len();
        let positive = outcomes
            .iter()
            .filter(|outcome| outcome.applied && outcome.net > 0)
            .count();
        let ev = if applied == 0 {
            0.0
        } else {
            nets.iter().sum::<f64>() / applied as f64
        };
        let std_dev = sample_std_dev(&nets, ev);
        let positive_ev_rate = if applied == 0 {
            0.0
        } else {
            positive as f64 / applied as f64
        };
        Self {
            scenario,
            ev,
            applied,
            requested,
            positive,
            positive_ev_rate,
            std_dev,
            ci95: confidence_interval(ev, std_dev, applied),
            p_value: p_value(ev, std_dev, applied),
        }
    }
}

/// A batch of forced-bid trials. Each trial gets its own seed drawn up front
/// from the batch seed, so results do not depend on `parallel`.
#[derive(Debug, Clone)]
pub struct ForcedBatch {
    scenario: ForcedScenario,
    trials: usize,
    seed: u64,
    dealer: PlayerPosition,
    parallel: bool,
    capture_traces: bool,
    params: BotParams,
}

impl ForcedBatch {
    pub fn new(scenario: ForcedScenario, trials: usize, seed: u64) -> Self {
        Self {
            scenario,
            trials,
            seed,
            dealer: PlayerPosition::West,
            parallel: false,
            capture_traces: false,
            params: BotParams::default(),
        }
    }

    pub fn with_dealer(mut self, dealer: PlayerPosition) -> Self {
        self.dealer = dealer;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_traces(mut self, capture: bool) -> Self {
        self.capture_traces = capture;
        self
    }

    pub fn with_params(mut self, params: BotParams) -> Self {
        self.params = params;
        self
    }

    pub fn scenario(&self) -> &ForcedScenario {
        &self.scenario
    }

    pub fn trial_seeds(&self) -> Vec<u64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.trials).map(|_| rng.next_u64()).collect()
    }

    /// Run every trial and summarise the applied ones.
    pub fn run(&self) -> Result<BatchSummary, RunnerError> {
        let outcomes = self.run_trials()?;
        Ok(self.summarize(&outcomes))
    }

    /// As [`ForcedBatch::run`], writing one trace per applied trial in trial order.
    pub fn run_with_sink(&self, sink: &mut dyn TraceSink) -> Result<BatchSummary, RunnerError> {
        let outcomes = self.run_trials()?;
        for trace in outcomes.iter().filter_map(|outcome| outcome.trace.as_ref()) {
            sink.record(trace)?;
        }
        sink.flush()?;
        Ok(self.summarize(&outcomes))
    }

    pub fn run_trials(&self) -> Result<Vec<TrialOutcome>, RunnerError> {
        if !self.scenario.action.allowed_in(self.scenario.round) {
            return Err(RunnerError::ActionNotAllowed {
                action: self.scenario.action,
                round: self.scenario.round,
            });
        }

        let seeds = self.trial_seeds();
        if self.parallel {
            seeds
                .par_iter()
                .enumerate()
                .map(|(sim_idx, seed)| self.run_trial(sim_idx, *seed))
                .collect()
        } else {
            seeds
                .iter()
                .enumerate()
                .map(|(sim_idx, seed)| self.run_trial(sim_idx, *seed))
                .collect()
        }
    }

    pub fn run_trial(&self, sim_idx: usize, seed: u64) -> Result<TrialOutcome, RunnerError> {
        let scenario = &self.scenario;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut round = scenario.deal(self.dealer, &mut rng)?;
        let forced = BidOverride::from_action(
            scenario.controlled,
            scenario.round,
            scenario.action,
            scenario.going_alone,
            round.up_card(),
        )?;
        let mut policy = HeuristicPolicy::new(self.params);

        let bidding = settle_trump(&mut round, &mut policy, Some(&forced))?;
        if !bidding.override_applied {
            log_trial(sim_idx, &bidding, None);
            return Ok(TrialOutcome::skipped(sim_idx));
        }

        let mut trace = self
            .capture_traces
            .then(|| self.trace_header(sim_idx, &round, &bidding));

        if bidding.call.is_none() {
            if let Some(trace) = trace.as_mut() {
                trace.record_no_call();
            }
            log_trial(sim_idx, &bidding, Some(0));
            return Ok(TrialOutcome {
                sim_idx,
                applied: true,
                net: 0,
                trace,
            });
        }

        if let Some(trace) = trace.as_mut() {
            trace.record_play_start(&round);
        }
        let capture = trace.is_some();
        let mut tricks = Vec::new();
        let points = play_out(&mut round, &mut policy, scenario.lead_card, |round| {
            if capture {
                tricks.extend(TrickTrace::capture(round));
            }
        })?;
        let net = points.net_for(scenario.controlled.team());

        if let Some(trace) = trace.as_mut() {
            trace.tricks = tricks;
            trace.record_finish(&round, &points, net);
        }
        log_trial(sim_idx, &bidding, Some(net));

        Ok(TrialOutcome {
            sim_idx,
            applied: true,
            net,
            trace,
        })
    }

    fn trace_header(&self, sim_idx: usize, round: &RoundState, bidding: &Bidding) -> HandTrace {
        let scenario = &self.scenario;
        HandTrace {
            sim_idx,
            controlled_bot: scenario.controlled,
            controlled_team: scenario.controlled.team().number(),
            forced_round: scenario.round.number(),
            forced_action: scenario.action,
            forced_going_alone: scenario.going_alone,
            up_card: round.up_card(),
            dealer: round.dealer(),
            players: SeatInfo::table(),
            trump_selection: TrumpSelection {
                decision: bidding.call.map(|call| call.trump),
                maker: bidding.call.map(|call| call.caller),
                going_alone: bidding.call.is_some_and(|call| call.going_alone),
            },
            forced_first_lead_card: scenario.lead_card,
            trump_suit: None,
            trump_maker: None,
            going_alone: None,
            initial_play_order: Vec::new(),
            initial_hands: Vec::new(),
            tricks: Vec::new(),
            final_tally: None,
            net_ev: 0,
            note: None,
        }
    }

    fn summarize(&self, outcomes: &[TrialOutcome]) -> BatchSummary {
        let summary = BatchSummary::from_outcomes(self.scenario.label(), self.trials, outcomes);
        if tracing::enabled!(Level::INFO) {
            event!(
                target: "euchre_bench::batch",
                Level::INFO,
                scenario = %summary.scenario,
                controlled = %self.scenario.controlled,
                dealer = %self.dealer,
                seed = self.seed,
                requested = summary.requested,
                applied = summary.applied,
                ev = summary.ev,
                positive_ev_rate = summary.positive_ev_rate,
                std_dev = summary.std_dev,
                "forced batch complete"
            );
        }
        summary
    }
}

fn log_trial(sim_idx: usize, bidding: &Bidding, net: Option<i32>) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let trump = bidding
        .call
        .map(|call| call.trump.to_string())
        .unwrap_or_else(|| "none".to_string());
    let maker = bidding
        .call
        .map(|call| call.caller.to_string())
        .unwrap_or_else(|| "none".to_string());

    event!(
        target: "euchre_bench::trial",
        Level::DEBUG,
        sim_idx = sim_idx as u64,
        applied = bidding.override_applied,
        trump = %trump,
        maker = %maker,
        alone = bidding.call.is_some_and(|call| call.going_alone),
        net = net.unwrap_or_default(),
    );
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() as f64 - 1.0);
    variance.sqrt()
}

fn confidence_interval(mean: f64, std_dev: f64, n: usize) -> (f64, f64) {
    if n < 2 {
        return (mean, mean);
    }
    let margin = CONFIDENCE_Z * std_dev / (n as f64).sqrt();
    (mean - margin, mean + margin)
}

fn p_value(mean: f64, std_dev: f64, n: usize) -> f64 {
    if n < 2 || std_dev <= f64::EPSILON {
        return if mean.abs() <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    let z = mean.abs() / (std_dev / (n as f64).sqrt());
    Normal::new(0.0, 1.0)
        .map(|normal| 2.0 * (1.0 - normal.cdf(z)))
        .unwrap_or(1.0)
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_core::model::card::parse_cards;
    use euchre_core::model::rank::Rank;
    use euchre_core::model::suit::Suit;

    fn pinned(round: CallRound, action: CallAction) -> ForcedScenario {
        let mut scenario = ForcedScenario::new(PlayerPosition::West, round, action);
        scenario.hand = Some(
            parse_cards("J of spades, K of spades, J of hearts, 10 of diamonds, 9 of diamonds")
                .unwrap(),
        );
        scenario.up_card = Some(Card::new(Rank::Nine, Suit::Clubs));
        scenario
    }

    #[test]
    fn deal_keeps_pinned_cards_in_place() {
        let scenario = pinned(CallRound::One, CallAction::Pass);
        let mut rng = StdRng::seed_from_u64(9);
        let round = scenario.deal(PlayerPosition::West, &mut rng).unwrap();
        assert_eq!(round.up_card(), Card::new(Rank::Nine, Suit::Clubs));
        let mut west = round.hand(PlayerPosition::West).cards().to_vec();
        let mut expected = scenario.hand.clone().unwrap();
        west.sort_by_key(|card| card.index());
        expected.sort_by_key(|card| card.index());
        assert_eq!(west, expected);
    }

    #[test]
    fn missing_pinned_card_is_fatal() {
        let mut scenario = pinned(CallRound::One, CallAction::Pass);
        scenario.up_card = Some(Card::new(Rank::Jack, Suit::Spades));
        let batch = ForcedBatch::new(scenario, 3, 1);
        assert!(matches!(
            batch.run(),
            Err(RunnerError::Deck(DeckError::CardNotInDeck(_)))
        ));
    }

    #[test]
    fn action_from_the_wrong_round_is_fatal() {
        let scenario = ForcedScenario::new(PlayerPosition::North, CallRound::One, CallAction::Next);
        let batch = ForcedBatch::new(scenario, 3, 1);
        assert!(matches!(
            batch.run(),
            Err(RunnerError::ActionNotAllowed { .. })
        ));
    }

    #[test]
    fn first_seat_round_one_bid_is_always_applied() {
        let scenario = ForcedScenario::new(PlayerPosition::North, CallRound::One, CallAction::OrderUp);
        let summary = ForcedBatch::new(scenario, 200, 17).run().unwrap();
        assert_eq!(summary.applied, 200);
        assert_eq!(summary.requested, 200);
        assert!(summary.ci95.0 <= summary.ev && summary.ev <= summary.ci95.1);
        assert!((0.0..=1.0).contains(&summary.positive_ev_rate));
        assert!((0.0..=1.0).contains(&summary.p_value));
    }

    #[test]
    fn dealer_pass_in_round_two_scores_zero() {
        let scenario = pinned(CallRound::Two, CallAction::Pass);
        let outcomes = ForcedBatch::new(scenario, 300, 5)
            .run_trials()
            .unwrap();
        assert!(outcomes.iter().any(|outcome| outcome.applied));
        assert!(
            outcomes
                .iter()
                .filter(|outcome| outcome.applied)
                .all(|outcome| outcome.net == 0)
        );
    }

    #[test]
    fn labels_name_the_suit_when_the_up_card_is_fixed() {
        let scenario = pinned(CallRound::Two, CallAction::Reverse1);
        assert_eq!(scenario.label(), "R2 reverse1 (hearts)");
        let free = ForcedScenario::new(PlayerPosition::North, CallRound::Two, CallAction::Next);
        assert_eq!(free.label(), "R2 next");
        assert_eq!(
            pinned(CallRound::One, CallAction::OrderUp).label(),
            "R1 order_up"
        );
    }

    #[test]
    fn traces_follow_every_applied_trial() {
        let scenario = ForcedScenario::new(PlayerPosition::South, CallRound::One, CallAction::OrderUp);
        let outcomes = ForcedBatch::new(scenario, 40, 3)
            .with_traces(true)
            .run_trials()
            .unwrap();
        for outcome in outcomes.iter().filter(|outcome| outcome.applied) {
            let trace = outcome.trace.as_ref().unwrap();
            assert_eq!(trace.sim_idx, outcome.sim_idx);
            assert_eq!(trace.net_ev, outcome.net);
            if trace.note.is_none() {
                assert_eq!(trace.tricks.len(), 5);
                let last = &trace.tricks[4].record;
                assert_eq!(last.team1_tricks + last.team2_tricks, 5);
                assert!(trace.final_tally.is_some());
            }
        }
    }

    #[test]
    fn statistics_handle_tiny_samples() {
        assert_eq!(sample_std_dev(&[2.0], 2.0), 0.0);
        assert_eq!(confidence_interval(1.5, 0.0, 1), (1.5, 1.5));
        assert_eq!(p_value(0.0, 0.0, 0), 1.0);
        let (low, high) = confidence_interval(0.5, 2.0, 100);
        assert!((low - (0.5 - 0.392)).abs() < 1e-9);
        assert!((high - (0.5 + 0.392)).abs() < 1e-9);
    }
}
