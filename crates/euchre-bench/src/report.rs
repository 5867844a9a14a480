//! Forced-EV tables and hand score breakdowns as plain text.

use crate::simulation::{BatchSummary, ForcedBatch, ForcedScenario, RunnerError};
use euchre_bot::{BotParams, HandScore};
use euchre_core::model::call::{CallAction, CallRound};
use euchre_core::model::card::Card;
use euchre_core::model::hand::Hand;
use euchre_core::model::player::PlayerPosition;
use euchre_core::model::suit::Suit;
use serde::Serialize;

const SCENARIO_MIN_WIDTH: usize = 12;
const SCENARIO_MAX_WIDTH: usize = 48;

/// Every forced bid for one controlled seat, best EV first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvTable {
    pub controlled: PlayerPosition,
    pub trials: usize,
    pub up_card: Option<Card>,
    pub going_alone: bool,
    pub rows: Vec<BatchSummary>,
}

/// Settings shared by every row of an EV table.
#[derive(Debug, Clone, Copy)]
pub struct TableRun {
    pub trials: usize,
    pub seed: u64,
    pub dealer: PlayerPosition,
    pub parallel: bool,
    pub include_round2: bool,
}

impl EvTable {
    /// Run the round-1 bids (pass, order up) and, when enabled, the round-2
    /// bids (pass, next, reverse1, reverse2) with the same seed.
    pub fn run(base: &ForcedScenario, run: TableRun) -> Result<Self, RunnerError> {
        let rounds: &[CallRound] = if run.include_round2 {
            &CallRound::BOTH
        } else {
            &[CallRound::One]
        };

        let mut rows = Vec::new();
        for &round in rounds {
            for &action in CallAction::for_round(round) {
                let batch = ForcedBatch::new(base.with_action(round, action), run.trials, run.seed)
                    .with_dealer(run.dealer)
                    .with_parallel(run.parallel);
                rows.push(batch.run()?);
            }
        }
        rows.sort_by(|a, b| b.ev.total_cmp(&a.ev));

        Ok(Self {
            controlled: base.controlled,
            trials: run.trials,
            up_card: base.up_card,
            going_alone: base.going_alone,
            rows,
        })
    }

    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.scenario.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(SCENARIO_MIN_WIDTH, SCENARIO_MAX_WIDTH);

        let header = format!(
            "{:<width$} {:>10} {:>10} {:>9}",
            "scenario", "EV", "applied", "pos_rate"
        );
        let up_card = self
            .up_card
            .map(|card| card.to_string())
            .unwrap_or_else(|| "random".to_string());

        let mut out = String::new();
        out.push_str("Forced EV table\n");
        out.push_str("===============\n");
        out.push_str(&format!(
            "controlled={}, sims={}, up_card={}, alone={}\n\n",
            self.controlled, self.trials, up_card, self.going_alone
        ));
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"-".repeat(header.len()));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{:<width$} {:>10.4} {:>10} {:>8.2}%\n",
                truncate(&row.scenario, width),
                row.ev,
                row.applied,
                row.positive_ev_rate * 100.0
            ));
        }
        out
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut short: String = label.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// One batch result as a short block of text.
pub fn render_summary(summary: &BatchSummary) -> String {
    format!(
        "{scenario}\n  EV: {ev:.4} (95% CI [{low:.4}, {high:.4}], sd {sd:.4}, p {p:.3})\n  applied: {applied}/{requested}\n  positive: {positive} ({rate:.2}%)\n",
        scenario = summary.scenario,
        ev = summary.ev,
        low = summary.ci95.0,
        high = summary.ci95.1,
        sd = summary.std_dev,
        p = summary.p_value,
        applied = summary.applied,
        requested = summary.requested,
        positive = summary.positive,
        rate = summary.positive_ev_rate * 100.0,
    )
}

/// Weighted component breakdown for `cards` under each suit in `suits`.
pub fn render_hand_scores(cards: &[Card], suits: &[Suit], params: &BotParams) -> String {
    let mut out = format!("Scoring hand: {}\n---------------\n", join_cards(cards));
    let hand = Hand::with_cards(cards.to_vec());
    for &suit in suits {
        let score = HandScore::evaluate(cards, suit, params);
        out.push_str(&format!("{suit}:\n"));
        out.push_str(&format!("  Hand: {}\n", join_cards(&hand.sorted_for_trump(suit))));
        out.push_str(&format!(
            "  Trump Score: {:.3} * {} = {:.3}\n",
            score.trump,
            params.trump_weight,
            score.trump * params.trump_weight
        ));
        out.push_str(&format!(
            "  Aces Score: {:.3} * {} = {:.3}\n",
            score.aces,
            params.aces_weight,
            score.aces * params.aces_weight
        ));
        out.push_str(&format!(
            "  Voids Score: {:.3} * {} = {:.3}\n",
            score.voids,
            params.voids_weight,
            score.voids * params.voids_weight
        ));
        out.push_str(&format!("  Total Score: {:.3}\n", score.total));
    }
    out
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_core::model::card::parse_cards;
    use euchre_core::model::rank::Rank;

    fn row(label: &str, ev: f64) -> BatchSummary {
        BatchSummary {
            scenario: label.to_string(),
            ev,
            applied: 10,
            requested: 10,
            positive: 4,
            positive_ev_rate: 0.4,
            std_dev: 1.0,
            ci95: (ev - 0.5, ev + 0.5),
            p_value: 0.5,
        }
    }

    #[test]
    fn table_runs_every_action_and_sorts_by_ev() {
        let mut base = ForcedScenario::new(PlayerPosition::North, CallRound::One, CallAction::Pass);
        base.up_card = Some(Card::new(Rank::Nine, Suit::Clubs));
        let table = EvTable::run(
            &base,
            TableRun {
                trials: 60,
                seed: 8,
                dealer: PlayerPosition::West,
                parallel: false,
                include_round2: true,
            },
        )
        .unwrap();
        assert_eq!(table.rows.len(), 6);
        assert!(table.rows.windows(2).all(|pair| pair[0].ev >= pair[1].ev));
        assert!(table.rows.iter().any(|row| row.scenario == "R2 next (spades)"));

        let round_one_only = EvTable::run(
            &base,
            TableRun {
                trials: 20,
                seed: 8,
                dealer: PlayerPosition::West,
                parallel: false,
                include_round2: false,
            },
        )
        .unwrap();
        assert_eq!(round_one_only.rows.len(), 2);
    }

    #[test]
    fn render_lines_up_columns() {
        let table = EvTable {
            controlled: PlayerPosition::North,
            trials: 10,
            up_card: None,
            going_alone: false,
            rows: vec![row("R1 order_up", 0.25), row("R1 pass", -0.125)],
        };
        let text = table.render();
        assert!(text.contains("up_card=random"));
        let lines: Vec<&str> = text.lines().collect();
        let header = lines.iter().position(|line| line.starts_with("scenario")).unwrap();
        assert_eq!(lines[header + 2], "R1 order_up      0.2500         10    40.00%");
        assert_eq!(lines[header + 1].len(), lines[header].len());
    }

    #[test]
    fn long_labels_are_truncated() {
        let label = "x".repeat(60);
        let short = truncate(&label, SCENARIO_MAX_WIDTH);
        assert_eq!(short.chars().count(), SCENARIO_MAX_WIDTH);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn hand_scores_list_each_suit() {
        let cards =
            parse_cards("A of diamonds, A of hearts, J of spades, J of diamonds, J of hearts").unwrap();
        let text = render_hand_scores(&cards, &Suit::ALL, &BotParams::default());
        for suit in Suit::ALL {
            assert!(text.contains(&format!("{suit}:")));
        }
        assert_eq!(text.matches("Total Score").count(), 4);
        assert!(text.contains(
            "hearts:\n  Hand: J of hearts, J of diamonds, A of hearts, A of diamonds, J of spades\n"
        ));
    }
}
