//! Unforced call-rate survey: every seat bids and plays with the heuristic bot.

use crate::simulation::{RunnerError, ensure_parent, play_out, settle_trump};
use euchre_bot::{BotParams, HeuristicPolicy};
use euchre_core::model::call::{CallRound, TrumpCall};
use euchre_core::model::deck::Deck;
use euchre_core::model::player::{PlayerPosition, Team};
use euchre_core::model::round::RoundState;
use euchre_core::model::score::{RoundOutcome, RoundPoints};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{Level, event};

/// Result of one surveyed deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealRecord {
    pub call: Option<TrumpCall>,
    pub points: Option<RoundPoints>,
}

#[derive(Debug, Clone)]
pub struct CallRateSurvey {
    deals: usize,
    seed: u64,
    dealer: PlayerPosition,
    parallel: bool,
    params: BotParams,
}

impl CallRateSurvey {
    pub fn new(deals: usize, seed: u64) -> Self {
        Self {
            deals,
            seed,
            dealer: PlayerPosition::West,
            parallel: false,
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

    pub fn run(&self) -> Result<SurveyReport, RunnerError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..self.deals).map(|_| rng.next_u64()).collect();
        let records: Vec<DealRecord> = if self.parallel {
            seeds
                .par_iter()
                .map(|seed| self.run_deal(*seed))
                .collect::<Result<_, _>>()?
        } else {
            seeds
                .iter()
                .map(|seed| self.run_deal(*seed))
                .collect::<Result<_, _>>()?
        };

        let report = SurveyReport::from_records(self.dealer, &records);
        if tracing::enabled!(Level::INFO) {
            event!(
                target: "euchre_bench::batch",
                Level::INFO,
                deals = report.deals,
                dealer = %self.dealer,
                seed = self.seed,
                calls = report.teams.iter().map(|team| team.calls).sum::<usize>(),
                "call-rate survey complete"
            );
        }
        Ok(report)
    }

    fn run_deal(&self, seed: u64) -> Result<DealRecord, RunnerError> {
        let mut deck = Deck::shuffled_with_seed(seed);
        let mut round = RoundState::deal(&mut deck, self.dealer)?;
        let mut policy = HeuristicPolicy::new(self.params);
        let bidding = settle_trump(&mut round, &mut policy, None)?;
        let points = match bidding.call {
            Some(_) => Some(play_out(&mut round, &mut policy, None, |_| {})?),
            None => None,
        };
        Ok(DealRecord {
            call: bidding.call,
            points,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SeatCounts {
    pub round1_calls: usize,
    pub round2_calls: usize,
    pub round1_loners: usize,
    pub round2_loners: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TeamCounts {
    pub calls: usize,
    /// Calls that scored more than the defenders.
    pub wins: usize,
    pub marches: usize,
    pub loner_attempts: usize,
    pub loner_wins: usize,
    /// Points over every deal, called or defended.
    pub points: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SurveyReport {
    pub deals: usize,
    pub dealer: PlayerPosition,
    /// Indexed by `PlayerPosition::index`.
    pub seats: [SeatCounts; 4],
    /// Indexed by `Team::index`.
    pub teams: [TeamCounts; 2],
}

impl SurveyReport {
    pub fn from_records(dealer: PlayerPosition, records: &[DealRecord]) -> Self {
        let mut seats = [SeatCounts::default(); 4];
        let mut teams = [TeamCounts::default(); 2];

        for record in records {
            if let Some(points) = record.points {
                for team in [Team::One, Team::Two] {
                    teams[team.index()].points += usize::from(points.for_team(team));
                }
            }
            let Some(call) = record.call else {
                continue;
            };

            let seat = &mut seats[call.caller.index()];
            match (call.round, call.going_alone) {
                (CallRound::One, alone) => {
                    seat.round1_calls += 1;
                    seat.round1_loners += usize::from(alone);
                }
                (CallRound::Two, alone) => {
                    seat.round2_calls += 1;
                    seat.round2_loners += usize::from(alone);
                }
            }

            let caller_team = call.caller.team();
            let team = &mut teams[caller_team.index()];
            team.calls += 1;
            let Some(points) = record.points else {
                continue;
            };
            if call.going_alone {
                team.loner_attempts += 1;
                if points.outcome == RoundOutcome::LoneMarch {
                    team.loner_wins += 1;
                }
            }
            if points.net_for(caller_team) > 0 {
                team.wins += 1;
                if points.outcome == RoundOutcome::March {
                    team.marches += 1;
                }
            }
        }

        Self {
            deals: records.len(),
            dealer,
            seats,
            teams,
        }
    }

    pub fn seat(&self, seat: PlayerPosition) -> &SeatCounts {
        &self.seats[seat.index()]
    }

    pub fn team(&self, team: Team) -> &TeamCounts {
        &self.teams[team.index()]
    }

    /// Percentage of all deals, rounded to two places.
    pub fn per_deal_rate(&self, count: usize) -> f64 {
        percent(count, self.deals)
    }

    pub fn win_rate(&self, team: Team) -> f64 {
        let counts = self.team(team);
        percent(counts.wins, counts.calls)
    }

    pub fn march_rate(&self, team: Team) -> f64 {
        let counts = self.team(team);
        percent(counts.marches, counts.calls)
    }

    pub fn loner_success_rate(&self, team: Option<Team>) -> f64 {
        let (wins, attempts) = match team {
            Some(team) => {
                let counts = self.team(team);
                (counts.loner_wins, counts.loner_attempts)
            }
            None => self.teams.iter().fold((0, 0), |(wins, attempts), counts| {
                (wins + counts.loner_wins, attempts + counts.loner_attempts)
            }),
        };
        percent(wins, attempts)
    }

    pub fn points_per_hand(&self, team: Team) -> f64 {
        if self.deals == 0 {
            return 0.0;
        }
        round2(self.team(team).points as f64 / self.deals as f64)
    }

    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Call-Rate Survey\n\n");
        rows.push_str(&format!(
            "Deals: {} (dealer {})\n\n",
            self.deals, self.dealer
        ));
        rows.push_str("| Seat | R1 call % | R2 call % | Call % | R1 alone % | R2 alone % | Alone % |\n");
        rows.push_str("|------|-----------|-----------|--------|------------|------------|---------|\n");
        for seat in PlayerPosition::LOOP {
            let counts = self.seat(seat);
            rows.push_str(&format!(
                "| {seat} | {r1:.2} | {r2:.2} | {total:.2} | {l1:.2} | {l2:.2} | {ltotal:.2} |\n",
                r1 = self.per_deal_rate(counts.round1_calls),
                r2 = self.per_deal_rate(counts.round2_calls),
                total = self.per_deal_rate(counts.round1_calls + counts.round2_calls),
                l1 = self.per_deal_rate(counts.round1_loners),
                l2 = self.per_deal_rate(counts.round2_loners),
                ltotal = self.per_deal_rate(counts.round1_loners + counts.round2_loners),
            ));
        }

        rows.push_str("\n| Team | Calls | Win % | March % | Alone won/tried | Alone % | Points/hand |\n");
        rows.push_str("|------|-------|-------|---------|-----------------|---------|-------------|\n");
        for team in [Team::One, Team::Two] {
            let counts = self.team(team);
            rows.push_str(&format!(
                "| {team} | {calls} | {win:.2} | {march:.2} | {lw}/{la} | {alone:.2} | {pph:.2} |\n",
                calls = counts.calls,
                win = self.win_rate(team),
                march = self.march_rate(team),
                lw = counts.loner_wins,
                la = counts.loner_attempts,
                alone = self.loner_success_rate(Some(team)),
                pph = self.points_per_hand(team),
            ));
        }
        rows.push_str(&format!(
            "\nOverall alone success: {:.2}%\n",
            self.loner_success_rate(None)
        ));
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), RunnerError> {
        let path = path.as_ref();
        ensure_parent(path.parent())?;
        fs::write(path, self.render_markdown())?;
        Ok(())
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
