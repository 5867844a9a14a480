//! Per-hand replay records written as JSON lines.

use crate::simulation::{RunnerError, ensure_parent};
use euchre_core::game::{TrickRecord, trick_records};
use euchre_core::model::call::CallAction;
use euchre_core::model::card::Card;
use euchre_core::model::player::{PlayerPosition, Team};
use euchre_core::model::round::RoundState;
use euchre_core::model::score::RoundPoints;
use euchre_core::model::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const NO_TRUMP_NOTE: &str = "no trump called";

/// Everything that happened in one applied trial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandTrace {
    pub sim_idx: usize,
    pub controlled_bot: PlayerPosition,
    pub controlled_team: u8,
    pub forced_round: u8,
    pub forced_action: CallAction,
    pub forced_going_alone: bool,
    pub up_card: Card,
    pub dealer: PlayerPosition,
    pub players: Vec<SeatInfo>,
    pub trump_selection: TrumpSelection,
    pub forced_first_lead_card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trump_suit: Option<Suit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trump_maker: Option<PlayerPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub going_alone: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_play_order: Vec<PlayerPosition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub initial_hands: Vec<SeatHand>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tricks: Vec<TrickTrace>,
    #[serde(rename = "final", default, skip_serializing_if = "Option::is_none")]
    pub final_tally: Option<FinalTally>,
    pub net_ev: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl HandTrace {
    /// Fill in the play section from a round whose trump is settled.
    pub fn record_play_start(&mut self, round: &RoundState) {
        let Some(call) = round.call() else {
            return;
        };
        self.trump_suit = Some(call.trump);
        self.trump_maker = Some(call.caller);
        self.going_alone = Some(call.going_alone);
        self.initial_play_order = round.active_seats();
        self.initial_hands = seat_hands(round);
    }

    pub fn record_finish(&mut self, round: &RoundState, points: &RoundPoints, net: i32) {
        self.final_tally = Some(FinalTally {
            team1_tricks: round.tricks_won(Team::One),
            team2_tricks: round.tricks_won(Team::Two),
            team1_points: points.team_one,
            team2_points: points.team_two,
        });
        self.net_ev = net;
    }

    pub fn record_no_call(&mut self) {
        self.note = Some(NO_TRUMP_NOTE.to_string());
        self.net_ev = 0;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatInfo {
    pub name: PlayerPosition,
    pub team: u8,
    pub partner: PlayerPosition,
}

impl SeatInfo {
    pub fn table() -> Vec<SeatInfo> {
        PlayerPosition::LOOP
            .iter()
            .map(|&seat| SeatInfo {
                name: seat,
                team: seat.team().number(),
                partner: seat.partner(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrumpSelection {
    pub decision: Option<Suit>,
    pub maker: Option<PlayerPosition>,
    pub going_alone: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatHand {
    pub seat: PlayerPosition,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrickTrace {
    #[serde(flatten)]
    pub record: TrickRecord,
    pub hands_after: Vec<SeatHand>,
}

impl TrickTrace {
    /// The trick that just completed in `round`, with running counts and hands.
    pub fn capture(round: &RoundState) -> Option<TrickTrace> {
        let record = trick_records(round).pop()?;
        Some(TrickTrace {
            record,
            hands_after: seat_hands(round),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalTally {
    pub team1_tricks: u8,
    pub team2_tricks: u8,
    pub team1_points: u8,
    pub team2_points: u8,
}

/// Cards still held by each active seat, in trump display order once trump
/// is settled.
pub fn seat_hands(round: &RoundState) -> Vec<SeatHand> {
    round
        .active_seats()
        .into_iter()
        .map(|seat| {
            let hand = round.hand(seat);
            let cards = match round.trump() {
                Some(trump) => hand.sorted_for_trump(trump),
                None => hand.cards().to_vec(),
            };
            SeatHand { seat, cards }
        })
        .collect()
}

/// Destination for hand traces. Sinks are append-only.
pub trait TraceSink {
    fn record(&mut self, trace: &HandTrace) -> Result<(), RunnerError>;

    fn flush(&mut self) -> Result<(), RunnerError> {
        Ok(())
    }
}

/// Discards every trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn record(&mut self, _trace: &HandTrace) -> Result<(), RunnerError> {
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
pub struct JsonlTraceSink {
    path: PathBuf,
    writer: BufWriter<File>,
    flush_each_hand: bool,
}

impl JsonlTraceSink {
    pub fn append(path: impl AsRef<Path>, flush_each_hand: bool) -> Result<Self, RunnerError> {
        let path = path.as_ref();
        ensure_parent(path.parent())?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            flush_each_hand,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSink for JsonlTraceSink {
    fn record(&mut self, trace: &HandTrace) -> Result<(), RunnerError> {
        serde_json::to_writer(&mut self.writer, trace)?;
        self.writer.write_all(b"\n")?;
        if self.flush_each_hand {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RunnerError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Load every trace from a JSONL file, skipping blank lines.
pub fn read_traces(path: impl AsRef<Path>) -> Result<Vec<HandTrace>, RunnerError> {
    let reader = BufReader::new(File::open(path)?);
    let mut traces = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        traces.push(serde_json::from_str(&line)?);
    }
    Ok(traces)
}
