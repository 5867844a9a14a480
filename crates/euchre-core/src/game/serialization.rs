use crate::model::player::{PlayerPosition, Team};
use crate::model::round::RoundState;
use crate::model::trick::Play;
use serde::{Deserialize, Serialize};

/// One finished trick with the running trick counts after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrickRecord {
    pub trick: u8,
    pub lead_player: PlayerPosition,
    pub plays: Vec<Play>,
    pub winner: PlayerPosition,
    pub team1_tricks: u8,
    pub team2_tricks: u8,
}

/// Completed tricks of `round`, replayed to recover the running counts.
pub fn trick_records(round: &RoundState) -> Vec<TrickRecord> {
    let Some(trump) = round.trump() else {
        return Vec::new();
    };
    let mut counts = [0u8; 2];
    round
        .trick_history()
        .iter()
        .enumerate()
        .filter_map(|(idx, trick)| {
            let winner = trick.winner(trump)?;
            counts[winner.team().index()] += 1;
            Some(TrickRecord {
                trick: idx as u8 + 1,
                lead_player: trick.leader(),
                plays: trick.plays().to_vec(),
                winner,
                team1_tricks: counts[Team::One.index()],
                team2_tricks: counts[Team::Two.index()],
            })
        })
        .collect()
}
