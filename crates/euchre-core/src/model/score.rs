use crate::model::player::Team;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TRICKS_PER_ROUND: u8 = 5;

/// How a round ended from the calling team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Caller took three or four tricks.
    Made,
    March,
    LoneMarch,
    Euchred,
}

impl RoundOutcome {
    pub const fn points(self) -> u8 {
        match self {
            RoundOutcome::Made => 1,
            RoundOutcome::March | RoundOutcome::Euchred => 2,
            RoundOutcome::LoneMarch => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPoints {
    pub team_one: u8,
    pub team_two: u8,
    pub outcome: RoundOutcome,
}

impl RoundPoints {
    pub const fn for_team(&self, team: Team) -> u8 {
        match team {
            Team::One => self.team_one,
            Team::Two => self.team_two,
        }
    }

    /// Points for `team` minus points for the other team.
    pub fn net_for(&self, team: Team) -> i32 {
        i32::from(self.for_team(team)) - i32::from(self.for_team(team.opponent()))
    }

    pub fn winner(&self) -> Team {
        if self.team_one > self.team_two {
            Team::One
        } else {
            Team::Two
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("trick counts {team_one} + {team_two} do not add up to 5")]
    TrickCount { team_one: u8, team_two: u8 },
}

/// Points awarded for one round. Exactly one team scores.
pub fn score_round(
    team_one_tricks: u8,
    team_two_tricks: u8,
    caller_team: Team,
    went_alone: bool,
) -> Result<RoundPoints, ScoreError> {
    if u16::from(team_one_tricks) + u16::from(team_two_tricks) != u16::from(TRICKS_PER_ROUND) {
        return Err(ScoreError::TrickCount {
            team_one: team_one_tricks,
            team_two: team_two_tricks,
        });
    }

    let caller_tricks = match caller_team {
        Team::One => team_one_tricks,
        Team::Two => team_two_tricks,
    };

    let (outcome, scoring_team) = if caller_tricks < 3 {
        (RoundOutcome::Euchred, caller_team.opponent())
    } else if caller_tricks < TRICKS_PER_ROUND {
        (RoundOutcome::Made, caller_team)
    } else if went_alone {
        (RoundOutcome::LoneMarch, caller_team)
    } else {
        (RoundOutcome::March, caller_team)
    };

    let points = outcome.points();
    let (team_one, team_two) = match scoring_team {
        Team::One => (points, 0),
        Team::Two => (0, points),
    };

    Ok(RoundPoints {
        team_one,
        team_two,
        outcome,
    })
}
