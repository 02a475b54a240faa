//! League table from finished regular-season matches.
//!
//! 3 points for a win, 1 for a draw. Ties on points are broken by goal difference, then
//! goals scored; anything still level keeps roster order.

use crate::models::{Match, Team, TeamId};
use serde::Serialize;
use std::collections::HashMap;

pub const POINTS_WIN: u32 = 3;
pub const POINTS_DRAW: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingsRow {
    pub fn empty(team: &Team) -> Self {
        Self {
            team_id: team.id.clone(),
            team_name: team.name.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    /// Fold one result in, from this team's side.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.won += 1,
            std::cmp::Ordering::Equal => self.drawn += 1,
            std::cmp::Ordering::Less => self.lost += 1,
        }
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
        self.points = POINTS_WIN * self.won + POINTS_DRAW * self.drawn;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub rows: Vec<StandingsRow>,
}

impl Standings {
    /// 1-based table position.
    pub fn rank_of(&self, team: &TeamId) -> Option<usize> {
        self.rows.iter().position(|r| &r.team_id == team).map(|i| i + 1)
    }

    /// The best `n` teams, best first.
    pub fn top(&self, n: usize) -> Vec<TeamId> {
        self.rows.iter().take(n).map(|r| r.team_id.clone()).collect()
    }

    pub fn row(&self, team: &TeamId) -> Option<&StandingsRow> {
        self.rows.iter().find(|r| &r.team_id == team)
    }
}

/// Table for `roster`. Every roster team gets a row, played or not.
///
/// Only finished regular-season matches with both scores count, and only when both teams
/// are on the roster.
pub fn calculate_standings(roster: &[Team], matches: &[Match]) -> Standings {
    let mut rows: Vec<StandingsRow> = roster.iter().map(StandingsRow::empty).collect();
    let index: HashMap<&TeamId, usize> =
        roster.iter().enumerate().map(|(i, team)| (&team.id, i)).collect();

    for m in matches.iter().filter(|m| m.is_finished() && m.is_regular_season()) {
        let (Some(&home), Some(&away)) = (index.get(&m.home_team_id), index.get(&m.away_team_id)) else {
            continue;
        };
        let Some((home_goals, away_goals)) = m.score() else {
            continue;
        };
        rows[home].record(home_goals, away_goals);
        rows[away].record(away_goals, home_goals);
    }

    // stable: level teams keep roster order
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    Standings { rows }
}
