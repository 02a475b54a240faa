use super::table::{calculate_standings, StandingsRow};
use crate::models::{Match, Team, TeamId};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    pub fn from_score(scored: u32, conceded: u32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => FormResult::Win,
            std::cmp::Ordering::Equal => FormResult::Draw,
            std::cmp::Ordering::Less => FormResult::Loss,
        }
    }

    pub fn letter(self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

/// One team's season view: its table row plus recent results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    pub rank: usize,
    pub row: StandingsRow,
    /// Newest first.
    pub form: Vec<FormResult>,
}

impl TeamRecord {
    pub fn form_string(&self) -> String {
        self.form.iter().map(|r| r.letter()).collect()
    }
}

/// Record for `team`, with at most `form_len` results of form.
///
/// `None` when the team is not on the roster.
pub fn team_record(roster: &[Team], matches: &[Match], team: &TeamId, form_len: usize) -> Option<TeamRecord> {
    let standings = calculate_standings(roster, matches);
    let rank = standings.rank_of(team)?;
    let row = standings.row(team)?.clone();

    let mut counted: Vec<(NaiveDate, NaiveTime, FormResult)> = matches
        .iter()
        .filter(|m| m.is_finished() && m.is_regular_season())
        .filter_map(|m| {
            let (scored, conceded) = m.score_for(team)?;
            Some((m.date, m.time, FormResult::from_score(scored, conceded)))
        })
        .collect();
    counted.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));

    Some(TeamRecord {
        rank,
        row,
        form: counted.into_iter().take(form_len).map(|(_, _, r)| r).collect(),
    })
}
