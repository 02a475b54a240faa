use super::team::TeamId;
use super::time_format;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Match lifecycle. Transitions happen outside the engine as results are entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    Regular,
    Playoffs,
}

/// Playoff stage, ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffRound {
    Quarterfinals,
    Semifinals,
    ThirdPlace,
    Final,
}

impl PlayoffRound {
    pub fn label(&self) -> &'static str {
        match self {
            PlayoffRound::Quarterfinals => "Quarterfinals",
            PlayoffRound::Semifinals => "Semifinals",
            PlayoffRound::ThirdPlace => "Third place",
            PlayoffRound::Final => "Final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    First,
    Second,
}

/// A match row as exchanged with the match store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    #[serde(rename = "match_date")]
    pub date: NaiveDate,
    #[serde(rename = "match_time", with = "time_format")]
    pub time: NaiveTime,
    #[serde(rename = "field_number")]
    pub field: u32,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub phase: MatchPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playoff_round: Option<PlayoffRound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playoff_position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg: Option<Leg>,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye_team_id: Option<TeamId>,
}

impl Match {
    /// New regular-season fixture, not yet played.
    pub fn scheduled(
        round: u32,
        home_team_id: TeamId,
        away_team_id: TeamId,
        date: NaiveDate,
        time: NaiveTime,
        field: u32,
    ) -> Self {
        Self {
            id: None,
            home_team_id,
            away_team_id,
            date,
            time,
            field,
            round: Some(round),
            status: MatchStatus::Scheduled,
            phase: MatchPhase::Regular,
            playoff_round: None,
            playoff_position: None,
            leg: None,
            home_score: None,
            away_score: None,
            bye_team_id: None,
        }
    }

    pub fn with_result(mut self, home_score: u32, away_score: u32) -> Self {
        self.status = MatchStatus::Finished;
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home_team_id == team || &self.away_team_id == team
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == MatchStatus::Scheduled
    }

    pub fn is_regular_season(&self) -> bool {
        self.phase == MatchPhase::Regular
    }

    /// Both scores recorded.
    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.home_score?, self.away_score?))
    }

    pub fn has_result(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn opponent_of(&self, team: &TeamId) -> Option<&TeamId> {
        if &self.home_team_id == team {
            Some(&self.away_team_id)
        } else if &self.away_team_id == team {
            Some(&self.home_team_id)
        } else {
            None
        }
    }

    /// (goals for, goals against) from `team`'s side.
    pub fn score_for(&self, team: &TeamId) -> Option<(u32, u32)> {
        let (home, away) = self.score()?;
        if &self.home_team_id == team {
            Some((home, away))
        } else if &self.away_team_id == team {
            Some((away, home))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        Match::scheduled(
            1,
            TeamId::from("a"),
            TeamId::from("b"),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            1,
        )
    }

    #[test]
    fn test_score_for_each_side() {
        let m = sample().with_result(3, 1);
        assert_eq!(m.score_for(&TeamId::from("a")), Some((3, 1)));
        assert_eq!(m.score_for(&TeamId::from("b")), Some((1, 3)));
        assert_eq!(m.score_for(&TeamId::from("c")), None);
        assert!(m.is_finished());
    }

    #[test]
    fn test_unplayed_match_has_no_score() {
        let m = sample();
        assert_eq!(m.score(), None);
        assert_eq!(m.opponent_of(&TeamId::from("a")), Some(&TeamId::from("b")));
    }

    #[test]
    fn test_store_row_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["match_date"], "2025-03-02");
        assert_eq!(json["match_time"], "10:00");
        assert_eq!(json["field_number"], 1);
        assert_eq!(json["status"], "scheduled");
        assert_eq!(json["phase"], "regular");
        assert!(json.get("playoff_round").is_none());
    }

    #[test]
    fn test_reads_row_without_optional_columns() {
        let raw = r#"{
            "home_team_id": "a",
            "away_team_id": "b",
            "match_date": "2025-03-02",
            "match_time": "08:00:00",
            "field_number": 2,
            "status": "in_progress"
        }"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.status, MatchStatus::InProgress);
        assert_eq!(m.phase, MatchPhase::Regular);
        assert_eq!(m.round, None);
        assert_eq!(m.time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }
}
