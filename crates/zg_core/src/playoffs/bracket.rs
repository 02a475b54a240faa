//! Seeded knockout brackets for 4 or 8 teams.
//!
//! Only the opening round has known teams. Every later slot names the tie it is waiting on,
//! so nothing here invents a participant.

use crate::error::{EngineError, Result};
use crate::models::{time_format, Leg, Match, MatchPhase, MatchStatus, PlayoffRound, TeamId};
use crate::schedule::fixtures::ensure_distinct;
use crate::settings::PlayoffTiming;
use crate::standings::Standings;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Quarterfinal seed indices: 1v8, 4v5, 2v7, 3v6.
pub const QUARTERFINAL_PAIRS: [(usize, usize); 4] = [(0, 7), (3, 4), (1, 6), (2, 5)];
/// Semifinal seed indices when the bracket starts there: 1v4, 2v3.
pub const SEMIFINAL_PAIRS: [(usize, usize); 2] = [(0, 3), (1, 2)];

/// A tie in the bracket, addressed by round and 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracketRef {
    pub round: PlayoffRound,
    pub position: u32,
}

impl BracketRef {
    pub fn new(round: PlayoffRound, position: u32) -> Self {
        Self { round, position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingQualifier {
    WinnerOf(BracketRef),
    LoserOf(BracketRef),
}

impl PendingQualifier {
    pub fn source(&self) -> BracketRef {
        match self {
            PendingQualifier::WinnerOf(r) | PendingQualifier::LoserOf(r) => *r,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contender {
    Seed(TeamId),
    Pending(PendingQualifier),
}

impl Contender {
    pub fn team(&self) -> Option<&TeamId> {
        match self {
            Contender::Seed(team) => Some(team),
            Contender::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Contender::Pending(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffMatch {
    pub round: PlayoffRound,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg: Option<Leg>,
    pub home: Contender,
    pub away: Contender,
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub time: NaiveTime,
    pub field: u32,
}

impl PlayoffMatch {
    pub fn tie(&self) -> BracketRef {
        BracketRef::new(self.round, self.position)
    }

    /// Both participants, once known.
    pub fn teams(&self) -> Option<(&TeamId, &TeamId)> {
        Some((self.home.team()?, self.away.team()?))
    }

    pub fn is_resolved(&self) -> bool {
        self.teams().is_some()
    }

    /// Store row for this match with the given participants.
    pub fn to_match(&self, home: TeamId, away: TeamId) -> Match {
        Match {
            id: None,
            home_team_id: home,
            away_team_id: away,
            date: self.date,
            time: self.time,
            field: self.field,
            round: None,
            status: MatchStatus::Scheduled,
            phase: MatchPhase::Playoffs,
            playoff_round: Some(self.round),
            playoff_position: Some(self.position),
            leg: self.leg,
            home_score: None,
            away_score: None,
            bye_team_id: None,
        }
    }
}

fn default_field() -> u32 {
    1
}

fn default_third_place() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketOptions {
    pub start_date: NaiveDate,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(default = "default_field")]
    pub field: u32,
    #[serde(default = "default_third_place")]
    pub third_place_match: bool,
    #[serde(default)]
    pub home_and_away: bool,
}

impl BracketOptions {
    pub fn new(start_date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            start_date,
            start_time,
            field: default_field(),
            third_place_match: default_third_place(),
            home_and_away: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub size: usize,
    pub home_and_away: bool,
    pub matches: Vec<PlayoffMatch>,
}

impl PlayoffBracket {
    pub fn round(&self, round: PlayoffRound) -> impl Iterator<Item = &PlayoffMatch> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Matches still waiting on at least one participant.
    pub fn pending_count(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_resolved()).count()
    }

    /// Whether ties in `round` are decided over two legs.
    pub fn is_two_legged(&self, round: PlayoffRound) -> bool {
        self.home_and_away && matches!(round, PlayoffRound::Quarterfinals | PlayoffRound::Semifinals)
    }
}

/// Top `size` teams of the table, best first.
pub fn seeds_from_standings(standings: &Standings, size: usize) -> Result<Vec<TeamId>> {
    if size != 4 && size != 8 {
        return Err(EngineError::InvalidBracketSize(size));
    }
    if standings.rows.len() < size {
        return Err(EngineError::NotEnoughTeams { found: standings.rows.len() });
    }
    Ok(standings.top(size))
}

struct Clock<'a> {
    options: &'a BracketOptions,
    timing: &'a PlayoffTiming,
}

impl Clock<'_> {
    /// Kick-off for the `index`-th match of a day. Spacing past midnight lands on the next date.
    fn at(&self, day_offset: u32, index: usize) -> (NaiveDate, NaiveTime) {
        let minutes = i64::from(self.timing.match_spacing_minutes) * index as i64;
        let kickoff = self.options.start_date.and_time(self.options.start_time)
            + Duration::days(i64::from(day_offset))
            + Duration::minutes(minutes);
        (kickoff.date(), kickoff.time())
    }
}

/// Push one tie, plus its return leg when the round is two-legged.
fn push_tie(
    out: &mut Vec<PlayoffMatch>,
    clock: &Clock<'_>,
    tie: BracketRef,
    (home, away): (Contender, Contender),
    day_offset: u32,
    index: usize,
    two_legs: bool,
) {
    let (date, time) = clock.at(day_offset, index);
    let field = clock.options.field;
    out.push(PlayoffMatch {
        round: tie.round,
        position: tie.position,
        leg: two_legs.then_some(Leg::First),
        home: home.clone(),
        away: away.clone(),
        date,
        time,
        field,
    });
    if two_legs {
        let (date, time) = clock.at(day_offset + clock.timing.second_leg_offset_days, index);
        out.push(PlayoffMatch {
            round: tie.round,
            position: tie.position,
            leg: Some(Leg::Second),
            home: away,
            away: home,
            date,
            time,
            field,
        });
    }
}

/// Build the bracket for `seeds` (best seed first).
///
/// Final and third-place match are always single games, played on the same day with the
/// third-place match first.
pub fn generate_bracket(seeds: &[TeamId], options: &BracketOptions, timing: &PlayoffTiming) -> Result<PlayoffBracket> {
    if seeds.len() != 4 && seeds.len() != 8 {
        return Err(EngineError::InvalidBracketSize(seeds.len()));
    }
    if options.field == 0 {
        return Err(EngineError::InvalidFieldCount(0));
    }
    ensure_distinct(seeds)?;

    let clock = Clock { options, timing };
    let two_legs = options.home_and_away;
    let mut matches = Vec::new();

    let seeded = |i: usize| Contender::Seed(seeds[i].clone());
    let winner = |round, position| Contender::Pending(PendingQualifier::WinnerOf(BracketRef::new(round, position)));
    let loser = |round, position| Contender::Pending(PendingQualifier::LoserOf(BracketRef::new(round, position)));

    let final_offset = if seeds.len() == 8 {
        for (index, (home, away)) in QUARTERFINAL_PAIRS.iter().enumerate() {
            let tie = BracketRef::new(PlayoffRound::Quarterfinals, index as u32 + 1);
            push_tie(&mut matches, &clock, tie, (seeded(*home), seeded(*away)), 0, index, two_legs);
        }
        for index in 0..2 {
            let position = index as u32 + 1;
            let tie = BracketRef::new(PlayoffRound::Semifinals, position);
            let home = winner(PlayoffRound::Quarterfinals, 2 * position - 1);
            let away = winner(PlayoffRound::Quarterfinals, 2 * position);
            push_tie(&mut matches, &clock, tie, (home, away), timing.round_spacing_days, index, two_legs);
        }
        2 * timing.round_spacing_days
    } else {
        for (index, (home, away)) in SEMIFINAL_PAIRS.iter().enumerate() {
            let tie = BracketRef::new(PlayoffRound::Semifinals, index as u32 + 1);
            push_tie(&mut matches, &clock, tie, (seeded(*home), seeded(*away)), 0, index, two_legs);
        }
        timing.round_spacing_days
    };

    if options.third_place_match {
        let tie = BracketRef::new(PlayoffRound::ThirdPlace, 1);
        let home = loser(PlayoffRound::Semifinals, 1);
        let away = loser(PlayoffRound::Semifinals, 2);
        push_tie(&mut matches, &clock, tie, (home, away), final_offset, 0, false);
    }
    let final_index = usize::from(options.third_place_match);
    let tie = BracketRef::new(PlayoffRound::Final, 1);
    let home = winner(PlayoffRound::Semifinals, 1);
    let away = winner(PlayoffRound::Semifinals, 2);
    push_tie(&mut matches, &clock, tie, (home, away), final_offset, final_index, false);

    tracing::info!(size = seeds.len(), matches = matches.len(), home_and_away = two_legs, "playoff bracket generated");

    Ok(PlayoffBracket { size: seeds.len(), home_and_away: two_legs, matches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    fn seeds(n: usize) -> Vec<TeamId> {
        (1..=n).map(|i| TeamId::new(format!("s{i}"))).collect()
    }

    fn options() -> BracketOptions {
        BracketOptions::new(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_eight_team_bracket_shape() {
        let bracket = generate_bracket(&seeds(8), &options(), &PlayoffTiming::default()).unwrap();
        assert_eq!(bracket.matches.len(), 8);
        assert_eq!(bracket.round(PlayoffRound::Quarterfinals).count(), 4);
        assert_eq!(bracket.round(PlayoffRound::Semifinals).count(), 2);
        assert_eq!(bracket.round(PlayoffRound::ThirdPlace).count(), 1);
        assert_eq!(bracket.round(PlayoffRound::Final).count(), 1);

        let pairs: Vec<(&str, &str)> = bracket
            .round(PlayoffRound::Quarterfinals)
            .map(|m| {
                let (h, a) = m.teams().unwrap();
                (h.as_str(), a.as_str())
            })
            .collect();
        assert_eq!(pairs, vec![("s1", "s8"), ("s4", "s5"), ("s2", "s7"), ("s3", "s6")]);
        assert_eq!(bracket.pending_count(), 4);
    }

    #[test]
    fn test_eight_team_dates_and_times() {
        let bracket = generate_bracket(&seeds(8), &options(), &PlayoffTiming::default()).unwrap();
        let qf_times: Vec<String> = bracket
            .round(PlayoffRound::Quarterfinals)
            .map(|m| time_format::format_time(&m.time))
            .collect();
        assert_eq!(qf_times, vec!["18:00", "19:30", "21:00", "22:30"]);

        let semi = bracket.round(PlayoffRound::Semifinals).next().unwrap();
        assert_eq!(semi.date, NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        assert_eq!(
            semi.home,
            Contender::Pending(PendingQualifier::WinnerOf(BracketRef::new(PlayoffRound::Quarterfinals, 1)))
        );

        let final_match = bracket.round(PlayoffRound::Final).next().unwrap();
        assert_eq!(final_match.date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(final_match.time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        let third = bracket.round(PlayoffRound::ThirdPlace).next().unwrap();
        assert_eq!(third.time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_late_kickoffs_roll_into_next_day() {
        let mut opts = options();
        opts.start_time = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        let bracket = generate_bracket(&seeds(8), &opts, &PlayoffTiming::default()).unwrap();
        let slots: Vec<(NaiveDate, String)> = bracket
            .round(PlayoffRound::Quarterfinals)
            .map(|m| (m.date, time_format::format_time(&m.time)))
            .collect();
        let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
        assert_eq!(
            slots,
            vec![
                (day(1), "22:00".to_string()),
                (day(1), "23:30".to_string()),
                (day(2), "01:00".to_string()),
                (day(2), "02:30".to_string()),
            ]
        );
        assert!(bracket
            .round(PlayoffRound::Quarterfinals)
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| (w[0].date, w[0].time) < (w[1].date, w[1].time)));
    }

    #[test]
    fn test_home_and_away_adds_return_legs() {
        let mut opts = options();
        opts.home_and_away = true;
        let bracket = generate_bracket(&seeds(8), &opts, &PlayoffTiming::default()).unwrap();
        // 8 QF legs, 4 SF legs, third place, final
        assert_eq!(bracket.matches.len(), 14);

        let first = &bracket.matches[0];
        let second = &bracket.matches[1];
        assert_eq!(first.leg, Some(Leg::First));
        assert_eq!(second.leg, Some(Leg::Second));
        assert_eq!(first.home, second.away);
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());

        let semi_return = bracket
            .round(PlayoffRound::Semifinals)
            .find(|m| m.leg == Some(Leg::Second))
            .unwrap();
        assert_eq!(semi_return.date, NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert!(bracket.round(PlayoffRound::Final).all(|m| m.leg.is_none()));
    }

    #[test]
    fn test_four_team_bracket_wire_shape() {
        let mut opts = options();
        opts.third_place_match = false;
        opts.field = 2;
        let bracket = generate_bracket(&seeds(4), &opts, &PlayoffTiming::default()).unwrap();

        assert_json_snapshot!(bracket.matches, @r###"
        [
          {
            "round": "semifinals",
            "position": 1,
            "home": {
              "seed": "s1"
            },
            "away": {
              "seed": "s4"
            },
            "date": "2025-06-01",
            "time": "18:00",
            "field": 2
          },
          {
            "round": "semifinals",
            "position": 2,
            "home": {
              "seed": "s2"
            },
            "away": {
              "seed": "s3"
            },
            "date": "2025-06-01",
            "time": "19:30",
            "field": 2
          },
          {
            "round": "final",
            "position": 1,
            "home": {
              "pending": {
                "winner_of": {
                  "round": "semifinals",
                  "position": 1
                }
              }
            },
            "away": {
              "pending": {
                "winner_of": {
                  "round": "semifinals",
                  "position": 2
                }
              }
            },
            "date": "2025-06-08",
            "time": "18:00",
            "field": 2
          }
        ]
        "###);
    }

    #[test]
    fn test_rejects_bad_sizes_and_duplicates() {
        let timing = PlayoffTiming::default();
        assert!(matches!(
            generate_bracket(&seeds(6), &options(), &timing),
            Err(EngineError::InvalidBracketSize(6))
        ));
        let mut dup = seeds(4);
        dup[3] = dup[0].clone();
        assert!(matches!(generate_bracket(&dup, &options(), &timing), Err(EngineError::DuplicateTeam(_))));
    }

    #[test]
    fn test_seeds_from_standings() {
        use crate::models::Team;
        use crate::standings::calculate_standings;

        let roster: Vec<Team> = (1..=5).map(|i| Team::new(format!("t{i}"), format!("T{i}"))).collect();
        let table = calculate_standings(&roster, &[]);
        assert_eq!(seeds_from_standings(&table, 4).unwrap().len(), 4);
        assert!(matches!(seeds_from_standings(&table, 8), Err(EngineError::NotEnoughTeams { found: 5 })));
        assert!(matches!(seeds_from_standings(&table, 5), Err(EngineError::InvalidBracketSize(5))));
    }
}
