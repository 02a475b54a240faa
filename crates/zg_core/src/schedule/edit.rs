//! Manual calendar edits and slot bookkeeping.

use crate::error::{EngineError, Result};
use crate::models::{time_format, Match, TeamId};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partial update of a scheduled match. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEdit {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "optional_time")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub field: Option<u32>,
    #[serde(default)]
    pub home_team_id: Option<TeamId>,
    #[serde(default)]
    pub away_team_id: Option<TeamId>,
}

mod optional_time {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&time_format::format_time(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| time_format::parse_time(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Apply `edit` to a copy of `current`. Only scheduled matches are editable.
pub fn apply_edit(current: &Match, edit: &MatchEdit) -> Result<Match> {
    if !current.is_scheduled() {
        return Err(EngineError::NotEditable { status: current.status });
    }

    let mut updated = current.clone();
    if let Some(date) = edit.date {
        updated.date = date;
    }
    if let Some(time) = edit.time {
        updated.time = time;
    }
    if let Some(field) = edit.field {
        if field == 0 {
            return Err(EngineError::InvalidFieldCount(field));
        }
        updated.field = field;
    }
    if let Some(home) = &edit.home_team_id {
        updated.home_team_id = home.clone();
    }
    if let Some(away) = &edit.away_team_id {
        updated.away_team_id = away.clone();
    }

    if updated.home_team_id == updated.away_team_id {
        return Err(EngineError::SameTeam(updated.home_team_id));
    }
    Ok(updated)
}

/// A (date, time, field) triple booked by more than one non-cancelled match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotConflict {
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub time: NaiveTime,
    pub field: u32,
    /// Positions in the input slice.
    pub matches: Vec<usize>,
}

pub fn find_slot_conflicts(matches: &[Match]) -> Vec<SlotConflict> {
    let mut booked: BTreeMap<(NaiveDate, NaiveTime, u32), Vec<usize>> = BTreeMap::new();
    for (index, m) in matches.iter().enumerate() {
        if m.status == crate::models::MatchStatus::Cancelled {
            continue;
        }
        booked.entry((m.date, m.time, m.field)).or_default().push(index);
    }

    booked
        .into_iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|((date, time, field), matches)| SlotConflict { date, time, field, matches })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    fn scheduled(home: &str, away: &str, h: u32, field: u32) -> Match {
        Match::scheduled(
            1,
            TeamId::from(home),
            TeamId::from(away),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
            field,
        )
    }

    #[test]
    fn test_edit_moves_date_time_and_field() {
        let m = scheduled("a", "b", 8, 1);
        let edit = MatchEdit {
            date: NaiveDate::from_ymd_opt(2025, 3, 9),
            time: NaiveTime::from_hms_opt(11, 0, 0),
            field: Some(2),
            ..Default::default()
        };
        let updated = apply_edit(&m, &edit).unwrap();
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(updated.time, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
        assert_eq!(updated.field, 2);
        assert_eq!(updated.home_team_id, m.home_team_id);
    }

    #[test]
    fn test_finished_match_is_locked() {
        let m = scheduled("a", "b", 8, 1).with_result(1, 0);
        let err = apply_edit(&m, &MatchEdit { field: Some(2), ..Default::default() }).unwrap_err();
        assert!(matches!(err, EngineError::NotEditable { status: MatchStatus::Finished }));
    }

    #[test]
    fn test_edit_cannot_pair_team_with_itself() {
        let m = scheduled("a", "b", 8, 1);
        let edit = MatchEdit { away_team_id: Some(TeamId::from("a")), ..Default::default() };
        assert!(matches!(apply_edit(&m, &edit), Err(EngineError::SameTeam(_))));
    }

    #[test]
    fn test_edit_rejects_field_zero() {
        let m = scheduled("a", "b", 8, 1);
        let edit = MatchEdit { field: Some(0), ..Default::default() };
        assert!(matches!(apply_edit(&m, &edit), Err(EngineError::InvalidFieldCount(0))));
    }

    #[test]
    fn test_conflicts_report_double_bookings() {
        let mut cancelled = scheduled("e", "f", 8, 1);
        cancelled.status = MatchStatus::Cancelled;
        let matches = vec![
            scheduled("a", "b", 8, 1),
            scheduled("c", "d", 8, 1),
            scheduled("e", "f", 8, 2),
            cancelled,
        ];
        let conflicts = find_slot_conflicts(&matches);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].matches, vec![0, 1]);
        assert_eq!(conflicts[0].field, 1);
    }

    #[test]
    fn test_edit_from_json() {
        let edit: MatchEdit = serde_json::from_str(r#"{"time": "12:30", "field": 3}"#).unwrap();
        assert_eq!(edit.time, NaiveTime::from_hms_opt(12, 30, 0));
        assert_eq!(edit.date, None);
    }
}
