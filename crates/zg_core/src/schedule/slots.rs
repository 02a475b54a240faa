//! Date, time and field assignment over a weekly pattern.
//!
//! The assigner is a fold: each match consumes the current [`Cursor`] and yields the next
//! one. Nothing is mutated in place, so a run can be replayed from any cursor.

use super::round_robin::Round;
use crate::models::{MatchDay, ScheduleConfig, TeamId};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROBE_LIMIT: u32 = 7;

/// First date on or after `date` whose weekday is a match day.
///
/// Gives up after `probe_limit` days and returns `date` unchanged.
pub fn align_to_match_day(date: NaiveDate, days: &[MatchDay], probe_limit: u32) -> NaiveDate {
    let found = (0..=probe_limit as i64)
        .map(|offset| date + Duration::days(offset))
        .find(|candidate| days.contains(&MatchDay::from_weekday(candidate.weekday())));

    match found {
        Some(next) => next,
        None => {
            tracing::warn!(%date, "no match day within probe limit, keeping date");
            date
        }
    }
}

/// First match day strictly after `date`, probing at most `probe_limit` days ahead.
pub fn next_match_date(date: NaiveDate, days: &[MatchDay], probe_limit: u32) -> NaiveDate {
    let found = (1..=probe_limit as i64)
        .map(|offset| date + Duration::days(offset))
        .find(|candidate| days.contains(&MatchDay::from_weekday(candidate.weekday())));

    match found {
        Some(next) => next,
        None => {
            tracing::warn!(%date, "no match day within probe limit, keeping date");
            date
        }
    }
}

/// Scheduling position. `field` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub date: NaiveDate,
    pub time_index: usize,
    pub field: u32,
}

impl Cursor {
    pub fn start(date: NaiveDate) -> Self {
        Self { date, time_index: 0, field: 1 }
    }

    /// Cursor after one match was placed at `self`.
    fn advance(self, config: &ScheduleConfig, probe_limit: u32) -> Self {
        let time_index = self.time_index + 1;
        if time_index < config.time_slots.len() {
            return Self { time_index, ..self };
        }
        let field = self.field + 1;
        if field <= config.field_count {
            return Self { time_index: 0, field, ..self };
        }
        Self::start(next_match_date(self.date, &config.match_days, probe_limit))
    }

    /// Every round opens a fresh matchday, even if the previous one had room left.
    fn next_round(self, config: &ScheduleConfig, probe_limit: u32) -> Self {
        Self::start(next_match_date(self.date, &config.match_days, probe_limit))
    }
}

/// A pairing with a concrete slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlottedMatch {
    pub round: u32,
    pub home: TeamId,
    pub away: TeamId,
    pub date: NaiveDate,
    #[serde(with = "crate::models::time_format")]
    pub time: NaiveTime,
    pub field: u32,
    pub bye: Option<TeamId>,
}

#[derive(Debug, Clone)]
pub struct SlotAssigner<'a> {
    config: &'a ScheduleConfig,
    probe_limit: u32,
}

impl<'a> SlotAssigner<'a> {
    pub fn new(config: &'a ScheduleConfig) -> Self {
        Self { config, probe_limit: DEFAULT_PROBE_LIMIT }
    }

    pub fn with_probe_limit(mut self, probe_limit: u32) -> Self {
        self.probe_limit = probe_limit;
        self
    }

    /// Slot every pairing of `rounds`. Round `k` (1-based) is renumbered to `start_round + k - 1`.
    pub fn assign(&self, rounds: &[Round], start_round: u32, start_date: NaiveDate) -> Vec<SlottedMatch> {
        let mut out = Vec::with_capacity(rounds.iter().map(|r| r.pairings.len()).sum());

        rounds.iter().enumerate().fold(Cursor::start(start_date), |cursor, (index, round)| {
            let number = start_round + index as u32;
            let end = round.pairings.iter().fold(cursor, |cursor, pairing| {
                out.push(SlottedMatch {
                    round: number,
                    home: pairing.home.clone(),
                    away: pairing.away.clone(),
                    date: cursor.date,
                    time: self.time_for(cursor, &pairing.home, &pairing.away),
                    field: cursor.field,
                    bye: round.bye.clone(),
                });
                cursor.advance(self.config, self.probe_limit)
            });
            tracing::debug!(round = number, date = %cursor.date, "round slotted");
            end.next_round(self.config, self.probe_limit)
        });

        out
    }

    fn time_for(&self, cursor: Cursor, home: &TeamId, away: &TeamId) -> NaiveTime {
        let slots = &self.config.time_slots;
        let assigned = slots[cursor.time_index % slots.len()];
        match &self.config.fixed_slot {
            Some(fixed)
                if (&fixed.team_id == home || &fixed.team_id == away)
                    && slots.contains(&fixed.preferred_time) =>
            {
                fixed.preferred_time
            }
            _ => assigned,
        }
    }
}
