//! Mid-season calendar adjustment.
//!
//! When teams drop out, every match still in `scheduled` status is thrown away and a fresh
//! round robin over the remaining active teams is slotted after the last finished round.
//! Finished, in-progress and cancelled matches are never touched.

use super::fixtures::{ensure_distinct, slotted_to_match};
use super::round_robin::generate_rounds;
use super::slots::{align_to_match_day, SlotAssigner};
use crate::error::{EngineError, Result};
use crate::models::{time_format, Match, MatchDay, ScheduleConfig, Team, TeamId};
use crate::settings::{EngineSettings, InferenceDefaults};
use crate::store::MatchStore;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const REASON_DEACTIVATED: &str = "team deactivated or not approved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    KeepCurrent,
    Warning,
    Regenerate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMatchStats {
    pub team_id: TeamId,
    pub team_name: String,
    pub total_matches: usize,
    pub finished_matches: usize,
    pub scheduled_matches: usize,
    pub last_match_date: Option<NaiveDate>,
    pub is_active: bool,
    pub inactivity_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentAnalysis {
    pub active_teams: Vec<Team>,
    pub inactive_teams: Vec<TeamMatchStats>,
    pub team_stats: Vec<TeamMatchStats>,
    pub has_odd_teams: bool,
    pub last_finished_round: u32,
    pub suggested_action: SuggestedAction,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceSource {
    /// Read off the tournament's scheduled matches.
    Observed,
    /// Nothing to read from; configured defaults substituted.
    Fallback,
}

/// Weekly pattern recovered from an existing calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferredSchedule {
    pub match_days: Vec<MatchDay>,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    pub slot_minutes: u32,
    pub field_count: u32,
    pub slots_per_day: u32,
    pub source: InferenceSource,
}

impl InferredSchedule {
    pub fn fallback(defaults: &InferenceDefaults) -> Self {
        Self {
            match_days: vec![defaults.match_day],
            start_time: defaults.start_time,
            slot_minutes: defaults.slot_minutes,
            field_count: defaults.field_count,
            slots_per_day: defaults.slots_per_day,
            source: InferenceSource::Fallback,
        }
    }

    /// Kick-off times for one field, spaced `slot_minutes` apart. Stops at midnight.
    pub fn time_slots(&self) -> Vec<NaiveTime> {
        let first = self.start_time.num_seconds_from_midnight() / 60;
        (0..self.slots_per_day.max(1))
            .map(|k| k.checked_mul(self.slot_minutes).and_then(|offset| offset.checked_add(first)))
            .take_while(|minutes| matches!(minutes, Some(m) if *m < 24 * 60))
            .flatten()
            .filter_map(|minutes| NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0))
            .collect()
    }

    pub fn to_config(&self, start_date: NaiveDate, double_round: bool) -> ScheduleConfig {
        ScheduleConfig {
            start_date,
            match_days: self.match_days.clone(),
            time_slots: self.time_slots(),
            field_count: self.field_count.max(1),
            double_round,
            fixed_slot: None,
        }
    }
}

/// Replacement calendar for the unplayed part of the season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Regeneration {
    pub inferred: InferredSchedule,
    pub start_round: u32,
    pub start_date: NaiveDate,
    pub round_count: u32,
    /// Scheduled rows the store must delete before inserting `new_matches`.
    pub replaced: Vec<Match>,
    pub new_matches: Vec<Match>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentPlan {
    pub analysis: AdjustmentAnalysis,
    pub regeneration: Option<Regeneration>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustOptions {
    #[serde(default)]
    pub double_round: bool,
    /// Regenerate even when the analysis does not call for it.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedAdjustment {
    pub deleted: usize,
    pub inserted_ids: Vec<String>,
}

pub struct CalendarAdjuster {
    defaults: InferenceDefaults,
    probe_limit: u32,
}

impl Default for CalendarAdjuster {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}

impl CalendarAdjuster {
    pub fn new(settings: &EngineSettings) -> Self {
        Self { defaults: settings.inference.clone(), probe_limit: settings.weekday_probe_limit }
    }

    /// Classify the roster against the current calendar.
    pub fn analyze(&self, teams: &[Team], matches: &[Match]) -> AdjustmentAnalysis {
        let team_stats: Vec<TeamMatchStats> = teams.iter().map(|t| team_stats(t, matches)).collect();

        let active_teams: Vec<Team> = teams.iter().filter(|t| t.is_active).cloned().collect();
        let inactive_teams: Vec<TeamMatchStats> =
            team_stats.iter().filter(|s| !s.is_active).cloned().collect();
        let has_odd_teams = active_teams.len() % 2 != 0;

        let suggested_action = if inactive_teams.is_empty() {
            SuggestedAction::KeepCurrent
        } else if inactive_teams.iter().all(|s| s.scheduled_matches == 0) {
            SuggestedAction::Warning
        } else {
            SuggestedAction::Regenerate
        };

        let mut message = match suggested_action {
            SuggestedAction::KeepCurrent => {
                format!("All {} teams are active; the current calendar is valid.", active_teams.len())
            }
            SuggestedAction::Warning => format!(
                "{} inactive team(s) have no remaining scheduled matches; the calendar can stay as is.",
                inactive_teams.len()
            ),
            SuggestedAction::Regenerate => format!(
                "{} inactive team(s) still have scheduled matches; regenerate the calendar with the {} active teams.",
                inactive_teams.len(),
                active_teams.len()
            ),
        };
        if has_odd_teams {
            message.push_str(&format!(
                " With an odd number of active teams ({}), one team rests each round.",
                active_teams.len()
            ));
        }

        AdjustmentAnalysis {
            active_teams,
            inactive_teams,
            team_stats,
            has_odd_teams,
            last_finished_round: last_finished_round(matches),
            suggested_action,
            message,
        }
    }

    /// Recover the weekly pattern from the scheduled regular-season matches.
    pub fn infer_schedule(&self, matches: &[Match]) -> InferredSchedule {
        let scheduled: Vec<&Match> =
            matches.iter().filter(|m| m.is_scheduled() && m.is_regular_season()).collect();
        if scheduled.is_empty() {
            tracing::warn!("no scheduled matches to infer from, using default schedule");
            return InferredSchedule::fallback(&self.defaults);
        }

        let match_days: BTreeSet<MatchDay> =
            scheduled.iter().map(|m| MatchDay::from_weekday(m.date.weekday())).collect();

        let mut times_by_date: BTreeMap<NaiveDate, BTreeSet<NaiveTime>> = BTreeMap::new();
        for m in &scheduled {
            times_by_date.entry(m.date).or_default().insert(m.time);
        }

        let max_gap = i64::from(self.defaults.max_slot_gap_minutes);
        let gaps: Vec<i64> = times_by_date
            .values()
            .flat_map(|times| {
                let times: Vec<&NaiveTime> = times.iter().collect();
                times
                    .windows(2)
                    .map(|w| (*w[1] - *w[0]).num_minutes())
                    .collect::<Vec<_>>()
            })
            .filter(|gap| *gap > 0 && *gap <= max_gap)
            .collect();

        let slot_minutes = if gaps.is_empty() {
            self.defaults.slot_minutes
        } else {
            let total: i64 = gaps.iter().sum();
            ((total as f64 / gaps.len() as f64).round() as u32).max(1)
        };

        let start_time = scheduled.iter().map(|m| m.time).min().unwrap_or(self.defaults.start_time);
        let field_count = scheduled.iter().map(|m| m.field).max().unwrap_or(1).max(1);
        let slots_per_day =
            times_by_date.values().map(|times| times.len() as u32).max().unwrap_or(1);

        InferredSchedule {
            match_days: match_days.into_iter().collect(),
            start_time,
            slot_minutes,
            field_count,
            slots_per_day,
            source: InferenceSource::Observed,
        }
    }

    /// Date the replacement calendar starts on.
    pub fn next_start_date(&self, matches: &[Match], days: &[MatchDay], today: NaiveDate) -> NaiveDate {
        let last_round = last_finished_round(matches);
        let base = matches
            .iter()
            .filter(|m| m.is_finished() && m.round == Some(last_round) && last_round > 0)
            .map(|m| m.date)
            .max()
            .map(|last| last + Duration::days(1))
            .unwrap_or(today);
        align_to_match_day(base, days, self.probe_limit)
    }

    /// Build the replacement calendar regardless of the analysis verdict.
    pub fn regenerate(
        &self,
        teams: &[Team],
        matches: &[Match],
        today: NaiveDate,
        double_round: bool,
    ) -> Result<Regeneration> {
        let active: Vec<TeamId> = crate::models::active_team_ids(teams);
        if active.len() < 2 {
            return Err(EngineError::NotEnoughTeams { found: active.len() });
        }
        ensure_distinct(&active)?;

        let inferred = self.infer_schedule(matches);
        let start_round = last_finished_round(matches) + 1;
        let start_date = self.next_start_date(matches, &inferred.match_days, today);
        let config = inferred.to_config(start_date, double_round);

        let rounds = generate_rounds(&active, double_round);
        let new_matches: Vec<Match> = SlotAssigner::new(&config)
            .with_probe_limit(self.probe_limit)
            .assign(&rounds, start_round, start_date)
            .iter()
            .map(slotted_to_match)
            .collect();
        let replaced: Vec<Match> = matches.iter().filter(|m| m.is_scheduled()).cloned().collect();

        tracing::info!(
            start_round,
            %start_date,
            active = active.len(),
            replaced = replaced.len(),
            generated = new_matches.len(),
            "calendar regenerated"
        );

        Ok(Regeneration {
            inferred,
            start_round,
            start_date,
            round_count: rounds.len() as u32,
            replaced,
            new_matches,
        })
    }

    /// Analyze, and regenerate when the verdict is `regenerate` (or when forced).
    pub fn plan(
        &self,
        teams: &[Team],
        matches: &[Match],
        today: NaiveDate,
        options: AdjustOptions,
    ) -> Result<AdjustmentPlan> {
        let analysis = self.analyze(teams, matches);
        let wanted = options.force || analysis.suggested_action == SuggestedAction::Regenerate;
        let regeneration = if wanted {
            Some(self.regenerate(teams, matches, today, options.double_round)?)
        } else {
            None
        };
        Ok(AdjustmentPlan { analysis, regeneration })
    }
}

/// Delete the scheduled rows, then insert the replacement calendar.
///
/// The caller must hold the tournament's lock or transaction for the whole call.
pub fn apply_plan<S: MatchStore + ?Sized>(
    store: &mut S,
    tournament_id: &str,
    plan: &AdjustmentPlan,
) -> Result<AppliedAdjustment> {
    let Some(regeneration) = &plan.regeneration else {
        return Ok(AppliedAdjustment { deleted: 0, inserted_ids: Vec::new() });
    };

    let deleted = store.delete_scheduled(tournament_id)?;
    let inserted_ids = store.insert_matches(tournament_id, regeneration.new_matches.clone())?;
    tracing::info!(tournament_id, deleted, inserted = inserted_ids.len(), "calendar adjustment applied");
    Ok(AppliedAdjustment { deleted, inserted_ids })
}

/// Highest round number holding a finished match, 0 when nothing is finished.
pub fn last_finished_round(matches: &[Match]) -> u32 {
    matches.iter().filter(|m| m.is_finished()).filter_map(|m| m.round).max().unwrap_or(0)
}

fn team_stats(team: &Team, matches: &[Match]) -> TeamMatchStats {
    let own: Vec<&Match> = matches.iter().filter(|m| m.involves(&team.id)).collect();
    let finished: Vec<&&Match> = own.iter().filter(|m| m.is_finished()).collect();
    let scheduled_matches = own.iter().filter(|m| m.is_scheduled()).count();

    TeamMatchStats {
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        total_matches: own.len(),
        finished_matches: finished.len(),
        scheduled_matches,
        last_match_date: finished.iter().map(|m| m.date).max(),
        is_active: team.is_active,
        inactivity_reason: (!team.is_active).then(|| REASON_DEACTIVATED.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn row(round: u32, home: &str, away: &str, day: NaiveDate, time: NaiveTime, field: u32) -> Match {
        Match::scheduled(round, TeamId::from(home), TeamId::from(away), day, time, field)
    }

    fn roster() -> Vec<Team> {
        vec![Team::new("a", "A"), Team::new("b", "B"), Team::new("c", "C"), Team::new("d", "D")]
    }

    #[test]
    fn test_all_active_keeps_calendar() {
        let analysis = CalendarAdjuster::default().analyze(&roster(), &[]);
        assert_eq!(analysis.suggested_action, SuggestedAction::KeepCurrent);
        assert!(!analysis.has_odd_teams);
        assert_eq!(analysis.last_finished_round, 0);
    }

    #[test]
    fn test_inactive_team_without_pending_matches_only_warns() {
        let mut teams = roster();
        teams[3] = teams[3].clone().inactive();
        let matches = vec![row(1, "a", "d", date(3, 2), hm(8, 0), 1).with_result(2, 0)];
        let analysis = CalendarAdjuster::default().analyze(&teams, &matches);

        assert_eq!(analysis.suggested_action, SuggestedAction::Warning);
        assert!(analysis.has_odd_teams);
        assert_eq!(analysis.inactive_teams.len(), 1);
        assert_eq!(analysis.inactive_teams[0].finished_matches, 1);
        assert_eq!(analysis.inactive_teams[0].inactivity_reason.as_deref(), Some(REASON_DEACTIVATED));
        assert_eq!(analysis.inactive_teams[0].last_match_date, Some(date(3, 2)));
    }

    #[test]
    fn test_inactive_team_with_pending_matches_regenerates() {
        let mut teams = roster();
        teams[3] = teams[3].clone().inactive();
        let matches = vec![row(2, "a", "d", date(3, 9), hm(8, 0), 1)];
        let analysis = CalendarAdjuster::default().analyze(&teams, &matches);
        assert_eq!(analysis.suggested_action, SuggestedAction::Regenerate);
        assert_eq!(analysis.inactive_teams[0].scheduled_matches, 1);
    }

    #[test]
    fn test_inference_reads_days_times_and_fields() {
        let matches = vec![
            row(4, "a", "b", date(3, 23), hm(8, 0), 1),
            row(4, "c", "d", date(3, 23), hm(9, 15), 1),
            row(4, "e", "f", date(3, 23), hm(8, 0), 2),
            row(5, "a", "c", date(3, 29), hm(8, 0), 1),
            row(5, "b", "d", date(3, 29), hm(18, 0), 1),
        ];
        let inferred = CalendarAdjuster::default().infer_schedule(&matches);

        assert_eq!(inferred.source, InferenceSource::Observed);
        assert_eq!(inferred.match_days, vec![MatchDay::Saturday, MatchDay::Sunday]);
        assert_eq!(inferred.start_time, hm(8, 0));
        // 600-minute gap on the 29th is a day boundary, not slot spacing
        assert_eq!(inferred.slot_minutes, 75);
        assert_eq!(inferred.field_count, 2);
        assert_eq!(inferred.slots_per_day, 2);
        assert_eq!(inferred.time_slots(), vec![hm(8, 0), hm(9, 15)]);
    }

    #[test]
    fn test_time_slots_stop_at_midnight_for_huge_spacing() {
        let mut inferred = InferredSchedule::fallback(&InferenceDefaults::default());
        inferred.slot_minutes = u32::MAX;
        inferred.slots_per_day = 4;
        assert_eq!(inferred.time_slots(), vec![hm(8, 0)]);

        inferred.start_time = hm(22, 0);
        inferred.slot_minutes = 90;
        assert_eq!(inferred.time_slots(), vec![hm(22, 0), hm(23, 30)]);
    }

    #[test]
    fn test_inference_falls_back_without_scheduled_matches() {
        let finished = vec![row(1, "a", "b", date(3, 2), hm(10, 0), 3).with_result(0, 0)];
        let inferred = CalendarAdjuster::default().infer_schedule(&finished);
        assert_eq!(inferred.source, InferenceSource::Fallback);
        assert_eq!(inferred.match_days, vec![MatchDay::Sunday]);
        assert_eq!(inferred.start_time, hm(8, 0));
        assert_eq!(inferred.slot_minutes, 75);
        assert_eq!(inferred.field_count, 2);
        assert_eq!(inferred.time_slots(), vec![hm(8, 0), hm(9, 15), hm(10, 30), hm(11, 45)]);
    }

    #[test]
    fn test_time_slots_stop_at_midnight() {
        let mut inferred = InferredSchedule::fallback(&InferenceDefaults::default());
        inferred.start_time = hm(22, 0);
        inferred.slot_minutes = 90;
        assert_eq!(inferred.time_slots(), vec![hm(22, 0), hm(23, 30)]);
    }

    #[test]
    fn test_start_date_follows_last_finished_round() {
        let adjuster = CalendarAdjuster::default();
        let matches = vec![
            row(1, "a", "b", date(3, 2), hm(8, 0), 1).with_result(1, 1),
            row(2, "a", "c", date(3, 9), hm(8, 0), 1).with_result(2, 1),
            row(3, "a", "d", date(3, 16), hm(8, 0), 1),
        ];
        let start = adjuster.next_start_date(&matches, &[MatchDay::Sunday], date(6, 1));
        assert_eq!(start, date(3, 16));

        let start = adjuster.next_start_date(&[], &[MatchDay::Wednesday], date(6, 1));
        assert_eq!(start, date(6, 4));
    }

    #[test]
    fn test_regeneration_numbers_after_history() {
        let mut teams = roster();
        teams.push(Team::new("e", "E").inactive());
        let matches = vec![
            row(1, "a", "b", date(3, 2), hm(8, 0), 1).with_result(1, 0),
            row(1, "c", "e", date(3, 2), hm(9, 15), 1).with_result(0, 3),
            row(2, "a", "e", date(3, 9), hm(8, 0), 1),
            row(2, "b", "c", date(3, 9), hm(9, 15), 1),
        ];
        let plan = CalendarAdjuster::default()
            .plan(&teams, &matches, date(6, 1), AdjustOptions::default())
            .unwrap();

        assert_eq!(plan.analysis.suggested_action, SuggestedAction::Regenerate);
        let regen = plan.regeneration.unwrap();
        assert_eq!(regen.start_round, 2);
        assert_eq!(regen.start_date, date(3, 9));
        assert_eq!(regen.round_count, 3);
        assert_eq!(regen.replaced.len(), 2);
        assert!(regen.new_matches.iter().all(|m| m.round.unwrap() >= 2));
        assert!(regen.new_matches.iter().all(|m| m.status == MatchStatus::Scheduled));
        assert!(regen.new_matches.iter().all(|m| !m.involves(&TeamId::from("e"))));
    }

    #[test]
    fn test_plan_skips_regeneration_when_not_needed() {
        let plan = CalendarAdjuster::default()
            .plan(&roster(), &[], date(6, 1), AdjustOptions::default())
            .unwrap();
        assert!(plan.regeneration.is_none());

        let forced = CalendarAdjuster::default()
            .plan(&roster(), &[], date(6, 1), AdjustOptions { force: true, double_round: false })
            .unwrap();
        assert_eq!(forced.regeneration.unwrap().new_matches.len(), 6);
    }

    #[test]
    fn test_regenerate_needs_two_active_teams() {
        let teams = vec![Team::new("a", "A"), Team::new("b", "B").inactive()];
        let err = CalendarAdjuster::default().regenerate(&teams, &[], date(6, 1), false).unwrap_err();
        assert!(matches!(err, EngineError::NotEnoughTeams { found: 1 }));
    }
}
