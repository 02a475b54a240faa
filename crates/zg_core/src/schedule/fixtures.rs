use super::round_robin::generate_rounds;
use super::slots::{SlotAssigner, SlottedMatch};
use crate::error::{EngineError, Result};
use crate::models::{FixtureRequest, Match, ScheduleConfig, TeamId};
use serde::Serialize;
use std::collections::HashSet;

/// Full regular-season calendar, ready for the match store.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFixture {
    pub tournament_id: String,
    pub round_count: u32,
    pub fixtures: Vec<SlottedMatch>,
}

impl GeneratedFixture {
    /// Store rows, status scheduled, each tagged with its round's resting team.
    pub fn to_matches(&self) -> Vec<Match> {
        self.fixtures.iter().map(slotted_to_match).collect()
    }

    pub fn bye_rounds(&self) -> Vec<(u32, TeamId)> {
        let mut byes: Vec<(u32, TeamId)> =
            self.fixtures.iter().filter_map(|m| Some((m.round, m.bye.clone()?))).collect();
        byes.dedup();
        byes
    }
}

pub(crate) fn slotted_to_match(slotted: &SlottedMatch) -> Match {
    let mut row = Match::scheduled(
        slotted.round,
        slotted.home.clone(),
        slotted.away.clone(),
        slotted.date,
        slotted.time,
        slotted.field,
    );
    row.bye_team_id = slotted.bye.clone();
    row
}

pub(crate) fn ensure_distinct(teams: &[TeamId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(teams.len());
    for team in teams {
        if !seen.insert(team) {
            return Err(EngineError::DuplicateTeam(team.clone()));
        }
    }
    Ok(())
}

/// Round-robin calendar for `active_teams` starting at `config.start_date`.
pub fn generate_fixture(
    tournament_id: &str,
    active_teams: &[TeamId],
    config: &ScheduleConfig,
) -> Result<GeneratedFixture> {
    if tournament_id.trim().is_empty() {
        return Err(EngineError::MissingTournament);
    }
    config.validate()?;
    if active_teams.len() < 2 {
        return Err(EngineError::NotEnoughTeams { found: active_teams.len() });
    }
    ensure_distinct(active_teams)?;

    let rounds = generate_rounds(active_teams, config.double_round);
    let fixtures = SlotAssigner::new(config).assign(&rounds, 1, config.start_date);

    tracing::info!(
        tournament_id,
        teams = active_teams.len(),
        rounds = rounds.len(),
        matches = fixtures.len(),
        "fixture generated"
    );

    Ok(GeneratedFixture {
        tournament_id: tournament_id.to_string(),
        round_count: rounds.len() as u32,
        fixtures,
    })
}

/// Resolve a raw request and generate in one step.
pub fn generate_from_request(request: &FixtureRequest, active_teams: &[TeamId]) -> Result<GeneratedFixture> {
    let (tournament_id, config) = request.resolve()?;
    generate_fixture(&tournament_id, active_teams, &config)
}
