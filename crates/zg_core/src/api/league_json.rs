// JSON entry points for fixtures, standings and playoffs.

use super::response::{parse_request, respond};
use crate::error::Result;
use crate::models::{active_team_ids, active_teams, FixtureRequest, Match, Team, TeamId};
use crate::playoffs::{generate_bracket, seeds_from_standings, BracketOptions, PlayoffBracket};
use crate::schedule::generate_from_request;
use crate::settings::EngineSettings;
use crate::standings::{calculate_standings, Standings};
use crate::store::{materialize_bracket, MaterializedBracket};
use serde::{Deserialize, Serialize};

// ========== Requests ==========

#[derive(Debug, Deserialize)]
pub struct FixturesRequest {
    pub request: FixtureRequest,
    pub teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsRequest {
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Deserialize)]
pub struct PlayoffsRequest {
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
    pub size: usize,
    pub options: BracketOptions,
}

// ========== Responses ==========

#[derive(Debug, Serialize)]
pub struct RoundBye {
    pub round: u32,
    pub team_id: TeamId,
}

#[derive(Debug, Serialize)]
pub struct FixturesData {
    pub tournament_id: String,
    pub round_count: u32,
    pub matches: Vec<Match>,
    pub byes: Vec<RoundBye>,
}

#[derive(Debug, Serialize)]
pub struct PlayoffsData {
    pub seeds: Vec<TeamId>,
    pub bracket: PlayoffBracket,
    /// Rows ready for a store that needs real teams in every slot.
    pub rows: MaterializedBracket,
}

// ========== Public API Functions ==========

/// Regular-season calendar for the active teams in the request.
pub fn generate_fixtures_json(request_json: &str) -> String {
    respond(parse_request::<FixturesRequest>(request_json).and_then(|req| {
        let fixture = generate_from_request(&req.request, &active_team_ids(&req.teams))?;
        Ok(FixturesData {
            tournament_id: fixture.tournament_id.clone(),
            round_count: fixture.round_count,
            matches: fixture.to_matches(),
            byes: fixture.bye_rounds().into_iter().map(|(round, team_id)| RoundBye { round, team_id }).collect(),
        })
    }))
}

pub fn calculate_standings_json(request_json: &str) -> String {
    respond(
        parse_request::<StandingsRequest>(request_json)
            .map(|req| calculate_standings(&req.teams, &req.matches)),
    )
}

/// Seeds the top of the table into a bracket and materializes it for storage.
pub fn generate_playoffs_json(request_json: &str) -> String {
    respond(parse_request::<PlayoffsRequest>(request_json).and_then(playoffs))
}

fn playoffs(req: PlayoffsRequest) -> Result<PlayoffsData> {
    let settings = EngineSettings::from_env()?;
    let table: Standings = calculate_standings(&active_teams(&req.teams), &req.matches);
    let seeds = seeds_from_standings(&table, req.size)?;
    let bracket = generate_bracket(&seeds, &req.options, &settings.playoffs)?;
    let rows = materialize_bracket(&bracket, &seeds)?;
    Ok(PlayoffsData { seeds, bracket, rows })
}
