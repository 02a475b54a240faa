//! File-backed driver for zg_core.
//!
//! A snapshot is one tournament as JSON: `{ "tournament_id", "teams", "matches" }`. The
//! commands load it, run the engine, and optionally write the result back.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use zg_core::models::{active_team_ids, active_teams};
use zg_core::playoffs::seeds_from_standings;
use zg_core::schedule::{AppliedAdjustment, SuggestedAction};
use zg_core::store::MaterializedBracket;
use zg_core::{
    apply_plan, calculate_standings, generate_bracket, generate_from_request, materialize_bracket,
    AdjustOptions, AdjustmentPlan, BracketOptions, CalendarAdjuster, EngineSettings, FixtureRequest,
    Match, MatchStore, MemoryStore, PlayoffBracket, Standings, Team, TeamId, TeamReader,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub tournament_id: String,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

/// One tournament held in memory, loaded from and saved to a snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    tournament_id: String,
    inner: MemoryStore,
}

impl SnapshotStore {
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        if snapshot.tournament_id.trim().is_empty() {
            bail!("snapshot has an empty tournament_id");
        }
        let mut inner = MemoryStore::new().with_teams(&snapshot.tournament_id, snapshot.teams);
        inner
            .insert_matches(&snapshot.tournament_id, snapshot.matches)
            .context("snapshot holds an invalid match row")?;
        Ok(Self { tournament_id: snapshot.tournament_id, inner })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
        Self::from_snapshot(snapshot)
    }

    pub fn tournament_id(&self) -> &str {
        &self.tournament_id
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            tournament_id: self.tournament_id.clone(),
            teams: self.inner.teams(&self.tournament_id)?,
            matches: self.inner.matches(&self.tournament_id)?,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot()?)?;
        fs::write(path, json).with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn check(&self, tournament_id: &str) -> zg_core::Result<()> {
        if tournament_id == self.tournament_id {
            Ok(())
        } else {
            Err(zg_core::EngineError::Store(format!(
                "snapshot holds tournament '{}', not '{tournament_id}'",
                self.tournament_id
            )))
        }
    }
}

impl TeamReader for SnapshotStore {
    fn teams(&self, tournament_id: &str) -> zg_core::Result<Vec<Team>> {
        self.check(tournament_id)?;
        self.inner.teams(tournament_id)
    }
}

impl MatchStore for SnapshotStore {
    fn matches(&self, tournament_id: &str) -> zg_core::Result<Vec<Match>> {
        self.check(tournament_id)?;
        self.inner.matches(tournament_id)
    }

    fn insert_matches(&mut self, tournament_id: &str, matches: Vec<Match>) -> zg_core::Result<Vec<String>> {
        self.check(tournament_id)?;
        self.inner.insert_matches(tournament_id, matches)
    }

    fn delete_scheduled(&mut self, tournament_id: &str) -> zg_core::Result<usize> {
        self.check(tournament_id)?;
        self.inner.delete_scheduled(tournament_id)
    }
}

// ========== Commands ==========

#[derive(Debug, Serialize)]
pub struct FixturesOutput {
    pub tournament_id: String,
    pub round_count: u32,
    pub byes: Vec<(u32, TeamId)>,
    pub matches: Vec<Match>,
    pub inserted: usize,
}

/// Generate the regular season for the snapshot's active teams.
///
/// A request without a tournament id takes the snapshot's. Writing is refused when the
/// snapshot already has regular-season matches.
pub fn run_fixtures(store: &mut SnapshotStore, mut request: FixtureRequest, write: bool) -> Result<FixturesOutput> {
    let tid = store.tournament_id().to_string();
    if request.tournament_id.is_none() {
        request.tournament_id = Some(tid.clone());
    }
    let teams = store.teams(&tid)?;
    let fixture = generate_from_request(&request, &active_team_ids(&teams))?;
    let matches = fixture.to_matches();

    let mut inserted = 0;
    if write {
        if store.matches(&tid)?.iter().any(Match::is_regular_season) {
            bail!("tournament '{tid}' already has a regular-season calendar; use `adjust` instead");
        }
        inserted = store.insert_matches(&tid, matches.clone())?.len();
    }

    Ok(FixturesOutput {
        tournament_id: fixture.tournament_id.clone(),
        round_count: fixture.round_count,
        byes: fixture.bye_rounds(),
        matches,
        inserted,
    })
}

pub fn run_standings(store: &SnapshotStore) -> Result<Standings> {
    let tid = store.tournament_id();
    Ok(calculate_standings(&store.teams(tid)?, &store.matches(tid)?))
}

#[derive(Debug, Serialize)]
pub struct PlayoffsOutput {
    pub seeds: Vec<TeamId>,
    pub bracket: PlayoffBracket,
    pub rows: MaterializedBracket,
    pub inserted: usize,
}

pub fn run_playoffs(
    store: &mut SnapshotStore,
    size: usize,
    options: &BracketOptions,
    settings: &EngineSettings,
    write: bool,
) -> Result<PlayoffsOutput> {
    let tid = store.tournament_id().to_string();
    let table = calculate_standings(&active_teams(&store.teams(&tid)?), &store.matches(&tid)?);
    let seeds = seeds_from_standings(&table, size)?;
    let bracket = generate_bracket(&seeds, options, &settings.playoffs)?;
    let rows = materialize_bracket(&bracket, &seeds)?;

    let inserted = if write { store.insert_matches(&tid, rows.matches.clone())?.len() } else { 0 };
    if rows.needs_manual_assignment > 0 {
        tracing::warn!(
            count = rows.needs_manual_assignment,
            "playoff matches need their teams assigned once earlier rounds finish"
        );
    }
    Ok(PlayoffsOutput { seeds, bracket, rows, inserted })
}

#[derive(Debug, Serialize)]
pub struct AdjustOutput {
    pub plan: AdjustmentPlan,
    pub applied: Option<AppliedAdjustment>,
}

pub fn run_adjust(
    store: &mut SnapshotStore,
    today: NaiveDate,
    options: AdjustOptions,
    settings: &EngineSettings,
    write: bool,
) -> Result<AdjustOutput> {
    let tid = store.tournament_id().to_string();
    let plan = CalendarAdjuster::new(settings).plan(&store.teams(&tid)?, &store.matches(&tid)?, today, options)?;

    if plan.analysis.suggested_action == SuggestedAction::Warning {
        tracing::warn!("{}", plan.analysis.message);
    }
    let applied = if write && plan.regeneration.is_some() { Some(apply_plan(store, &tid, &plan)?) } else { None };
    Ok(AdjustOutput { plan, applied })
}
