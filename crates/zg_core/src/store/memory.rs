use super::{MatchStore, TeamReader};
use crate::error::{EngineError, Result};
use crate::models::{Match, Team};
use std::collections::HashMap;
use uuid::Uuid;

/// In-process store keyed by tournament id. Rows keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    teams: HashMap<String, Vec<Team>>,
    matches: HashMap<String, Vec<Match>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teams(mut self, tournament_id: &str, teams: Vec<Team>) -> Self {
        self.set_teams(tournament_id, teams);
        self
    }

    pub fn set_teams(&mut self, tournament_id: &str, teams: Vec<Team>) {
        self.teams.insert(tournament_id.to_string(), teams);
    }

    /// Replace a stored row by id.
    pub fn update_match(&mut self, tournament_id: &str, updated: Match) -> Result<()> {
        let id = updated
            .id
            .clone()
            .ok_or_else(|| EngineError::Store("match without id".to_string()))?;
        let slot = self
            .matches
            .get_mut(tournament_id)
            .and_then(|rows| rows.iter_mut().find(|m| m.id.as_deref() == Some(id.as_str())))
            .ok_or(EngineError::MatchNotFound(id))?;
        *slot = updated;
        Ok(())
    }
}

impl TeamReader for MemoryStore {
    fn teams(&self, tournament_id: &str) -> Result<Vec<Team>> {
        Ok(self.teams.get(tournament_id).cloned().unwrap_or_default())
    }
}

impl MatchStore for MemoryStore {
    fn matches(&self, tournament_id: &str) -> Result<Vec<Match>> {
        Ok(self.matches.get(tournament_id).cloned().unwrap_or_default())
    }

    fn insert_matches(&mut self, tournament_id: &str, matches: Vec<Match>) -> Result<Vec<String>> {
        // all or nothing
        if let Some(bad) = matches.iter().find(|m| m.home_team_id == m.away_team_id) {
            return Err(EngineError::SameTeam(bad.home_team_id.clone()));
        }
        let rows = self.matches.entry(tournament_id.to_string()).or_default();
        let mut ids = Vec::with_capacity(matches.len());
        for mut m in matches {
            let id = m.id.get_or_insert_with(|| Uuid::new_v4().to_string()).clone();
            ids.push(id);
            rows.push(m);
        }
        Ok(ids)
    }

    fn delete_scheduled(&mut self, tournament_id: &str) -> Result<usize> {
        let Some(rows) = self.matches.get_mut(tournament_id) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|m| !m.is_scheduled());
        Ok(before - rows.len())
    }
}
