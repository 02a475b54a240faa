//! Writing an unfinished bracket into stores that require two distinct real teams per row.
//!
//! Pending slots are filled with roster teams and counted, so the caller can tell the operator
//! how many rows still need their real participants.

use crate::error::{EngineError, Result};
use crate::models::{Match, TeamId};
use crate::playoffs::{Contender, PlayoffBracket};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedBracket {
    pub matches: Vec<Match>,
    /// Rows carrying at least one stand-in team.
    pub needs_manual_assignment: usize,
}

fn stand_in(roster: &[TeamId], other: Option<&TeamId>) -> Option<TeamId> {
    roster.iter().find(|team| Some(*team) != other).cloned()
}

pub fn materialize_bracket(bracket: &PlayoffBracket, roster: &[TeamId]) -> Result<MaterializedBracket> {
    if roster.len() < 2 {
        return Err(EngineError::NotEnoughTeams { found: roster.len() });
    }

    let mut matches = Vec::with_capacity(bracket.matches.len());
    let mut needs_manual_assignment = 0;
    for pm in &bracket.matches {
        let known_home = pm.home.team();
        let known_away = pm.away.team();
        let home = match known_home {
            Some(team) => team.clone(),
            None => stand_in(roster, known_away).ok_or(EngineError::NotEnoughTeams { found: roster.len() })?,
        };
        let away = match known_away {
            Some(team) => team.clone(),
            None => stand_in(roster, Some(&home)).ok_or(EngineError::NotEnoughTeams { found: roster.len() })?,
        };
        if matches!(pm.home, Contender::Pending(_)) || matches!(pm.away, Contender::Pending(_)) {
            needs_manual_assignment += 1;
        }
        matches.push(pm.to_match(home, away));
    }

    if needs_manual_assignment > 0 {
        tracing::warn!(needs_manual_assignment, "playoff rows stored with stand-in teams");
    }
    Ok(MaterializedBracket { matches, needs_manual_assignment })
}
