use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned team identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TeamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

fn default_active() -> bool {
    true
}

/// Team as read from the league store. Treated as immutable during a scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: TeamId::new(id), name: name.into(), is_active: true }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Ids of the active teams, in roster order.
pub fn active_team_ids(teams: &[Team]) -> Vec<TeamId> {
    teams.iter().filter(|t| t.is_active).map(|t| t.id.clone()).collect()
}

/// The active part of the roster, in roster order. Playoff seeding ranks only these.
pub fn active_teams(teams: &[Team]) -> Vec<Team> {
    teams.iter().filter(|t| t.is_active).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_defaults_to_active_when_flag_missing() {
        let team: Team = serde_json::from_str(r#"{"id":"t1","name":"Halcones"}"#).unwrap();
        assert!(team.is_active);
        assert_eq!(team.id, TeamId::from("t1"));
    }

    #[test]
    fn test_active_team_ids_keeps_roster_order() {
        let teams = vec![
            Team::new("a", "A"),
            Team::new("b", "B").inactive(),
            Team::new("c", "C"),
        ];
        assert_eq!(active_team_ids(&teams), vec![TeamId::from("a"), TeamId::from("c")]);
        let active = active_teams(&teams);
        let kept: Vec<&str> = active.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(kept, vec!["a", "c"]);
    }
}
