use crate::models::{MatchStatus, TeamId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing tournament id")]
    MissingTournament,

    #[error("Missing start date")]
    MissingStartDate,

    #[error("Not enough active teams: found {found}, need at least 2")]
    NotEnoughTeams { found: usize },

    #[error("No match days configured")]
    EmptyMatchDays,

    #[error("No time slots configured")]
    EmptyTimeSlots,

    #[error("Invalid field count: {0}")]
    InvalidFieldCount(u32),

    #[error("Invalid bracket size: {0} (expected 4 or 8)")]
    InvalidBracketSize(usize),

    #[error("Team listed more than once: {0}")]
    DuplicateTeam(TeamId),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Match cannot be edited while {status:?}")]
    NotEditable { status: MatchStatus },

    #[error("Team cannot play itself: {0}")]
    SameTeam(TeamId),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Invalid engine settings: {0}")]
    InvalidSettings(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Caller-side configuration problems. Nothing is generated when one of these is returned.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::MissingTournament
                | EngineError::MissingStartDate
                | EngineError::NotEnoughTeams { .. }
                | EngineError::EmptyMatchDays
                | EngineError::EmptyTimeSlots
                | EngineError::InvalidFieldCount(_)
                | EngineError::InvalidBracketSize(_)
                | EngineError::DuplicateTeam(_)
        )
    }

    /// Stable machine-readable code for the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            e if e.is_configuration_error() => "configuration_error",
            EngineError::InvalidTime(_) | EngineError::Json(_) => "invalid_request",
            EngineError::NotEditable { .. } | EngineError::SameTeam(_) => "invalid_edit",
            EngineError::MatchNotFound(_) => "not_found",
            EngineError::InvalidSettings(_) => "invalid_settings",
            _ => "store_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_grouped() {
        assert!(EngineError::MissingStartDate.is_configuration_error());
        assert!(EngineError::NotEnoughTeams { found: 1 }.is_configuration_error());
        assert!(EngineError::EmptyMatchDays.is_configuration_error());
        assert!(!EngineError::Store("down".into()).is_configuration_error());
        assert!(!EngineError::SameTeam(TeamId::from("a")).is_configuration_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(EngineError::InvalidFieldCount(0).code(), "configuration_error");
        assert_eq!(EngineError::InvalidTime("25:00".into()).code(), "invalid_request");
        assert_eq!(
            EngineError::NotEditable { status: MatchStatus::Finished }.code(),
            "invalid_edit"
        );
        assert_eq!(EngineError::Store("x".into()).code(), "store_error");
    }

    #[test]
    fn test_display_messages() {
        let err = EngineError::NotEnoughTeams { found: 1 };
        assert_eq!(err.to_string(), "Not enough active teams: found 1, need at least 2");
    }
}
