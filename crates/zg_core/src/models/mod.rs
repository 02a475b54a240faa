// Domain model shared by every engine component.

pub mod fixture;
pub mod schedule;
pub mod team;
pub mod time_format;

pub use fixture::{Leg, Match, MatchPhase, MatchStatus, PlayoffRound};
pub use schedule::{FixedSlot, FixtureRequest, MatchDay, ScheduleConfig, ScheduleMode, TimeBand};
pub use team::{active_team_ids, active_teams, Team, TeamId};
