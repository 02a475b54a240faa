//! # zg_core - Tournament Scheduling & Standings Engine
//!
//! Deterministic league logic for amateur football tournaments, with a JSON API for the
//! data layer that owns persistence.
//!
//! ## Features
//! - Circle-method round robin with byes and mirrored second legs
//! - Calendar slotting over match days, kick-off times and fields
//! - League table with points, goal difference and goals scored
//! - Seeded 4 and 8 team playoff brackets with pending qualifiers
//! - Mid-season re-planning that never touches played rounds
//!
//! The engine does no I/O of its own. Storage goes through the [`store`] traits.

pub mod api;
pub mod error;
pub mod models;
pub mod playoffs;
pub mod schedule;
pub mod settings;
pub mod standings;
pub mod store;

// Re-export main API functions
pub use api::{
    analyze_calendar_json, calculate_standings_json, generate_fixtures_json, generate_playoffs_json,
    plan_adjustment_json, ApiError, ApiResponse, SCHEMA_VERSION,
};
pub use error::{EngineError, Result};

pub use models::{
    FixedSlot, FixtureRequest, Leg, Match, MatchDay, MatchPhase, MatchStatus, PlayoffRound,
    ScheduleConfig, ScheduleMode, Team, TeamId, TimeBand,
};
pub use playoffs::{
    advance_bracket, generate_bracket, BracketOptions, Contender, PendingQualifier, PlayoffBracket,
    PlayoffMatch,
};
pub use schedule::{
    apply_edit, apply_plan, find_slot_conflicts, generate_fixture, generate_from_request,
    generate_rounds, AdjustOptions, AdjustmentPlan, CalendarAdjuster, GeneratedFixture, MatchEdit,
    SlotAssigner,
};
pub use settings::EngineSettings;
pub use standings::{calculate_standings, team_record, Standings, StandingsRow, TeamRecord};
pub use store::{materialize_bracket, MatchStore, MemoryStore, TeamReader};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
