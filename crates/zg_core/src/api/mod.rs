pub mod calendar_json;
pub mod league_json;
pub mod response;

pub use calendar_json::{
    analyze_calendar_json, plan_adjustment_json, AnalyzeCalendarRequest, CalendarAnalysisData,
    PlanAdjustmentRequest,
};
pub use league_json::{
    calculate_standings_json, generate_fixtures_json, generate_playoffs_json, FixturesData,
    FixturesRequest, PlayoffsData, PlayoffsRequest, RoundBye, StandingsRequest,
};
pub use response::{ApiError, ApiResponse, SCHEMA_VERSION};
