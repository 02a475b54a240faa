pub mod record;
pub mod table;

pub use record::{team_record, FormResult, TeamRecord};
pub use table::{calculate_standings, Standings, StandingsRow, POINTS_DRAW, POINTS_WIN};
