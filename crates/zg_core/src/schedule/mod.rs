// Regular-season calendar: pairing, slotting, generation and mid-season adjustment.

pub mod adjuster;
pub mod edit;
pub mod fixtures;
pub mod round_robin;
pub mod slots;


pub use adjuster::{
    apply_plan, last_finished_round, AdjustOptions, AdjustmentAnalysis, AdjustmentPlan,
    AppliedAdjustment, CalendarAdjuster, InferenceSource, InferredSchedule, Regeneration,
    SuggestedAction, TeamMatchStats,
};
pub use edit::{apply_edit, find_slot_conflicts, MatchEdit, SlotConflict};
pub use fixtures::{generate_fixture, generate_from_request, GeneratedFixture};
pub use round_robin::{generate_rounds, Pairing, Round};
pub use slots::{align_to_match_day, next_match_date, Cursor, SlotAssigner, SlottedMatch};
