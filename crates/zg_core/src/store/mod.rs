//! Persistence seam.
//!
//! The engine computes; whoever owns the database implements these traits. Deleting and
//! re-inserting a tournament's scheduled matches is not atomic here, so implementations
//! backed by shared storage should hold a per-tournament lock or transaction around
//! [`crate::schedule::apply_plan`].

pub mod memory;
pub mod placeholder;

pub use memory::MemoryStore;
pub use placeholder::{materialize_bracket, MaterializedBracket};

use crate::error::Result;
use crate::models::{Match, Team};

pub trait TeamReader {
    fn teams(&self, tournament_id: &str) -> Result<Vec<Team>>;
}

pub trait MatchStore {
    /// All matches of the tournament, any status.
    fn matches(&self, tournament_id: &str) -> Result<Vec<Match>>;

    /// Insert rows, returning the ids assigned to them in order.
    fn insert_matches(&mut self, tournament_id: &str, matches: Vec<Match>) -> Result<Vec<String>>;

    /// Remove every match still in `scheduled` status. Returns how many were removed.
    fn delete_scheduled(&mut self, tournament_id: &str) -> Result<usize>;
}
