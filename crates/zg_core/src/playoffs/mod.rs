// Knockout stage: bracket generation and advancement.

pub mod advancement;
pub mod bracket;

pub use advancement::{advance_bracket, tie_outcome, TieOutcome};
pub use bracket::{
    generate_bracket, seeds_from_standings, BracketOptions, BracketRef, Contender, PendingQualifier,
    PlayoffBracket, PlayoffMatch, QUARTERFINAL_PAIRS, SEMIFINAL_PAIRS,
};
