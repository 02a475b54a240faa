//! Filling pending bracket slots from played results.

use super::bracket::{BracketRef, Contender, PendingQualifier, PlayoffBracket};
use crate::models::{Leg, Match, MatchPhase, TeamId};
use std::collections::HashMap;

/// Winner and loser of a decided tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieOutcome {
    pub winner: TeamId,
    pub loser: TeamId,
}

fn find_leg<'a>(played: &'a [Match], tie: BracketRef, leg: Option<Leg>) -> Option<&'a Match> {
    played.iter().find(|m| {
        m.phase == MatchPhase::Playoffs
            && m.is_finished()
            && m.playoff_round == Some(tie.round)
            && m.playoff_position == Some(tie.position)
            && m.leg == leg
    })
}

fn decide(first: &TeamId, first_goals: u32, second: &TeamId, second_goals: u32) -> Option<TieOutcome> {
    match first_goals.cmp(&second_goals) {
        std::cmp::Ordering::Greater => Some(TieOutcome { winner: first.clone(), loser: second.clone() }),
        std::cmp::Ordering::Less => Some(TieOutcome { winner: second.clone(), loser: first.clone() }),
        std::cmp::Ordering::Equal => None,
    }
}

/// Outcome of `tie`, if its results are in and not level.
///
/// Two-legged ties go by aggregate score; both legs must be finished.
pub fn tie_outcome(bracket: &PlayoffBracket, played: &[Match], tie: BracketRef) -> Option<TieOutcome> {
    if bracket.is_two_legged(tie.round) {
        let first = find_leg(played, tie, Some(Leg::First))?;
        let second = find_leg(played, tie, Some(Leg::Second))?;
        let (home, away) = (&first.home_team_id, &first.away_team_id);
        let (home_first, away_first) = first.score()?;
        let (home_second, away_second) = (second.score_for(home)?, second.score_for(away)?);
        decide(home, home_first + home_second.0, away, away_first + away_second.0)
    } else {
        let m = find_leg(played, tie, None)?;
        let (home_goals, away_goals) = m.score()?;
        decide(&m.home_team_id, home_goals, &m.away_team_id, away_goals)
    }
}

/// Copy of `bracket` with every pending contender whose source tie is decided replaced by
/// the qualifying team. Level ties stay pending.
pub fn advance_bracket(bracket: &PlayoffBracket, played: &[Match]) -> PlayoffBracket {
    let mut outcomes: HashMap<BracketRef, Option<TieOutcome>> = HashMap::new();
    let mut resolve = |contender: &Contender| -> Contender {
        let Contender::Pending(pending) = contender else {
            return contender.clone();
        };
        let source = pending.source();
        let outcome = outcomes
            .entry(source)
            .or_insert_with(|| tie_outcome(bracket, played, source));
        match (pending, outcome) {
            (PendingQualifier::WinnerOf(_), Some(o)) => Contender::Seed(o.winner.clone()),
            (PendingQualifier::LoserOf(_), Some(o)) => Contender::Seed(o.loser.clone()),
            (_, None) => contender.clone(),
        }
    };

    let mut advanced = bracket.clone();
    for m in &mut advanced.matches {
        m.home = resolve(&m.home);
        m.away = resolve(&m.away);
    }

    tracing::debug!(pending = advanced.pending_count(), "bracket advanced");
    advanced
}
