//! Circle-method round-robin pairing.
//!
//! The last entry of the working list stays fixed while the others rotate around it.
//! Odd rosters get a placeholder appended; whoever meets the placeholder rests that round.

use crate::models::TeamId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub home: TeamId,
    pub away: TeamId,
}

impl Pairing {
    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home == team || &self.away == team
    }

    pub fn reversed(&self) -> Self {
        Self { home: self.away.clone(), away: self.home.clone() }
    }
}

/// One matchday of pairings. Numbered from 1 within a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub pairings: Vec<Pairing>,
    pub bye: Option<TeamId>,
}

impl Round {
    pub fn contains(&self, team: &TeamId) -> bool {
        self.pairings.iter().any(|p| p.involves(team))
    }
}

/// Full pairing structure for `teams`. Fewer than two teams yields no rounds.
pub fn generate_rounds(teams: &[TeamId], double_round: bool) -> Vec<Round> {
    if teams.len() < 2 {
        return Vec::new();
    }

    // `None` is the rest placeholder.
    let mut slots: Vec<Option<&TeamId>> = teams.iter().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let size = slots.len();
    let rotating = size - 1;
    let anchor = slots[rotating];
    let mut rounds = Vec::with_capacity(if double_round { rotating * 2 } else { rotating });

    for r in 0..rotating {
        let mut pairings = Vec::with_capacity(size / 2);
        let mut bye = None;

        // Anchor switches sides every round to even out home games.
        let rotor = slots[r % rotating];
        let anchor_pair = if r % 2 == 0 { (rotor, anchor) } else { (anchor, rotor) };

        let others = (1..size / 2).map(|i| {
            let home = slots[(r + i) % rotating];
            let away = slots[(rotating - i + r) % rotating];
            (home, away)
        });

        for pair in std::iter::once(anchor_pair).chain(others) {
            match pair {
                (Some(home), Some(away)) => {
                    pairings.push(Pairing { home: home.clone(), away: away.clone() })
                }
                (Some(team), None) | (None, Some(team)) => bye = Some(team.clone()),
                (None, None) => {}
            }
        }

        tracing::debug!(round = r + 1, matches = pairings.len(), "round paired");
        rounds.push(Round { number: r as u32 + 1, pairings, bye });
    }

    if double_round {
        let offset = rotating as u32;
        let mirrored: Vec<Round> = rounds
            .iter()
            .map(|round| Round {
                number: round.number + offset,
                pairings: round.pairings.iter().map(Pairing::reversed).collect(),
                bye: round.bye.clone(),
            })
            .collect();
        rounds.extend(mirrored);
    }

    rounds
}
