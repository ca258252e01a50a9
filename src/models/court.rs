//! Court matches and rounds.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which side of a court.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    One,
    Two,
}

/// One contest on one court: two sides, a score pair and a completed flag.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CourtMatch {
    pub court: u32,
    /// Side 1 participant ids (2 players in solo leagues, 1 team in team leagues).
    pub side_1: Vec<ParticipantId>,
    pub side_2: Vec<ParticipantId>,
    /// Both scores stay at 0 until `completed` is set.
    pub side_1_score: u32,
    pub side_2_score: u32,
    pub completed: bool,
}

impl CourtMatch {
    /// Split a court group in half: first half is side 1, second half side 2.
    pub fn from_group(court: u32, group: &[ParticipantId]) -> Self {
        let (side_1, side_2) = group.split_at(group.len() / 2);
        Self {
            court,
            side_1: side_1.to_vec(),
            side_2: side_2.to_vec(),
            side_1_score: 0,
            side_2_score: 0,
            completed: false,
        }
    }

    /// Every participant on this court, side 1 first.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.side_1.iter().chain(self.side_2.iter())
    }

    /// Side membership check, ignoring order within each side.
    pub fn has_sides(&self, side_1: &[ParticipantId], side_2: &[ParticipantId]) -> bool {
        same_members(&self.side_1, side_1) && same_members(&self.side_2, side_2)
    }

    /// Winning side of a completed match.
    pub fn winner(&self) -> Option<Side> {
        if !self.completed {
            return None;
        }
        if self.side_1_score > self.side_2_score {
            Some(Side::One)
        } else {
            Some(Side::Two)
        }
    }
}

fn same_members(a: &[ParticipantId], b: &[ParticipantId]) -> bool {
    a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
}

/// One round of the current session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position within the session.
    pub number: u32,
    pub courts: Vec<CourtMatch>,
    pub sitting_out: Vec<ParticipantId>,
}

impl Round {
    /// Every participant playing this round.
    pub fn playing(&self) -> impl Iterator<Item = &ParticipantId> {
        self.courts.iter().flat_map(|c| c.participants())
    }

    pub fn is_complete(&self) -> bool {
        self.courts.iter().all(|c| c.completed)
    }
}
