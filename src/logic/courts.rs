//! Court allocation: how many courts are in play for a roster size.

use crate::models::{CourtPolicy, League, UnitKind};

/// Active court count for `count` participants of the given kind.
///
/// Thresholds are written in players (8 / 12 / 16 for `Standard`, 12 for `TwoStep`);
/// team leagues halve them since two teams fill a court instead of four players.
pub fn active_courts(count: usize, policy: CourtPolicy, unit: UnitKind) -> u32 {
    let threshold = |players: usize| players * unit.per_court() / 4;
    match policy {
        CourtPolicy::Standard => {
            if count >= threshold(16) {
                4
            } else if count >= threshold(12) {
                3
            } else if count >= threshold(8) {
                2
            } else {
                1
            }
        }
        CourtPolicy::TwoStep => {
            if count >= threshold(12) {
                4
            } else {
                3
            }
        }
        CourtPolicy::Fixed(courts) => courts,
    }
}

impl League {
    /// Courts in play for the current roster.
    pub fn active_courts(&self) -> u32 {
        active_courts(self.participants.len(), self.config.court_policy, self.config.unit)
    }

    /// Participants needed to fill every active court.
    pub fn participants_needed(&self) -> usize {
        self.active_courts() as usize * self.config.per_court()
    }
}
