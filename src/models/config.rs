//! League configuration: the strategy choices that distinguish one league format from another.

use crate::models::league::LeagueError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a rotation unit is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Individual players, four per court (two-a-side).
    #[default]
    Solo,
    /// Fixed pairs, two teams per court.
    Team,
}

impl UnitKind {
    /// Units needed to fill one court.
    pub fn per_court(self) -> usize {
        match self {
            UnitKind::Solo => 4,
            UnitKind::Team => 2,
        }
    }
}

/// How many courts are active for a given roster size.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "courts")]
pub enum CourtPolicy {
    /// 1 court under 8 players, then one more court per 4 players up to 4 courts.
    #[default]
    Standard,
    /// 3 courts under 12 players, 4 courts from 12.
    TwoStep,
    /// Always the given number of courts.
    Fixed(u32),
}

/// How playing participants are arranged onto courts outside of tiered rounds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Shuffle, then slice into court groups in order.
    #[default]
    RandomPartition,
    /// Build each court one slot at a time, avoiding repeat opponents and repeat courts.
    GreedyAntiRepeat,
}

/// How standings are counted and ordered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Only the first `min games played` games count; points, then differential.
    #[default]
    Equalized,
    /// Cumulative totals; wins, then differential, then points.
    WinLoss,
    /// Cumulative totals; tier, then points, then differential.
    TierPoints,
}

/// What survives a session boundary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCarryover {
    /// Every per-session counter goes back to zero.
    #[default]
    ResetAll,
    /// Results stay cumulative; only sit-out tracking is reset.
    KeepTotals,
}

/// Number of skill tiers in a tiered league.
pub const TIER_COUNT: u8 = 4;

/// Courts each tier may use. Tier 1 is the highest.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierCourts {
    courts: [Vec<u32>; TIER_COUNT as usize],
}

impl Default for TierCourts {
    /// Tier 1 on court 4 down to tier 4 on court 1.
    fn default() -> Self {
        Self {
            courts: [vec![4], vec![3], vec![2], vec![1]],
        }
    }
}

impl TierCourts {
    /// Build a mapping, rejecting court numbers of 0 or courts shared between tiers.
    pub fn new(courts: [Vec<u32>; TIER_COUNT as usize]) -> Result<Self, LeagueError> {
        let mapping = Self { courts };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Courts assigned to `tier` (empty for an unknown tier).
    pub fn for_tier(&self, tier: u8) -> &[u32] {
        match tier {
            1..=TIER_COUNT => &self.courts[usize::from(tier - 1)],
            _ => &[],
        }
    }

    pub fn validate(&self) -> Result<(), LeagueError> {
        let mut owner: HashMap<u32, usize> = HashMap::new();
        for (idx, courts) in self.courts.iter().enumerate() {
            for &court in courts {
                if court == 0 {
                    return Err(LeagueError::InvalidTierCourts(format!(
                        "tier {} lists court 0; courts are numbered from 1",
                        idx + 1
                    )));
                }
                if let Some(prev) = owner.insert(court, idx) {
                    return Err(LeagueError::InvalidTierCourts(format!(
                        "court {} is assigned to tier {} and tier {}",
                        court,
                        prev + 1,
                        idx + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Full strategy selection for one league, fixed at construction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub unit: UnitKind,
    pub court_policy: CourtPolicy,
    pub pairing: PairingStrategy,
    pub ranking: RankingMode,
    /// `Some` turns on seeding and promotion/relegation.
    pub tiers: Option<TierCourts>,
    pub carryover: SessionCarryover,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self::round_robin()
    }
}

impl LeagueConfig {
    /// Mixed round robin: random courts, equalized standings.
    pub fn round_robin() -> Self {
        Self {
            unit: UnitKind::Solo,
            court_policy: CourtPolicy::Standard,
            pairing: PairingStrategy::RandomPartition,
            ranking: RankingMode::Equalized,
            tiers: None,
            carryover: SessionCarryover::ResetAll,
        }
    }

    /// Ladder: greedy anti-repeat courts, win/loss standings.
    pub fn ladder() -> Self {
        Self {
            pairing: PairingStrategy::GreedyAntiRepeat,
            ranking: RankingMode::WinLoss,
            ..Self::round_robin()
        }
    }

    /// Fixed doubles teams: two teams per court, results carried across sessions.
    pub fn mixed_doubles() -> Self {
        Self {
            unit: UnitKind::Team,
            court_policy: CourtPolicy::Standard,
            pairing: PairingStrategy::RandomPartition,
            ranking: RankingMode::WinLoss,
            tiers: None,
            carryover: SessionCarryover::KeepTotals,
        }
    }

    /// Seeded ladder: a mixed seeding session, then four tiers with promotion/relegation.
    pub fn seeded_ladder() -> Self {
        Self {
            ranking: RankingMode::TierPoints,
            tiers: Some(TierCourts::default()),
            ..Self::round_robin()
        }
    }

    pub fn per_court(&self) -> usize {
        self.unit.per_court()
    }

    pub fn is_tiered(&self) -> bool {
        self.tiers.is_some()
    }
}
