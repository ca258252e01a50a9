//! Standings.

use crate::models::{League, Participant, ParticipantId, RankingMode};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One line of the standings. Derived on demand, never stored on the participant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub participant: ParticipantId,
    pub name: String,
    pub number: u32,
    /// All games played this session.
    pub games_played: u32,
    /// Games included in the point totals below.
    pub counted_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub differential: i64,
    /// Present in tier-ranked leagues only.
    pub tier: Option<u8>,
}

impl RankingEntry {
    fn new(p: &Participant, counted_games: u32, points_for: u32, points_against: u32, tier: Option<u8>) -> Self {
        Self {
            participant: p.id,
            name: p.name.clone(),
            number: p.number,
            games_played: p.games_played,
            counted_games,
            wins: p.wins,
            losses: p.losses,
            points_for,
            points_against,
            differential: i64::from(points_for) - i64::from(points_against),
            tier,
        }
    }
}

/// Ordered standings for `participants`.
///
/// `Equalized` counts only each participant's first N games, N being the fewest games anyone
/// has played, so extra games never help or hurt. The other modes use full totals.
/// Sorting is stable: entries tied on every key keep roster order.
pub fn compute_rankings(participants: &[Participant], mode: RankingMode) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = match mode {
        RankingMode::Equalized => {
            let min_games = participants.iter().map(|p| p.games_played).min().unwrap_or(0);
            participants
                .iter()
                .map(|p| {
                    let counted = p.game_scores.iter().take(min_games as usize);
                    let (points_for, points_against) = counted
                        .fold((0u32, 0u32), |(f, a), g| {
                            (f.saturating_add(g.points_for), a.saturating_add(g.points_against))
                        });
                    RankingEntry::new(p, min_games, points_for, points_against, None)
                })
                .collect()
        }
        RankingMode::WinLoss => participants
            .iter()
            .map(|p| RankingEntry::new(p, p.games_played, p.points_for, p.points_against, None))
            .collect(),
        RankingMode::TierPoints => participants
            .iter()
            .map(|p| RankingEntry::new(p, p.games_played, p.points_for, p.points_against, Some(p.tier)))
            .collect(),
    };

    match mode {
        RankingMode::Equalized => entries.sort_by_key(|e| (Reverse(e.points_for), Reverse(e.differential))),
        RankingMode::WinLoss => {
            entries.sort_by_key(|e| (Reverse(e.wins), Reverse(e.differential), Reverse(e.points_for)))
        }
        RankingMode::TierPoints => {
            entries.sort_by_key(|e| (e.tier, Reverse(e.points_for), Reverse(e.differential)))
        }
    }
    entries
}

impl League {
    /// Current standings under the league's ranking mode.
    pub fn rankings(&self) -> Vec<RankingEntry> {
        compute_rankings(&self.participants, self.config.ranking)
    }

    /// Standings among the members of one tier only, best first.
    pub fn tier_rankings(&self, tier: u8) -> Vec<RankingEntry> {
        let members: Vec<Participant> = self.participants.iter().filter(|p| p.tier == tier).cloned().collect();
        compute_rankings(&members, self.config.ranking)
    }
}
