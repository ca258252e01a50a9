//! Session boundaries: archiving, seeding into tiers, promotion/relegation, and resets.

use crate::logic::rankings::RankingEntry;
use crate::models::{
    ArchivedSession, League, ParticipantId, SeasonPhase, SessionCarryover, SessionOutcome, SessionSummary, TierMove,
    LOWEST_TIER, TIER_COUNT,
};
use chrono::Utc;

/// Participants swapped across each tier boundary per session.
pub const SWAP_COUNT: usize = 2;

/// Both tiers of a boundary need at least this many members for a swap.
pub const MIN_SWAP_TIER_SIZE: usize = 4;

/// Tier sizes when seeding `total` ranked participants.
///
/// Each tier gets `max(4, total / 4)` in ranked order until the roster runs out;
/// tier 4 takes whatever is left.
pub fn seeding_split(total: usize) -> [usize; TIER_COUNT as usize] {
    let per_tier = (total / 4).max(4);
    let tier_1 = per_tier.min(total);
    let tier_2 = per_tier.min(total - tier_1);
    let tier_3 = per_tier.min(total - tier_1 - tier_2);
    [tier_1, tier_2, tier_3, total - tier_1 - tier_2 - tier_3]
}

/// Swaps for every adjacent tier pair, computed from pre-swap standings.
///
/// `standings[0]` is tier 1. For each boundary where both tiers have at least
/// `MIN_SWAP_TIER_SIZE` members, the bottom `SWAP_COUNT` of the upper tier go down and
/// the top `SWAP_COUNT` of the lower tier go up.
pub fn plan_promotion_relegation(standings: &[Vec<RankingEntry>]) -> Vec<TierMove> {
    let mut moves = Vec::new();
    for (upper_idx, pair) in standings.windows(2).enumerate() {
        let (upper, lower) = (&pair[0], &pair[1]);
        if upper.len() < MIN_SWAP_TIER_SIZE || lower.len() < MIN_SWAP_TIER_SIZE {
            continue;
        }
        let upper_tier = upper_idx as u8 + 1;
        let lower_tier = upper_tier + 1;
        for entry in &upper[upper.len() - SWAP_COUNT..] {
            moves.push(TierMove {
                participant: entry.participant,
                name: entry.name.clone(),
                from: upper_tier,
                to: lower_tier,
            });
        }
        for entry in &lower[..SWAP_COUNT] {
            moves.push(TierMove {
                participant: entry.participant,
                name: entry.name.clone(),
                from: lower_tier,
                to: upper_tier,
            });
        }
    }
    moves
}

impl League {
    /// Close the current session and open the next one.
    ///
    /// Tiered leagues seed at the end of the seeding session and run promotion/relegation
    /// after every later session. The outgoing session is archived with its rounds, starting
    /// tier membership, final standings and tier outcome. Per-session counters are then reset according to the
    /// league's carry-over policy; tier membership is kept.
    pub fn advance_session(&mut self) -> SessionSummary {
        let rankings = self.rankings();
        let phase = self.phase;
        let starting_tiers: Vec<Vec<ParticipantId>> = match phase {
            SeasonPhase::Tiered => (1..=TIER_COUNT)
                .map(|tier| self.participants_in_tier(tier).iter().map(|p| p.id).collect())
                .collect(),
            SeasonPhase::Seeding => Vec::new(),
        };
        let outcome = match (self.config.is_tiered(), phase) {
            (false, _) => SessionOutcome::Closed,
            (true, SeasonPhase::Seeding) => self.seed_tiers(&rankings),
            (true, SeasonPhase::Tiered) => self.promote_and_relegate(),
        };

        let closed_session = self.session;
        self.history.push(ArchivedSession {
            number: closed_session,
            closed_at: Utc::now(),
            phase,
            participant_count: self.participants.len(),
            starting_tiers,
            rounds: std::mem::take(&mut self.rounds),
            rankings,
            outcome: outcome.clone(),
        });
        self.session += 1;

        for p in &mut self.participants {
            match self.config.carryover {
                SessionCarryover::ResetAll => p.reset_session_stats(),
                SessionCarryover::KeepTotals => p.reset_sit_out_tracking(),
            }
        }

        SessionSummary {
            closed_session,
            next_session: self.session,
            outcome,
        }
    }

    fn seed_tiers(&mut self, rankings: &[RankingEntry]) -> SessionOutcome {
        let mut tiers = Vec::with_capacity(TIER_COUNT as usize);
        let mut ranked = rankings.iter();
        for (idx, size) in seeding_split(rankings.len()).into_iter().enumerate() {
            let members: Vec<_> = ranked.by_ref().take(size).map(|e| e.participant).collect();
            for &id in &members {
                if let Some(p) = self.participant_mut(id) {
                    p.tier = idx as u8 + 1;
                }
            }
            tiers.push(members);
        }
        self.phase = SeasonPhase::Tiered;
        SessionOutcome::Seeded { tiers }
    }

    fn promote_and_relegate(&mut self) -> SessionOutcome {
        let standings: Vec<Vec<RankingEntry>> = (1..=TIER_COUNT).map(|tier| self.tier_rankings(tier)).collect();
        let moves = plan_promotion_relegation(&standings);
        for m in &moves {
            if let Some(p) = self.participant_mut(m.participant) {
                p.tier = m.to;
            }
        }
        SessionOutcome::PromotionRelegation { moves }
    }

    /// Drop the current session's rounds and stats without archiving.
    pub fn clear_current_session(&mut self) {
        self.rounds.clear();
        for p in &mut self.participants {
            p.reset_session_stats();
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Start over with the same roster: session 1, no history, no tiers.
    pub fn reset_all(&mut self) {
        self.clear_current_session();
        self.clear_history();
        self.session = 1;
        self.phase = SeasonPhase::Seeding;
        for p in &mut self.participants {
            p.tier = LOWEST_TIER;
        }
    }

    /// Remove everything, including the roster, and restart display numbering at 1.
    pub fn clear_all(&mut self) {
        self.participants.clear();
        self.reset_all();
        self.next_number = 1;
    }
}
