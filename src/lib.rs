//! Court league engine: rotates players or fixed teams across courts round by round,
//! records scores, ranks participants and runs seeded tiers across sessions.

pub mod logic;
pub mod models;

pub use logic::{
    active_courts, assign_greedy, assign_random, compute_rankings, plan_promotion_relegation, seeding_split,
    select_sit_outs, sit_out_score, PairingHistory, PartialAssignment, RankingEntry, MAX_GREEDY_ATTEMPTS,
};
pub use models::{
    ArchivedSession, CourtMatch, CourtPolicy, GameRecord, League, LeagueConfig, LeagueError, LeagueId,
    PairingStrategy, Participant, ParticipantId, RankingMode, Round, SeasonPhase, SessionCarryover,
    SessionOutcome, SessionSummary, Side, TierCourts, TierMove, UnitKind, LOWEST_TIER, NEVER_SAT_OUT, TIER_COUNT,
};
