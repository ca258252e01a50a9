//! Data structures for the league: participants, courts, rounds, configuration and league state.

mod config;
mod court;
mod league;
mod participant;

pub use config::{
    CourtPolicy, LeagueConfig, PairingStrategy, RankingMode, SessionCarryover, TierCourts, UnitKind, TIER_COUNT,
};
pub use court::{CourtMatch, Round, Side};
pub use league::{
    ArchivedSession, League, LeagueError, LeagueId, SeasonPhase, SessionOutcome, SessionSummary, TierMove,
};
pub use participant::{GameRecord, Participant, ParticipantId, LOWEST_TIER, NEVER_SAT_OUT};
