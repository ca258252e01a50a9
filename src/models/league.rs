//! League root state, its errors and the session archive.

use crate::logic::RankingEntry;
use crate::models::config::{LeagueConfig, TierCourts};
use crate::models::court::Round;
use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Participant name is empty after trimming.
    EmptyName,
    /// A participant with this name already exists (names are unique, case-insensitive).
    DuplicateName(String),
    /// Scores are equal; every game has a winner.
    InvalidScore { side_1: u32, side_2: u32 },
    /// Tier-to-court mapping is unusable (court 0 or a court shared by two tiers).
    InvalidTierCourts(String),
    /// Not enough participants to fill the courts this round needs.
    InsufficientParticipants { needed: usize, available: usize },
    ParticipantNotFound(ParticipantId),
    /// Round number outside the current session.
    RoundNotFound(u32),
    /// No match on that court (or none with the given sides) in the round.
    CourtNotFound { round: u32, court: u32 },
    /// The match already has a score.
    AlreadyCompleted { round: u32, court: u32 },
    /// The score would push someone's running totals past the counter range.
    ScoreOverflow { round: u32, court: u32 },
    /// State could not be written or read back.
    Persistence(String),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::EmptyName => write!(f, "Name must not be empty"),
            LeagueError::DuplicateName(name) => write!(f, "A participant named '{}' already exists", name),
            LeagueError::InvalidScore { side_1, side_2 } => {
                write!(f, "Score {}-{} is a tie; a game must have a winner", side_1, side_2)
            }
            LeagueError::InvalidTierCourts(reason) => write!(f, "Invalid tier court assignment: {}", reason),
            LeagueError::InsufficientParticipants { needed, available } => {
                write!(f, "Need at least {} participants, only {} available", needed, available)
            }
            LeagueError::ParticipantNotFound(_) => write!(f, "Participant not found"),
            LeagueError::RoundNotFound(round) => write!(f, "Round {} does not exist in this session", round),
            LeagueError::CourtNotFound { round, court } => {
                write!(f, "No matching game on court {} in round {}", court, round)
            }
            LeagueError::AlreadyCompleted { round, court } => {
                write!(f, "Game on court {} in round {} already has a score", court, round)
            }
            LeagueError::ScoreOverflow { round, court } => {
                write!(f, "Score for court {} in round {} is too large to add to the totals", court, round)
            }
            LeagueError::Persistence(reason) => write!(f, "Could not save or load league: {}", reason),
        }
    }
}

impl std::error::Error for LeagueError {}

/// Unique identifier for a league.
pub type LeagueId = Uuid;

/// Lifecycle of a tiered league. Untiered leagues never leave `Seeding`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPhase {
    /// No tiers yet; everyone plays mixed rounds.
    #[default]
    Seeding,
    /// Tiers assigned; rounds are played within tiers.
    Tiered,
}

/// A participant changing tier at a session boundary.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierMove {
    pub participant: ParticipantId,
    pub name: String,
    pub from: u8,
    pub to: u8,
}

impl TierMove {
    pub fn is_promotion(&self) -> bool {
        self.to < self.from
    }
}

/// What happened to tier membership when a session ended.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SessionOutcome {
    /// Untiered league: the session was simply closed.
    #[default]
    Closed,
    /// Seeding session ended; `tiers[0]` is tier 1, in ranked order.
    Seeded { tiers: Vec<Vec<ParticipantId>> },
    /// Tiered session ended with these swaps (possibly none).
    PromotionRelegation { moves: Vec<TierMove> },
}

/// A finished session, kept read-only in the history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchivedSession {
    pub number: u32,
    pub closed_at: DateTime<Utc>,
    /// Phase the league was in while this session was played.
    pub phase: SeasonPhase,
    pub participant_count: usize,
    /// Tier members while the session was played (`[0]` is tier 1); empty before seeding.
    #[serde(default)]
    pub starting_tiers: Vec<Vec<ParticipantId>>,
    pub rounds: Vec<Round>,
    pub rankings: Vec<RankingEntry>,
    pub outcome: SessionOutcome,
}

/// Result of `advance_session`, for the caller to display.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub closed_session: u32,
    pub next_session: u32,
    pub outcome: SessionOutcome,
}

/// Full league state: roster, current session, history and tier phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub config: LeagueConfig,
    /// Roster in insertion order.
    pub participants: Vec<Participant>,
    /// Next display number to hand out; never decreases except on `clear_all`.
    pub next_number: u32,
    /// Current session number, starting at 1.
    pub session: u32,
    /// Rounds of the current session.
    pub rounds: Vec<Round>,
    pub history: Vec<ArchivedSession>,
    pub phase: SeasonPhase,
}

impl League {
    /// Create an empty league in session 1.
    pub fn new(config: LeagueConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            participants: Vec::new(),
            next_number: 1,
            session: 1,
            rounds: Vec::new(),
            history: Vec::new(),
            phase: SeasonPhase::Seeding,
        }
    }

    /// Create a league and add each name as a solo participant.
    ///
    /// Fails on the first empty or duplicate name.
    pub fn with_participants<I, S>(config: LeagueConfig, names: I) -> Result<Self, LeagueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut league = Self::new(config);
        for name in names {
            league.add_participant(name)?;
        }
        Ok(league)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Case-insensitive name lookup.
    pub fn participant_by_name(&self, name: &str) -> Option<&Participant> {
        let name = name.trim();
        self.participants.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Participants of one tier, in roster order.
    pub fn participants_in_tier(&self, tier: u8) -> Vec<&Participant> {
        self.participants.iter().filter(|p| p.tier == tier).collect()
    }

    /// Add a solo participant. Names must be non-empty and unique (case-insensitive).
    pub fn add_participant(&mut self, name: impl Into<String>) -> Result<ParticipantId, LeagueError> {
        let name = name.into();
        let name = self.check_new_name(&name)?;
        let participant = Participant::new(name, self.next_number);
        Ok(self.push_participant(participant))
    }

    /// Add a fixed pair as one participant named `"<player_1> & <player_2>"`.
    pub fn add_team(&mut self, player_1: &str, player_2: &str) -> Result<ParticipantId, LeagueError> {
        let (player_1, player_2) = (player_1.trim(), player_2.trim());
        if player_1.is_empty() || player_2.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        self.check_new_name(&format!("{} & {}", player_1, player_2))?;
        let team = Participant::team(player_1, player_2, self.next_number);
        Ok(self.push_participant(team))
    }

    fn check_new_name<'a>(&self, name: &'a str) -> Result<&'a str, LeagueError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self.participant_by_name(trimmed).is_some() {
            return Err(LeagueError::DuplicateName(trimmed.to_string()));
        }
        Ok(trimmed)
    }

    fn push_participant(&mut self, participant: Participant) -> ParticipantId {
        let id = participant.id;
        self.next_number += 1;
        self.participants.push(participant);
        id
    }

    /// Remove a participant and its stats. Survivors keep their display numbers.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, LeagueError> {
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(LeagueError::ParticipantNotFound(id))?;
        Ok(self.participants.remove(idx))
    }

    /// Replace the tier-to-court mapping. Has no effect on an untiered league's rounds.
    pub fn set_tier_courts(&mut self, courts: TierCourts) -> Result<(), LeagueError> {
        courts.validate()?;
        self.config.tiers = Some(courts);
        Ok(())
    }

    /// Round by 1-based number within the current session.
    pub fn round(&self, number: u32) -> Option<&Round> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        self.rounds.get(idx)
    }

    /// Number the next generated round will get.
    pub fn next_round_number(&self) -> u32 {
        self.rounds.len() as u32 + 1
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Serialize the whole league for an external store.
    pub fn to_json(&self) -> Result<String, LeagueError> {
        serde_json::to_string_pretty(self).map_err(|e| LeagueError::Persistence(e.to_string()))
    }

    /// Restore a league written by `to_json`.
    pub fn from_json(data: &str) -> Result<Self, LeagueError> {
        let league: Self = serde_json::from_str(data).map_err(|e| LeagueError::Persistence(e.to_string()))?;
        if let Some(tiers) = &league.config.tiers {
            tiers.validate()?;
        }
        Ok(league)
    }
}
