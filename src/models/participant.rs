//! Participant (solo player or fixed team) and its per-session statistics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in courts, rounds and lookups).
pub type ParticipantId = Uuid;

/// Value of `last_sat_out_round` for a participant that has not sat out yet this session.
pub const NEVER_SAT_OUT: i32 = -2;

/// Lowest-skill tier; new participants land here until seeded.
pub const LOWEST_TIER: u8 = 4;

/// One finished game from a participant's point of view.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub round: u32,
    pub points_for: u32,
    pub points_against: u32,
    /// Participant ids on the other side of the net.
    pub opponents: Vec<ParticipantId>,
}

/// A player, or a fixed pair playing as one rotation unit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Member names for a team participant; empty for a solo player.
    #[serde(default)]
    pub members: Vec<String>,
    /// Display number, assigned once and never reused.
    pub number: u32,
    /// Skill tier 1..=4, 1 is highest. Only meaningful in tiered leagues.
    pub tier: u8,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub rounds_sat_out: u32,
    pub last_sat_out_round: i32,
    pub game_scores: Vec<GameRecord>,
}

impl Participant {
    /// Create a solo participant with zeroed stats.
    pub fn new(name: impl Into<String>, number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members: Vec::new(),
            number,
            tier: LOWEST_TIER,
            games_played: 0,
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            rounds_sat_out: 0,
            last_sat_out_round: NEVER_SAT_OUT,
            game_scores: Vec::new(),
        }
    }

    /// Create a fixed-pair team named `"<player_1> & <player_2>"`.
    pub fn team(player_1: &str, player_2: &str, number: u32) -> Self {
        Self {
            members: vec![player_1.to_string(), player_2.to_string()],
            ..Self::new(format!("{} & {}", player_1, player_2), number)
        }
    }

    pub fn is_team(&self) -> bool {
        !self.members.is_empty()
    }

    pub fn differential(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }

    /// True unless the participant sat out the round immediately before `round`.
    pub fn can_sit_out(&self, round: u32) -> bool {
        round as i32 - self.last_sat_out_round > 1
    }

    /// Record that this participant sits out `round`.
    pub fn record_sat_out(&mut self, round: u32) {
        self.rounds_sat_out += 1;
        self.last_sat_out_round = round as i32;
    }

    /// True if one more game with this score fits in the running totals.
    pub fn can_record(&self, points_for: u32, points_against: u32) -> bool {
        self.games_played.checked_add(1).is_some()
            && self.points_for.checked_add(points_for).is_some()
            && self.points_against.checked_add(points_against).is_some()
    }

    /// Record one finished game. Callers check `can_record` first.
    pub fn record_game(&mut self, round: u32, points_for: u32, points_against: u32, opponents: Vec<ParticipantId>) {
        self.games_played += 1;
        self.points_for += points_for;
        self.points_against += points_against;
        if points_for > points_against {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.game_scores.push(GameRecord {
            round,
            points_for,
            points_against,
            opponents,
        });
    }

    /// Zero every per-session counter. Identity, number and tier are kept.
    pub fn reset_session_stats(&mut self) {
        self.games_played = 0;
        self.wins = 0;
        self.losses = 0;
        self.points_for = 0;
        self.points_against = 0;
        self.game_scores.clear();
        self.reset_sit_out_tracking();
    }

    /// Forget sit-out history only (results stay cumulative).
    pub fn reset_sit_out_tracking(&mut self) {
        self.rounds_sat_out = 0;
        self.last_sat_out_round = NEVER_SAT_OUT;
    }
}
