//! Round generation: pick sit-outs, then place the rest on courts.
//!
//! Three placements are available:
//! - random partition: shuffle and slice into court groups in court order,
//! - greedy anti-repeat: fill each court slot with the candidate that has shared
//!   the fewest courts with those already placed, then visited this court least,
//! - tiered: random partition run separately inside each tier on that tier's courts.
//!
//! A failed generation leaves the league untouched.

use crate::logic::sit_out::select_sit_outs;
use crate::models::{
    CourtMatch, League, LeagueError, PairingStrategy, Participant, ParticipantId, Round, SeasonPhase, TIER_COUNT,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Upper bound on court-building passes in the greedy placement.
pub const MAX_GREEDY_ATTEMPTS: usize = 1000;

const SHARED_COURT_WEIGHT: u32 = 10;
const COURT_REPEAT_WEIGHT: u32 = 5;

/// Courts the greedy placement managed to fill before giving up.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PartialAssignment {
    pub courts: Vec<CourtMatch>,
    pub needed: u32,
}

/// How often participants met on a court, and how often each played on each court number.
#[derive(Clone, Debug, Default)]
pub struct PairingHistory {
    shared: HashMap<(ParticipantId, ParticipantId), u32>,
    court_visits: HashMap<(ParticipantId, u32), u32>,
}

impl PairingHistory {
    pub fn from_rounds<'a, I>(rounds: I) -> Self
    where
        I: IntoIterator<Item = &'a Round>,
    {
        let mut history = Self::default();
        for round in rounds {
            for court in &round.courts {
                history.record_court(court);
            }
        }
        history
    }

    fn record_court(&mut self, court: &CourtMatch) {
        let players: Vec<ParticipantId> = court.participants().copied().collect();
        for (i, &a) in players.iter().enumerate() {
            *self.court_visits.entry((a, court.court)).or_insert(0) += 1;
            for &b in &players[i + 1..] {
                *self.shared.entry(pair_key(a, b)).or_insert(0) += 1;
            }
        }
    }

    /// Rounds in which `a` and `b` were on the same court.
    pub fn shared_courts(&self, a: ParticipantId, b: ParticipantId) -> u32 {
        self.shared.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    /// Rounds in which `participant` played on `court`.
    pub fn court_visits(&self, participant: ParticipantId, court: u32) -> u32 {
        self.court_visits.get(&(participant, court)).copied().unwrap_or(0)
    }

    /// Greedy cost of adding `candidate` to `court` next to `placed`.
    pub fn placement_cost(&self, candidate: ParticipantId, placed: &[ParticipantId], court: u32) -> u32 {
        let shared: u32 = placed.iter().map(|&p| self.shared_courts(candidate, p)).sum();
        shared * SHARED_COURT_WEIGHT + self.court_visits(candidate, court) * COURT_REPEAT_WEIGHT
    }
}

fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Shuffle `playing` and slice it into groups of `per_court`, one per entry of `court_numbers`.
///
/// Returns the courts and anyone left without a full group.
pub fn assign_random<R: Rng + ?Sized>(
    playing: &[ParticipantId],
    court_numbers: &[u32],
    per_court: usize,
    rng: &mut R,
) -> (Vec<CourtMatch>, Vec<ParticipantId>) {
    let mut shuffled = playing.to_vec();
    shuffled.shuffle(rng);

    let mut courts = Vec::with_capacity(court_numbers.len());
    let mut groups = shuffled.chunks(per_court);
    for &court in court_numbers {
        match groups.next() {
            Some(group) if group.len() == per_court => courts.push(CourtMatch::from_group(court, group)),
            Some(group) => return (courts, group.to_vec()),
            None => return (courts, Vec::new()),
        }
    }
    let leftover = groups.flatten().copied().collect();
    (courts, leftover)
}

/// Fill courts `1..=court_count` one slot at a time with the cheapest candidate.
///
/// Ties go to the first candidate in shuffled order. Fails with the courts filled so far
/// if fewer than `court_count` courts could be completed.
pub fn assign_greedy<R: Rng + ?Sized>(
    playing: &[ParticipantId],
    court_count: u32,
    per_court: usize,
    history: &PairingHistory,
    rng: &mut R,
) -> Result<Vec<CourtMatch>, PartialAssignment> {
    let mut available = playing.to_vec();
    available.shuffle(rng);

    let mut courts: Vec<CourtMatch> = Vec::new();
    let mut attempts = 0;
    while (courts.len() as u32) < court_count && available.len() >= per_court && attempts < MAX_GREEDY_ATTEMPTS {
        attempts += 1;
        let court = courts.len() as u32 + 1;
        let mut group: Vec<ParticipantId> = Vec::with_capacity(per_court);
        while group.len() < per_court {
            let best = available
                .iter()
                .enumerate()
                .min_by_key(|&(_, &candidate)| history.placement_cost(candidate, &group, court))
                .map(|(idx, _)| idx);
            match best {
                Some(idx) => group.push(available.remove(idx)),
                None => break,
            }
        }
        if group.len() == per_court {
            courts.push(CourtMatch::from_group(court, &group));
        }
    }

    if (courts.len() as u32) < court_count {
        return Err(PartialAssignment {
            courts,
            needed: court_count,
        });
    }
    Ok(courts)
}

impl League {
    /// Generate the next round of the current session.
    pub fn generate_round(&mut self) -> Result<&Round, LeagueError> {
        self.generate_round_with_rng(&mut rand::thread_rng())
    }

    /// Same as `generate_round`, with a caller-supplied random source.
    pub fn generate_round_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Round, LeagueError> {
        let number = self.next_round_number();
        let (mut courts, sitting_out) = if self.config.is_tiered() && self.phase == SeasonPhase::Tiered {
            self.tiered_assignment(number, rng)?
        } else {
            self.open_assignment(number, rng)?
        };
        courts.sort_by_key(|c| c.court);

        for id in &sitting_out {
            if let Some(p) = self.participant_mut(*id) {
                p.record_sat_out(number);
            }
        }
        let idx = self.rounds.len();
        self.rounds.push(Round {
            number,
            courts,
            sitting_out,
        });
        Ok(&self.rounds[idx])
    }

    /// Whole roster on courts `1..=active_courts`.
    fn open_assignment<R: Rng + ?Sized>(
        &self,
        number: u32,
        rng: &mut R,
    ) -> Result<(Vec<CourtMatch>, Vec<ParticipantId>), LeagueError> {
        let per_court = self.config.per_court();
        let court_count = self.active_courts();
        let needed = self.participants_needed();
        let available = self.participants.len();
        if available < needed {
            return Err(LeagueError::InsufficientParticipants { needed, available });
        }

        let pool: Vec<&Participant> = self.participants.iter().collect();
        let mut sitting_out = select_sit_outs(&pool, needed, number);
        let playing: Vec<ParticipantId> = self
            .participants
            .iter()
            .map(|p| p.id)
            .filter(|id| !sitting_out.contains(id))
            .collect();

        let courts = match self.config.pairing {
            PairingStrategy::RandomPartition => {
                let numbers: Vec<u32> = (1..=court_count).collect();
                let (courts, leftover) = assign_random(&playing, &numbers, per_court, rng);
                sitting_out.extend(leftover);
                courts
            }
            PairingStrategy::GreedyAntiRepeat => {
                let history = PairingHistory::from_rounds(
                    self.history.iter().flat_map(|s| s.rounds.iter()).chain(self.rounds.iter()),
                );
                assign_greedy(&playing, court_count, per_court, &history, rng).map_err(|partial| {
                    LeagueError::InsufficientParticipants {
                        needed,
                        available: partial.courts.len() * per_court,
                    }
                })?
            }
        };
        Ok((courts, sitting_out))
    }

    /// Each tier plays only on its own courts; tiers too small for one court sit out entirely.
    fn tiered_assignment<R: Rng + ?Sized>(
        &self,
        number: u32,
        rng: &mut R,
    ) -> Result<(Vec<CourtMatch>, Vec<ParticipantId>), LeagueError> {
        let per_court = self.config.per_court();
        let active = self.active_courts();
        let mapping = self.config.tiers.clone().unwrap_or_default();

        let mut courts = Vec::new();
        let mut sitting_out = Vec::new();
        for tier in 1..=TIER_COUNT {
            let pool = self.participants_in_tier(tier);
            let usable: Vec<u32> = mapping.for_tier(tier).iter().copied().filter(|&c| c <= active).collect();
            let fillable = usable.len().min(pool.len() / per_court);
            if fillable == 0 {
                sitting_out.extend(pool.iter().map(|p| p.id));
                continue;
            }

            let tier_sitting = select_sit_outs(&pool, fillable * per_court, number);
            let playing: Vec<ParticipantId> = pool
                .iter()
                .map(|p| p.id)
                .filter(|id| !tier_sitting.contains(id))
                .collect();
            let (tier_courts, leftover) = assign_random(&playing, &usable[..fillable], per_court, rng);
            courts.extend(tier_courts);
            sitting_out.extend(tier_sitting);
            sitting_out.extend(leftover);
        }

        if courts.is_empty() {
            return Err(LeagueError::InsufficientParticipants {
                needed: per_court,
                available: self.participants.len(),
            });
        }
        Ok((courts, sitting_out))
    }
}
