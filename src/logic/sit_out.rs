//! Sit-out selection: who rests this round.

use crate::models::{Participant, ParticipantId};

/// Sit-out priority; higher rests first.
///
/// Favours resting participants who have played more, penalises resting the same
/// participant again, and grows slowly with rounds since the last rest.
pub fn sit_out_score(participant: &Participant, round: u32) -> i64 {
    i64::from(participant.games_played) * 10 - i64::from(participant.rounds_sat_out) * 20
        + (i64::from(round) - i64::from(participant.last_sat_out_round))
}

/// Choose who sits out `round` so that `needed` participants of `pool` can play.
///
/// 1. Participants who sat out the previous round are not eligible.
/// 2. Eligible participants are ordered by `sit_out_score` (descending, ties keep pool order).
/// 3. If there are too few eligible participants, the rest are forced from the ineligible
///    ones with the most games played. The result always has `pool.len() - needed` entries.
///
/// Nothing is mutated; the caller records the sit-outs once the round is accepted.
pub fn select_sit_outs(pool: &[&Participant], needed: usize, round: u32) -> Vec<ParticipantId> {
    let sitting_count = pool.len().saturating_sub(needed);
    if sitting_count == 0 {
        return Vec::new();
    }

    let mut eligible: Vec<(&Participant, i64)> = pool
        .iter()
        .filter(|p| p.can_sit_out(round))
        .map(|p| (*p, sit_out_score(p, round)))
        .collect();
    eligible.sort_by(|a, b| b.1.cmp(&a.1));

    let mut sitting: Vec<ParticipantId> = eligible.iter().take(sitting_count).map(|(p, _)| p.id).collect();

    if sitting.len() < sitting_count {
        let mut forced: Vec<&Participant> = pool.iter().copied().filter(|p| !sitting.contains(&p.id)).collect();
        forced.sort_by(|a, b| b.games_played.cmp(&a.games_played));
        let missing = sitting_count - sitting.len();
        sitting.extend(forced.into_iter().take(missing).map(|p| p.id));
    }

    sitting
}
