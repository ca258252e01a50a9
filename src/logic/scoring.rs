//! Score entry for a single court and the resulting stat updates.

use crate::models::{CourtMatch, League, LeagueError, ParticipantId};

/// Index of the match a score is meant for.
///
/// With sides given, the match on `court` with exactly those sides (order within a side
/// is ignored). Without sides, the first unscored match on `court`.
fn locate_match(
    courts: &[CourtMatch],
    round: u32,
    court: u32,
    sides: Option<(&[ParticipantId], &[ParticipantId])>,
) -> Result<usize, LeagueError> {
    let candidates: Vec<usize> = courts
        .iter()
        .enumerate()
        .filter(|(_, c)| c.court == court)
        .map(|(idx, _)| idx)
        .collect();
    if candidates.is_empty() {
        return Err(LeagueError::CourtNotFound { round, court });
    }

    match sides {
        Some((side_1, side_2)) => {
            let idx = candidates
                .into_iter()
                .find(|&idx| courts[idx].has_sides(side_1, side_2))
                .ok_or(LeagueError::CourtNotFound { round, court })?;
            if courts[idx].completed {
                return Err(LeagueError::AlreadyCompleted { round, court });
            }
            Ok(idx)
        }
        None => candidates
            .into_iter()
            .find(|&idx| !courts[idx].completed)
            .ok_or(LeagueError::AlreadyCompleted { round, court }),
    }
}

impl League {
    /// Record the final score of one game in the current session.
    ///
    /// Each side's participants get a game played, points for/against, a win or loss, and a
    /// game record naming the opponents. A match can be scored once; a repeat call fails with
    /// `AlreadyCompleted` and changes nothing. A score that would overflow anyone's totals fails
    /// with `ScoreOverflow`, also without changes. Participants removed since the round was
    /// generated are skipped.
    pub fn record_score(
        &mut self,
        round: u32,
        court: u32,
        side_1_score: u32,
        side_2_score: u32,
        sides: Option<(&[ParticipantId], &[ParticipantId])>,
    ) -> Result<(), LeagueError> {
        if side_1_score == side_2_score {
            return Err(LeagueError::InvalidScore {
                side_1: side_1_score,
                side_2: side_2_score,
            });
        }
        let round_idx = (round as usize).checked_sub(1).ok_or(LeagueError::RoundNotFound(round))?;
        let courts = &self.rounds.get(round_idx).ok_or(LeagueError::RoundNotFound(round))?.courts;
        let idx = locate_match(courts, round, court, sides)?;
        let (side_1, side_2) = (courts[idx].side_1.clone(), courts[idx].side_2.clone());

        let fits = |side: &[ParticipantId], points_for: u32, points_against: u32| {
            side.iter()
                .filter_map(|&id| self.participant(id))
                .all(|p| p.can_record(points_for, points_against))
        };
        if !fits(&side_1, side_1_score, side_2_score) || !fits(&side_2, side_2_score, side_1_score) {
            return Err(LeagueError::ScoreOverflow { round, court });
        }

        let game = &mut self.rounds[round_idx].courts[idx];
        game.side_1_score = side_1_score;
        game.side_2_score = side_2_score;
        game.completed = true;

        self.apply_side(&side_1, &side_2, round, side_1_score, side_2_score);
        self.apply_side(&side_2, &side_1, round, side_2_score, side_1_score);
        Ok(())
    }

    fn apply_side(
        &mut self,
        side: &[ParticipantId],
        opponents: &[ParticipantId],
        round: u32,
        points_for: u32,
        points_against: u32,
    ) {
        for &id in side {
            if let Some(p) = self.participant_mut(id) {
                p.record_game(round, points_for, points_against, opponents.to_vec());
            }
        }
    }
}
