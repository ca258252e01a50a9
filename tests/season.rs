//! Integration tests for session boundaries: seeding, promotion/relegation, archiving and resets.

use court_league::{
    plan_promotion_relegation, seeding_split, League, LeagueConfig, LeagueError, RankingEntry, SeasonPhase,
    SessionOutcome, TierMove,
};
use std::collections::HashMap;

fn seeded_ladder(n: usize) -> League {
    League::with_participants(LeagueConfig::seeded_ladder(), (0..n).map(|i| format!("P{i:02}"))).unwrap()
}

/// Give participant i `100 - i` points so roster order is ranked order.
fn score_in_roster_order(league: &mut League) {
    for (i, p) in league.participants.iter_mut().enumerate() {
        p.record_game(1, 100 - i as u32, 0, Vec::new());
    }
}

fn tiers_by_name(league: &League) -> HashMap<String, u8> {
    league.participants.iter().map(|p| (p.name.clone(), p.tier)).collect()
}

#[test]
fn seeding_split_sizes() {
    assert_eq!(seeding_split(20), [5, 5, 5, 5]);
    assert_eq!(seeding_split(16), [4, 4, 4, 4]);
    assert_eq!(seeding_split(18), [4, 4, 4, 6]);
    assert_eq!(seeding_split(23), [5, 5, 5, 8]);
    assert_eq!(seeding_split(6), [4, 2, 0, 0]);
    assert_eq!(seeding_split(0), [0, 0, 0, 0]);
}

#[test]
fn twenty_players_seed_five_per_tier() {
    let mut league = seeded_ladder(20);
    score_in_roster_order(&mut league);
    // Same points as P04, better differential: ranks just above P04.
    league.participants[5].points_for = 96;
    league.participants[4].points_against = 3;

    let summary = league.advance_session();

    assert_eq!(summary.closed_session, 1);
    assert_eq!(summary.next_session, 2);
    let tiers = match &summary.outcome {
        SessionOutcome::Seeded { tiers } => tiers.clone(),
        other => panic!("expected seeding, got {:?}", other),
    };
    assert_eq!(tiers.iter().map(Vec::len).collect::<Vec<_>>(), vec![5, 5, 5, 5]);

    let tier_1: Vec<String> = tiers[0].iter().map(|id| league.participant(*id).unwrap().name.clone()).collect();
    assert_eq!(tier_1, vec!["P00", "P01", "P02", "P03", "P05"]);
    assert_eq!(league.participant_by_name("P04").unwrap().tier, 2);
    assert_eq!(league.phase, SeasonPhase::Tiered);
    for tier in 1..=4 {
        assert_eq!(league.participants_in_tier(tier).len(), 5);
    }
}

#[test]
fn advance_archives_and_resets_but_keeps_tiers() {
    let mut league = seeded_ladder(16);
    league.generate_round().unwrap();
    let court = league.rounds[0].courts[0].court;
    league.record_score(1, court, 11, 4, None).unwrap();

    league.advance_session();
    let tiers_after_seeding = tiers_by_name(&league);

    assert_eq!(league.session, 2);
    assert!(league.rounds.is_empty());
    assert_eq!(league.history.len(), 1);
    let archived = &league.history[0];
    assert_eq!(archived.number, 1);
    assert_eq!(archived.phase, SeasonPhase::Seeding);
    assert_eq!(archived.rounds.len(), 1);
    assert!(archived.rounds[0].courts[0].completed);
    assert_eq!(archived.rankings.len(), 16);
    assert_eq!(archived.participant_count, 16);
    assert!(archived.starting_tiers.is_empty());

    for p in &league.participants {
        assert_eq!((p.games_played, p.points_for, p.points_against), (0, 0, 0));
        assert_eq!(p.rounds_sat_out, 0);
        assert!(p.game_scores.is_empty());
    }

    // Archived rounds cannot be scored from the new session.
    assert_eq!(league.record_score(1, court, 11, 4, None), Err(LeagueError::RoundNotFound(1)));

    league.generate_round().unwrap();
    assert_eq!(league.rounds[0].number, 1);
    assert_eq!(tiers_by_name(&league), tiers_after_seeding);
}

#[test]
fn promotion_and_relegation_swap_two_each_way() {
    let mut league = seeded_ladder(16);
    score_in_roster_order(&mut league);
    league.advance_session();

    // Within each tier of four, roster order is ranked order again.
    for (i, p) in league.participants.iter_mut().enumerate() {
        p.record_game(1, 40 - 10 * (i as u32 % 4), 0, Vec::new());
    }
    let summary = league.advance_session();

    let moves = match summary.outcome {
        SessionOutcome::PromotionRelegation { moves } => moves,
        other => panic!("expected promotion/relegation, got {:?}", other),
    };
    assert_eq!(moves.len(), 12);
    assert_eq!(moves.iter().filter(|m| m.is_promotion()).count(), 6);

    let expected: [(&str, u8); 16] = [
        ("P00", 1),
        ("P01", 1),
        ("P02", 2),
        ("P03", 2),
        ("P04", 1),
        ("P05", 1),
        ("P06", 3),
        ("P07", 3),
        ("P08", 2),
        ("P09", 2),
        ("P10", 4),
        ("P11", 4),
        ("P12", 3),
        ("P13", 3),
        ("P14", 4),
        ("P15", 4),
    ];
    let tiers = tiers_by_name(&league);
    for (name, tier) in expected {
        assert_eq!(tiers[name], tier, "{}", name);
    }
    for tier in 1..=4 {
        assert_eq!(league.participants_in_tier(tier).len(), 4);
    }
    assert_eq!(league.phase, SeasonPhase::Tiered);

    // The archive remembers where everyone started the session, before the swaps.
    let started: Vec<Vec<String>> = league.history[1]
        .starting_tiers
        .iter()
        .map(|tier| tier.iter().map(|id| league.participant(*id).unwrap().name.clone()).collect())
        .collect();
    assert_eq!(started[0], ["P00", "P01", "P02", "P03"]);
    assert_eq!(started[3], ["P12", "P13", "P14", "P15"]);
}

#[test]
fn under_populated_boundary_does_not_swap() {
    // 14 players seed 4/4/4/2.
    let mut league = seeded_ladder(14);
    score_in_roster_order(&mut league);
    league.advance_session();
    let tier_4_before: Vec<String> = league.participants_in_tier(4).iter().map(|p| p.name.clone()).collect();
    assert_eq!(tier_4_before.len(), 2);

    let summary = league.advance_session();
    let moves = match summary.outcome {
        SessionOutcome::PromotionRelegation { moves } => moves,
        other => panic!("expected promotion/relegation, got {:?}", other),
    };
    assert_eq!(moves.len(), 8);
    assert!(moves.iter().all(|m| m.from != 4 && m.to != 4));

    let tier_4_after: Vec<String> = league.participants_in_tier(4).iter().map(|p| p.name.clone()).collect();
    assert_eq!(tier_4_after, tier_4_before);
}

fn entry(name: &str) -> RankingEntry {
    RankingEntry {
        participant: uuid::Uuid::new_v4(),
        name: name.to_string(),
        number: 0,
        games_played: 0,
        counted_games: 0,
        wins: 0,
        losses: 0,
        points_for: 0,
        points_against: 0,
        differential: 0,
        tier: None,
    }
}

#[test]
fn swaps_are_planned_from_pre_swap_standings() {
    let standings: Vec<Vec<RankingEntry>> = vec![
        ["a1", "a2", "a3", "a4"].map(entry).to_vec(),
        ["b1", "b2", "b3", "b4", "b5"].map(entry).to_vec(),
        ["c1", "c2", "c3"].map(entry).to_vec(),
        ["d1", "d2", "d3", "d4"].map(entry).to_vec(),
    ];
    let moves = plan_promotion_relegation(&standings);
    let summary: Vec<(&str, u8, u8)> = moves.iter().map(|m: &TierMove| (m.name.as_str(), m.from, m.to)).collect();
    assert_eq!(
        summary,
        vec![("a3", 1, 2), ("a4", 1, 2), ("b1", 2, 1), ("b2", 2, 1)]
    );
}

#[test]
fn untiered_league_just_closes_the_session() {
    let mut league = League::with_participants(LeagueConfig::round_robin(), (0..8).map(|i| format!("P{i}"))).unwrap();
    league.generate_round().unwrap();
    league.record_score(1, 1, 11, 2, None).unwrap();

    let summary = league.advance_session();
    assert_eq!(summary.outcome, SessionOutcome::Closed);
    assert_eq!(league.phase, SeasonPhase::Seeding);
    assert!(league.participants.iter().all(|p| p.games_played == 0 && p.tier == 4));
}

#[test]
fn mixed_doubles_keeps_totals_across_sessions() {
    let mut league = League::new(LeagueConfig::mixed_doubles());
    for i in 0..4 {
        league.add_team(&format!("A{i}"), &format!("B{i}")).unwrap();
    }
    league.generate_round().unwrap();
    league.record_score(1, 1, 11, 8, None).unwrap();
    league.record_score(1, 2, 6, 11, None).unwrap();

    league.advance_session();
    let total_games: u32 = league.participants.iter().map(|p| p.games_played).sum();
    let total_wins: u32 = league.participants.iter().map(|p| p.wins).sum();
    assert_eq!(total_games, 4);
    assert_eq!(total_wins, 2);
    assert!(league.participants.iter().all(|p| p.rounds_sat_out == 0));
}

#[test]
fn clear_current_session_discards_without_archiving() {
    let mut league = seeded_ladder(8);
    league.generate_round().unwrap();
    league.record_score(1, 1, 11, 3, None).unwrap();

    league.clear_current_session();
    assert!(league.rounds.is_empty());
    assert!(league.history.is_empty());
    assert_eq!(league.session, 1);
    assert!(league.participants.iter().all(|p| p.games_played == 0));
}

#[test]
fn reset_all_returns_to_seeding_with_same_roster() {
    let mut league = seeded_ladder(16);
    score_in_roster_order(&mut league);
    league.advance_session();
    league.advance_session();

    league.reset_all();
    assert_eq!(league.session, 1);
    assert!(league.history.is_empty());
    assert_eq!(league.phase, SeasonPhase::Seeding);
    assert_eq!(league.participants.len(), 16);
    assert!(league.participants.iter().all(|p| p.tier == 4));
    assert_eq!(league.next_number, 17);
}

#[test]
fn clear_all_restarts_numbering() {
    let mut league = seeded_ladder(5);
    league.clear_all();
    assert!(league.participants.is_empty());
    assert_eq!(league.next_number, 1);

    league.add_participant("Zed").unwrap();
    assert_eq!(league.participants[0].number, 1);
}
