//! Property-based tests over whole simulated tournaments using proptest.
//!
//! Each case registers a random number of participants, optionally drops one
//! mid-round, and plays until every round is scheduled, resolving matches at random.

mod common;

use common::{pairings, playing};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use swiss_tournament::{
    drop_participant, next_round, record_result, rounds_required, sort_standings, MatchResult,
    Tournament, TournamentError, TournamentStatus,
};

struct Played {
    tournament: Tournament,
    /// Active participants at the moment each round was paired.
    active_per_round: Vec<usize>,
}

fn resolve_latest(t: &Tournament, rng: &mut StdRng) -> Tournament {
    let pending: Vec<_> = t
        .latest_round()
        .map(|r| r.matches.iter().filter(|m| !m.is_complete()).cloned().collect())
        .unwrap_or_default();
    let mut next = t.clone();
    for m in pending {
        let result = match (rng.gen_range(0..3), m.player_two) {
            (0, _) | (_, None) => MatchResult::Winner(m.player_one),
            (1, Some(two)) => MatchResult::Winner(two),
            _ => MatchResult::Tie,
        };
        next = record_result(&next, m.id, result).unwrap();
    }
    next
}

fn play(n: usize, seed: u64, drop_after: Option<usize>) -> Result<Played, TestCaseError> {
    let (mut t, mut ids) = playing(n);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut active_per_round = Vec::new();

    while t.status == TournamentStatus::Playing && t.rounds.len() < 16 {
        let active = t.active_count();
        match next_round(&t, &mut rng, &mut ids) {
            Ok(next) => t = next,
            Err(TournamentError::PairingExhausted(_)) => break,
            Err(TournamentError::InsufficientParticipants { .. }) => break,
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
        }
        active_per_round.push(active);

        if drop_after == Some(t.rounds.len()) && t.active_count() > 2 {
            let leaver = t.participants.iter().find(|p| p.is_active()).map(|p| p.id);
            if let Some(leaver) = leaver {
                t = drop_participant(&t, leaver).map_err(|e| TestCaseError::fail(e.to_string()))?;
            }
        }
        t = resolve_latest(&t, &mut rng);
    }

    Ok(Played {
        tournament: t,
        active_per_round,
    })
}

proptest! {
    #[test]
    fn no_pair_meets_twice(n in 2usize..=12, seed in any::<u64>(), drop_after in proptest::option::of(1usize..4)) {
        let played = play(n, seed, drop_after)?;
        let all = pairings(&played.tournament);
        let distinct: HashSet<_> = all.iter().collect();
        prop_assert_eq!(all.len(), distinct.len());
    }

    #[test]
    fn nobody_gets_two_byes(n in 2usize..=12, seed in any::<u64>(), drop_after in proptest::option::of(1usize..4)) {
        let played = play(n, seed, drop_after)?;
        let mut seen = HashSet::new();
        for round in &played.tournament.rounds {
            let byes: Vec<_> = round.matches.iter().filter(|m| m.is_bye()).collect();
            prop_assert!(byes.len() <= 1);
            for bye in byes {
                prop_assert!(seen.insert(bye.player_one), "second bye for {}", bye.player_one);
                prop_assert_eq!(round.bye, Some(bye.player_one));
            }
        }
    }

    #[test]
    fn match_count_follows_active_parity(n in 2usize..=12, seed in any::<u64>(), drop_after in proptest::option::of(1usize..4)) {
        let played = play(n, seed, drop_after)?;
        let rounds = &played.tournament.rounds;
        prop_assert_eq!(rounds.len(), played.active_per_round.len());
        for (round, &active) in rounds.iter().zip(&played.active_per_round) {
            prop_assert_eq!(round.matches.len(), (active + 1) / 2);
            prop_assert_eq!(round.bye.is_some(), active % 2 == 1);
        }
    }

    #[test]
    fn rounds_are_numbered_without_gaps(n in 2usize..=12, seed in any::<u64>(), drop_after in proptest::option::of(1usize..4)) {
        let played = play(n, seed, drop_after)?;
        let rounds = &played.tournament.rounds;
        let numbers: Vec<u32> = rounds.iter().map(|r| r.number).collect();
        let expected: Vec<u32> = (1..=rounds.len() as u32).collect();
        prop_assert_eq!(numbers, expected);
        prop_assert!(rounds.len() as u32 <= rounds_required(n));
        // Each round was paired while the field at that moment still needed it.
        for (before, &active) in played.active_per_round.iter().enumerate() {
            prop_assert!((before as u32) < rounds_required(active));
        }
        if played.tournament.status == TournamentStatus::CompleteRounds {
            let remaining = played.tournament.active_count();
            prop_assert!(rounds.len() as u32 >= rounds_required(remaining) || remaining < 2);
        }
        for round in rounds {
            prop_assert!(round.matches.iter().all(|m| m.round == round.number));
        }
    }

    #[test]
    fn standings_are_deterministic(n in 2usize..=12, seed in any::<u64>()) {
        let played = play(n, seed, None)?;
        let participants = &played.tournament.participants;
        prop_assert_eq!(sort_standings(participants), sort_standings(participants));
    }
}
