//! Five-participant tournament played from registration to confirmation.

mod common;

use chrono::Utc;
use common::{pairings, playing, report_latest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use swiss_tournament::{confirm, finalize_rounds, next_round, sort_standings, TournamentStatus};

#[test]
fn five_participants_play_three_rounds() {
    let (t, mut ids) = playing(5);
    let mut rng = StdRng::seed_from_u64(2024);

    // Round 1: two matches and a bye.
    let t = next_round(&t, &mut rng, &mut ids).unwrap();
    let round1 = t.latest_round().unwrap().clone();
    assert_eq!(round1.number, 1);
    assert_eq!(round1.matches.len(), 3);
    assert_eq!(round1.matches.iter().filter(|m| m.is_bye()).count(), 1);
    let first_bye = round1.bye.unwrap();
    assert_eq!(t.participant(first_bye).unwrap().points, 1.0);

    // Declare both winners, then pair round 2.
    let t = report_latest(&t);
    assert_eq!(t.participants.iter().filter(|p| p.points == 1.0).count(), 3);
    let t = next_round(&t, &mut rng, &mut ids).unwrap();
    let round2 = t.latest_round().unwrap().clone();
    assert_eq!(round2.number, 2);
    assert_eq!(round2.matches.len(), 3);
    assert_ne!(round2.bye, Some(first_bye));
    for m in round2.matches.iter().filter(|m| !m.is_bye()) {
        let (a, b) = (m.player_one, m.player_two.unwrap());
        assert!(t.participant(a).unwrap().has_faced(b));
        assert_eq!(t.participant(a).unwrap().opponents.len(), 2);
    }
    assert_eq!(t.status, TournamentStatus::Playing);

    let all = pairings(&t);
    let distinct: HashSet<_> = all.iter().collect();
    assert_eq!(all.len(), distinct.len(), "round 2 repeated a round-1 pairing");

    // Round 3 is the last one scheduled for five participants.
    let t = report_latest(&t);
    let t = next_round(&t, &mut rng, &mut ids).unwrap();
    assert_eq!(t.status, TournamentStatus::CompleteRounds);
    let byes: Vec<_> = t.rounds.iter().filter_map(|r| r.bye).collect();
    assert_eq!(byes.len(), 3);
    assert_eq!(byes.iter().collect::<HashSet<_>>().len(), 3);

    let t = report_latest(&t);
    assert!(t.all_matches_complete());
    let t = finalize_rounds(&t, Utc::now()).unwrap();
    let t = confirm(&t).unwrap();
    assert_eq!(t.status, TournamentStatus::Finalized);

    let total: f64 = t.participants.iter().map(|p| p.points).sum();
    // Six decided matches and three byes.
    assert_eq!(total, 9.0);
    let standings = sort_standings(&t.participants);
    assert!(standings.windows(2).all(|w| w[0].points >= w[1].points));
}
