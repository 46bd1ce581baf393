//! Tiebreak scores from opponents' and opponents' opponents' points.

mod common;

use common::{id, participant};
use swiss_tournament::{compute_tiebreakers, refresh_standings, Opponent, Tiebreakers};

#[test]
fn averages_opponents_and_their_opponents() {
    // A faced B (2.0) and C (4.0); B also faced D (1.0), C also faced E (3.0).
    let a = participant(1, 0.0, &[2, 3]);
    let b = participant(2, 2.0, &[1, 4]);
    let c = participant(3, 4.0, &[1, 5]);
    let d = participant(4, 1.0, &[2]);
    let e = participant(5, 3.0, &[3]);
    let all = vec![a.clone(), b, c, d, e];

    let tb = compute_tiebreakers(&a, &all);
    assert_eq!(tb.tiebreak1, 3.0);
    assert_eq!(tb.tiebreak2, 1.0);
}

#[test]
fn no_opponents_scores_zero() {
    let lone = participant(1, 1.0, &[]);
    assert_eq!(compute_tiebreakers(&lone, &[lone.clone()]), Tiebreakers::default());
}

#[test]
fn bye_is_not_an_opponent() {
    let mut a = participant(1, 2.0, &[2]);
    a.opponents.push(Opponent::Bye);
    let b = participant(2, 3.0, &[1]);
    let all = vec![a.clone(), b];

    let tb = compute_tiebreakers(&a, &all);
    assert_eq!(tb.tiebreak1, 3.0);
    // B's only opponent is A with 2.0 points; one opponent, so divided by 1.
    assert_eq!(tb.tiebreak2, 2.0);
}

#[test]
fn only_bye_scores_zero() {
    let mut a = participant(1, 1.0, &[]);
    a.opponents.push(Opponent::Bye);
    assert_eq!(compute_tiebreakers(&a, &[a.clone()]), Tiebreakers::default());
}

#[test]
fn refresh_skips_dropped_participants() {
    let mut a = participant(1, 0.0, &[]);
    a.dropped = true;
    a.tiebreak1 = 7.5;
    let b = participant(2, 0.0, &[]);

    let refreshed = refresh_standings(&[a, b], &[]);
    let a = refreshed.iter().find(|p| p.id == id(1)).unwrap();
    assert_eq!(a.tiebreak1, 7.5);
}
