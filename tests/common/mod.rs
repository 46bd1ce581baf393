//! Helpers shared by the integration tests.

#![allow(dead_code)]

use chrono::Utc;
use swiss_tournament::{
    add_participant, record_result, start, IdGenerator, MatchResult, Opponent, Participant,
    SequentialIds, Tournament,
};
use uuid::Uuid;

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// A participant with fixed points and real opponents given by numeric id.
pub fn participant(n: u128, points: f64, opponents: &[u128]) -> Participant {
    let mut p = Participant::new(id(n), format!("P{n}"));
    p.points = points;
    p.opponents = opponents.iter().map(|&o| Opponent::Participant(id(o))).collect();
    p
}

/// A tournament with `n` registered participants, still in Registering.
pub fn registered(n: usize) -> (Tournament, SequentialIds) {
    let mut ids = SequentialIds::starting_at(1000);
    let mut t = Tournament::new(ids.next_id(), "Test Open");
    for i in 0..n {
        t = add_participant(&t, &format!("P{i}"), &mut ids).unwrap().0;
    }
    (t, ids)
}

/// A tournament with `n` participants that has started play.
pub fn playing(n: usize) -> (Tournament, SequentialIds) {
    let (t, ids) = registered(n);
    (start(&t, Utc::now()).unwrap(), ids)
}

/// Report every pending match of the latest round as a win for player one.
pub fn report_latest(t: &Tournament) -> Tournament {
    let pending: Vec<_> = t
        .latest_round()
        .map(|r| r.matches.iter().filter(|m| !m.is_complete()).cloned().collect())
        .unwrap_or_default();
    let mut next = t.clone();
    for m in pending {
        next = record_result(&next, m.id, MatchResult::Winner(m.player_one)).unwrap();
    }
    next
}

/// Unordered pairs of every non-bye match across all rounds.
pub fn pairings(t: &Tournament) -> Vec<(Uuid, Uuid)> {
    t.rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .filter_map(|m| {
            let two = m.player_two?;
            Some(if m.player_one <= two {
                (m.player_one, two)
            } else {
                (two, m.player_one)
            })
        })
        .collect()
}
