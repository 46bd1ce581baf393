//! Rebuild cached points, opponent lists and tiebreaks from match history.

use crate::logic::tiebreakers::compute_tiebreakers;
use crate::models::{MatchResult, Opponent, Participant, ParticipantId, Round};
use std::collections::HashMap;

pub const WIN_POINTS: f64 = 1.0;
pub const TIE_POINTS: f64 = 0.5;
pub const BYE_POINTS: f64 = 1.0;

/// Recompute `points` and `opponents` for every participant from `rounds`.
///
/// Names, dropped flags and tiebreaks are carried over unchanged. Matches that
/// mention unknown participants are skipped for those participants.
pub fn rebuild_records(participants: &[Participant], rounds: &[Round]) -> Vec<Participant> {
    let mut rebuilt: Vec<Participant> = participants
        .iter()
        .map(|p| Participant {
            points: 0.0,
            opponents: Vec::new(),
            ..p.clone()
        })
        .collect();
    let index: HashMap<ParticipantId, usize> =
        rebuilt.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

    let mut credit = |id: ParticipantId, opponent: Opponent, points: f64| {
        if let Some(&i) = index.get(&id) {
            rebuilt[i].opponents.push(opponent);
            rebuilt[i].points += points;
        }
    };

    for m in rounds.iter().flat_map(|r| r.matches.iter()) {
        let result = m.result();
        let points_for = |id: ParticipantId| match result {
            Some(MatchResult::Winner(w)) if w == id => {
                if m.is_bye() {
                    BYE_POINTS
                } else {
                    WIN_POINTS
                }
            }
            Some(MatchResult::Tie) => TIE_POINTS,
            _ => 0.0,
        };
        match m.player_two {
            None => credit(m.player_one, Opponent::Bye, points_for(m.player_one)),
            Some(two) => {
                credit(m.player_one, Opponent::Participant(two), points_for(m.player_one));
                credit(two, Opponent::Participant(m.player_one), points_for(two));
            }
        }
    }

    rebuilt
}

/// Rebuild records, then recompute tiebreakers for every active participant.
///
/// All tiebreakers read the same rebuilt snapshot, so the result does not
/// depend on the order participants are processed in. Dropped participants
/// keep the tiebreaks they had.
pub fn refresh_standings(participants: &[Participant], rounds: &[Round]) -> Vec<Participant> {
    let rebuilt = rebuild_records(participants, rounds);
    rebuilt
        .iter()
        .map(|p| {
            if p.dropped {
                return p.clone();
            }
            let tb = compute_tiebreakers(p, &rebuilt);
            Participant {
                tiebreak1: tb.tiebreak1,
                tiebreak2: tb.tiebreak2,
                ..p.clone()
            }
        })
        .collect()
}
