//! Tiebreak scores computed from the opponents a participant has faced.

use crate::models::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The two cascading tiebreak scores of one participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiebreakers {
    /// Average points of the participant's opponents.
    pub tiebreak1: f64,
    /// Sum of each opponent's opponents' points, divided by the squared opponent count.
    pub tiebreak2: f64,
}

/// Compute both tiebreakers for `participant` against the current points of `all`.
///
/// Byes are not opponents here. Opponents missing from `all` are ignored. With
/// no real opponents both scores are 0.
pub fn compute_tiebreakers(participant: &Participant, all: &[Participant]) -> Tiebreakers {
    let by_id: HashMap<ParticipantId, &Participant> = all.iter().map(|p| (p.id, p)).collect();

    let opponents: Vec<&Participant> = participant
        .real_opponents()
        .into_iter()
        .filter_map(|id| by_id.get(&id).copied())
        .collect();
    if opponents.is_empty() {
        return Tiebreakers::default();
    }

    let n = opponents.len() as f64;
    let tiebreak1 = opponents.iter().map(|o| o.points).sum::<f64>() / n;
    let second_order: f64 = opponents
        .iter()
        .map(|o| opponents_points(o, &by_id))
        .sum();

    Tiebreakers {
        tiebreak1,
        tiebreak2: second_order / (n * n),
    }
}

fn opponents_points(participant: &Participant, by_id: &HashMap<ParticipantId, &Participant>) -> f64 {
    participant
        .real_opponents()
        .iter()
        .filter_map(|id| by_id.get(id))
        .map(|o| o.points)
        .sum()
}
