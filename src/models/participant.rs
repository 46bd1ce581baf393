//! Participant and the opponents they have faced.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and lookups).
pub type ParticipantId = Uuid;

/// Someone a participant was paired against. A bye counts as an opponent so
/// that it is never handed out twice.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    Participant(ParticipantId),
    Bye,
}

/// A registered participant.
///
/// `points`, `opponents`, `tiebreak1` and `tiebreak2` are cached values; they
/// are rebuilt from match history by [`crate::rebuild_records`] and
/// [`crate::refresh_standings`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// 1.0 per win (byes included), 0.5 per tie.
    pub points: f64,
    /// Opponents in the order they were faced.
    pub opponents: Vec<Opponent>,
    /// Average points of the participant's opponents.
    pub tiebreak1: f64,
    /// Opponents' opponents' points over the squared opponent count.
    pub tiebreak2: f64,
    pub dropped: bool,
}

impl Participant {
    /// Create a new participant. Scores start at zero.
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            points: 0.0,
            opponents: Vec::new(),
            tiebreak1: 0.0,
            tiebreak2: 0.0,
            dropped: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.dropped
    }

    /// True if this participant has already been given a bye.
    pub fn had_bye(&self) -> bool {
        self.opponents.contains(&Opponent::Bye)
    }

    pub fn has_faced(&self, other: ParticipantId) -> bool {
        self.opponents.contains(&Opponent::Participant(other))
    }

    /// Real opponents only, without duplicates, in the order they were faced.
    pub fn real_opponents(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = Vec::with_capacity(self.opponents.len());
        for opponent in &self.opponents {
            if let Opponent::Participant(id) = opponent {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
        }
        ids
    }
}
