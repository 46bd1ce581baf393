//! Match, its outcome, and Round.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// How a finished match ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Winner(ParticipantId),
    Tie,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    #[default]
    Pending,
    Complete(MatchResult),
}

/// A single pairing. `player_two` is `None` for a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub player_one: ParticipantId,
    pub player_two: Option<ParticipantId>,
    /// 1-based number of the round this match belongs to.
    pub round: u32,
    pub outcome: MatchOutcome,
}

impl Match {
    /// A pending match between two participants.
    pub fn new(id: MatchId, round: u32, player_one: ParticipantId, player_two: ParticipantId) -> Self {
        Self {
            id,
            player_one,
            player_two: Some(player_two),
            round,
            outcome: MatchOutcome::Pending,
        }
    }

    /// A bye: created already complete with the solitary participant as winner.
    pub fn bye(id: MatchId, round: u32, participant: ParticipantId) -> Self {
        Self {
            id,
            player_one: participant,
            player_two: None,
            round,
            outcome: MatchOutcome::Complete(MatchResult::Winner(participant)),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_two.is_none()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, MatchOutcome::Complete(_))
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.player_one == participant || self.player_two == Some(participant)
    }

    /// The other side of the match, if `participant` plays in it and it is not a bye.
    pub fn opponent_of(&self, participant: ParticipantId) -> Option<ParticipantId> {
        match self.player_two {
            Some(two) if self.player_one == participant => Some(two),
            Some(two) if two == participant => Some(self.player_one),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<MatchResult> {
        match self.outcome {
            MatchOutcome::Pending => None,
            MatchOutcome::Complete(result) => Some(result),
        }
    }
}

/// One round of play. The set of matches is fixed at creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1-based, gapless.
    pub number: u32,
    /// Paired matches first, the bye match (if any) last.
    pub matches: Vec<Match>,
    /// Who drew the bye this round.
    pub bye: Option<ParticipantId>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_complete)
    }

    pub fn pending_matches(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_complete()).count()
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }
}
