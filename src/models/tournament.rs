//! Tournament, TournamentStatus, and the errors raised by tournament operations.

use crate::models::game::{Match, MatchId, Round};
use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a tournament.
pub type TournamentId = uuid::Uuid;

/// Operations the state machine can be asked to perform.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddParticipant,
    RemoveParticipant,
    DropParticipant,
    Close,
    Reopen,
    Start,
    GenerateRound,
    RecordResult,
    ReopenMatch,
    FinalizeRounds,
    Confirm,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::AddParticipant => "add participant",
            Action::RemoveParticipant => "remove participant",
            Action::DropParticipant => "drop participant",
            Action::Close => "close registration",
            Action::Reopen => "reopen registration",
            Action::Start => "start",
            Action::GenerateRound => "generate round",
            Action::RecordResult => "record result",
            Action::ReopenMatch => "reopen match",
            Action::FinalizeRounds => "finalize rounds",
            Action::Confirm => "confirm",
        };
        f.write_str(s)
    }
}

/// Why the pairing engine could not produce a full round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Exhaustion {
    /// The headcount is odd and every active participant already had a bye.
    NoByeCandidate,
    /// This participant has already faced everyone still unpaired.
    NoViableOpponent(ParticipantId),
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::NoByeCandidate => write!(f, "every active participant already had a bye"),
            Exhaustion::NoViableOpponent(id) => {
                write!(f, "participant {id} has no opponent left to face")
            }
        }
    }
}

/// Errors that can occur during tournament operations.
///
/// Every operation validates before it builds its result, so an error always
/// leaves the input tournament untouched.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TournamentError {
    #[error("Need at least 2 active participants (have {active})")]
    InsufficientParticipants { active: usize },

    #[error("Cannot {action} while the tournament is {status}")]
    IllegalStateTransition {
        action: Action,
        status: TournamentStatus,
    },

    #[error("Round {round} still has {pending} pending match(es)")]
    RoundIncomplete { round: u32, pending: usize },

    #[error("Pairing exhausted: {0}")]
    PairingExhausted(Exhaustion),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Participant already dropped: {0}")]
    AlreadyDropped(ParticipantId),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Match already has a result: {0}")]
    MatchAlreadyComplete(MatchId),

    #[error("Match has no result to reopen: {0}")]
    MatchNotComplete(MatchId),

    #[error("Bye matches cannot be changed: {0}")]
    ByeMatch(MatchId),

    #[error("Participant {participant} does not play in match {match_id}")]
    NotInMatch {
        match_id: MatchId,
        participant: ParticipantId,
    },
}

/// Lifecycle of a tournament, in the order it moves through them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting participants.
    #[default]
    Registering,
    /// Registration paused; participants can still be added or removed.
    Closed,
    /// Rounds are being paired and played.
    Playing,
    /// The last round has been paired; results may still be outstanding.
    CompleteRounds,
    /// Every match has a result; waiting for the host to confirm.
    CompleteTournament,
    /// Terminal.
    Finalized,
}

impl TournamentStatus {
    /// Registration is open (participants may be added or removed).
    pub fn is_registration(self) -> bool {
        matches!(self, TournamentStatus::Registering | TournamentStatus::Closed)
    }

    /// Results may be reported or corrected.
    pub fn accepts_results(self) -> bool {
        matches!(self, TournamentStatus::Playing | TournamentStatus::CompleteRounds)
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TournamentStatus::Registering => "registering",
            TournamentStatus::Closed => "closed",
            TournamentStatus::Playing => "playing",
            TournamentStatus::CompleteRounds => "complete (rounds)",
            TournamentStatus::CompleteTournament => "complete (tournament)",
            TournamentStatus::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    Swiss,
}

/// Full tournament snapshot: participants, rounds and lifecycle status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub rounds: Vec<Round>,
    /// Registration order. Dropped participants stay in the list.
    pub participants: Vec<Participant>,
    pub status: TournamentStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a new Swiss tournament in Registering with no participants.
    pub fn new(id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            format: TournamentFormat::Swiss,
            rounds: Vec::new(),
            participants: Vec::new(),
            status: TournamentStatus::Registering,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_active()).count()
    }

    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.rounds.iter().find_map(|r| r.find_match(id))
    }

    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.rounds
            .iter_mut()
            .flat_map(|r| r.matches.iter_mut())
            .find(|m| m.id == id)
    }

    /// Every match in every round has a result.
    pub fn all_matches_complete(&self) -> bool {
        self.rounds.iter().all(Round::is_complete)
    }
}
