//! Data structures for a Swiss tournament: participants, matches, rounds, tournament status.

mod game;
mod participant;
mod tournament;

pub use game::{Match, MatchId, MatchOutcome, MatchResult, Round, RoundId};
pub use participant::{Opponent, Participant, ParticipantId};
pub use tournament::{
    Action, Exhaustion, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus,
};
