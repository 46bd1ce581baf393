//! Swiss tournament organizer: library with models, pairing engine and tournament lifecycle.

pub mod config;
pub mod ids;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::ServiceConfig;
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use logic::{
    add_participant, advance_status, check_can_generate, close, compare_standing,
    compute_tiebreakers, confirm, drop_participant, finalize_rounds, generate_round, next_round,
    rebuild_records, record_result, refresh_standings, remove_participant, reopen, reopen_match,
    rounds_required, sort_standings, standings_table, start, write_standings_csv, StandingRow,
    Tiebreakers,
};
pub use models::{
    Action, Exhaustion, Match, MatchId, MatchOutcome, MatchResult, Opponent, Participant,
    ParticipantId, Round, RoundId, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus,
};
pub use service::{ServiceError, ServiceResult, TournamentService};
pub use store::{MemoryStore, ScoreUpdate, StoreError, StoreEvent, TournamentStore};
