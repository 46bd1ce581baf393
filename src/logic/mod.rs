//! Tournament business logic: tiebreakers, standings, pairing, and the status lifecycle.

mod lifecycle;
mod pairing;
mod results;
mod scoring;
mod standings;
mod tiebreakers;

pub use lifecycle::{
    add_participant, advance_status, check_can_generate, close, confirm, finalize_rounds,
    next_round, remove_participant, reopen, rounds_required, start,
};
pub use pairing::generate_round;
pub use results::{drop_participant, record_result, reopen_match};
pub use scoring::{rebuild_records, refresh_standings, BYE_POINTS, TIE_POINTS, WIN_POINTS};
pub use standings::{
    compare_standing, sort_standings, standings_table, write_standings_csv, StandingRow,
};
pub use tiebreakers::{compute_tiebreakers, Tiebreakers};
