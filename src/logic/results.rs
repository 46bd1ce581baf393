//! Reporting results, correcting them, and dropping participants.

use crate::logic::lifecycle::{advance_status, require_status};
use crate::logic::scoring::refresh_standings;
use crate::models::{
    Action, MatchId, MatchOutcome, MatchResult, ParticipantId, Tournament, TournamentError,
    TournamentStatus,
};

/// Declare the result of a pending match (Playing or CompleteRounds).
///
/// A winner must be one of the two participants. Bye matches are complete from
/// the start and cannot be reported.
pub fn record_result(
    tournament: &Tournament,
    match_id: MatchId,
    result: MatchResult,
) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::RecordResult, TournamentStatus::accepts_results)?;
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.is_bye() {
        return Err(TournamentError::ByeMatch(match_id));
    }
    if m.is_complete() {
        return Err(TournamentError::MatchAlreadyComplete(match_id));
    }
    if let MatchResult::Winner(winner) = result {
        if !m.involves(winner) {
            return Err(TournamentError::NotInMatch {
                match_id,
                participant: winner,
            });
        }
    }

    let mut next = tournament.clone();
    set_outcome(&mut next, match_id, MatchOutcome::Complete(result));
    next.participants = refresh_standings(&next.participants, &next.rounds);
    Ok(next)
}

/// Put a completed match back to Pending so its result can be corrected.
pub fn reopen_match(tournament: &Tournament, match_id: MatchId) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::ReopenMatch, TournamentStatus::accepts_results)?;
    let m = tournament
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if m.is_bye() {
        return Err(TournamentError::ByeMatch(match_id));
    }
    if !m.is_complete() {
        return Err(TournamentError::MatchNotComplete(match_id));
    }

    let mut next = tournament.clone();
    set_outcome(&mut next, match_id, MatchOutcome::Pending);
    next.participants = refresh_standings(&next.participants, &next.rounds);
    Ok(next)
}

/// Flag a participant as dropped (any status except Finalized).
///
/// During play, a pending match of theirs in the latest round is handed to the
/// opponent as a walkover. Past results and opponents are left as they are; the
/// participant is only excluded from future pairings. If the smaller field needs
/// no further rounds, play moves on to CompleteRounds.
pub fn drop_participant(
    tournament: &Tournament,
    participant_id: ParticipantId,
) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::DropParticipant, |s| {
        s != TournamentStatus::Finalized
    })?;
    let participant = tournament
        .participant(participant_id)
        .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
    if participant.dropped {
        return Err(TournamentError::AlreadyDropped(participant_id));
    }

    let mut next = tournament.clone();
    if let Some(p) = next.participant_mut(participant_id) {
        p.dropped = true;
    }

    if next.status.accepts_results() {
        if let Some(round) = next.rounds.last_mut() {
            for m in round.matches.iter_mut() {
                if m.is_complete() {
                    continue;
                }
                if let Some(opponent) = m.opponent_of(participant_id) {
                    log::info!(
                        "tournament {}: walkover to {} in round {}",
                        next.id,
                        opponent,
                        m.round
                    );
                    m.outcome = MatchOutcome::Complete(MatchResult::Winner(opponent));
                }
            }
        }
    }

    next.participants = refresh_standings(&next.participants, &next.rounds);
    Ok(advance_status(&next))
}

fn set_outcome(tournament: &mut Tournament, match_id: MatchId, outcome: MatchOutcome) {
    if let Some(m) = tournament.find_match_mut(match_id) {
        m.outcome = outcome;
    }
}
