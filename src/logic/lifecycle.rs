//! Tournament state machine: registration, start, round scheduling and completion.
//!
//! Every function takes a snapshot and returns a new one. Preconditions are
//! checked before anything is built, so an `Err` never comes with a partial change.

use crate::ids::IdGenerator;
use crate::logic::pairing::generate_round;
use crate::logic::scoring::refresh_standings;
use crate::models::{
    Action, Participant, ParticipantId, Tournament, TournamentError, TournamentStatus,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Reject `action` unless the tournament's status satisfies `allowed`.
pub(crate) fn require_status(
    tournament: &Tournament,
    action: Action,
    allowed: impl Fn(TournamentStatus) -> bool,
) -> Result<(), TournamentError> {
    if allowed(tournament.status) {
        Ok(())
    } else {
        Err(TournamentError::IllegalStateTransition {
            action,
            status: tournament.status,
        })
    }
}

/// Number of rounds a Swiss tournament with `active` participants plays: ⌈log2(active)⌉, at least 1.
pub fn rounds_required(active: usize) -> u32 {
    if active <= 2 {
        1
    } else {
        usize::BITS - (active - 1).leading_zeros()
    }
}

/// Register a participant (Registering or Closed). Returns the new snapshot and the participant's id.
pub fn add_participant<G: IdGenerator + ?Sized>(
    tournament: &Tournament,
    name: &str,
    ids: &mut G,
) -> Result<(Tournament, ParticipantId), TournamentError> {
    require_status(tournament, Action::AddParticipant, TournamentStatus::is_registration)?;
    let participant = Participant::new(ids.next_id(), name.trim());
    let id = participant.id;
    let mut next = tournament.clone();
    next.participants.push(participant);
    Ok((next, id))
}

/// Remove a participant entirely (Registering or Closed). Once play starts, use drop instead.
pub fn remove_participant(
    tournament: &Tournament,
    participant_id: ParticipantId,
) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::RemoveParticipant, TournamentStatus::is_registration)?;
    if tournament.participant(participant_id).is_none() {
        return Err(TournamentError::ParticipantNotFound(participant_id));
    }
    let mut next = tournament.clone();
    next.participants.retain(|p| p.id != participant_id);
    Ok(next)
}

/// Registering -> Closed.
pub fn close(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::Close, |s| s == TournamentStatus::Registering)?;
    Ok(with_status(tournament, TournamentStatus::Closed))
}

/// Closed -> Registering.
pub fn reopen(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::Reopen, |s| s == TournamentStatus::Closed)?;
    Ok(with_status(tournament, TournamentStatus::Registering))
}

/// Registering or Closed -> Playing. Needs at least 2 active participants. Irreversible.
pub fn start(tournament: &Tournament, now: DateTime<Utc>) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::Start, TournamentStatus::is_registration)?;
    let active = tournament.active_count();
    if active < 2 {
        return Err(TournamentError::InsufficientParticipants { active });
    }
    let mut next = with_status(tournament, TournamentStatus::Playing);
    next.started_at = Some(now);
    Ok(next)
}

/// Whether a new round may be paired now: status is Playing, more rounds are
/// still due, and the latest round is fully reported.
pub fn check_can_generate(tournament: &Tournament) -> Result<(), TournamentError> {
    require_status(&advance_status(tournament), Action::GenerateRound, |s| {
        s == TournamentStatus::Playing
    })?;
    if let Some(latest) = tournament.latest_round() {
        let pending = latest.pending_matches();
        if pending > 0 {
            return Err(TournamentError::RoundIncomplete {
                round: latest.number,
                pending,
            });
        }
    }
    Ok(())
}

/// Pair and append the next round (Playing only, latest round fully reported).
///
/// Scores are refreshed after the round is appended, and the status moves to
/// CompleteRounds if this was the last round to schedule.
pub fn next_round<R, G>(
    tournament: &Tournament,
    rng: &mut R,
    ids: &mut G,
) -> Result<Tournament, TournamentError>
where
    R: Rng + ?Sized,
    G: IdGenerator + ?Sized,
{
    check_can_generate(tournament)?;

    let round = generate_round(&tournament.rounds, &tournament.participants, rng, ids)?;
    log::info!(
        "tournament {}: paired round {} ({} matches, bye: {:?})",
        tournament.id,
        round.number,
        round.matches.len(),
        round.bye
    );

    let mut next = tournament.clone();
    next.rounds.push(round);
    next.participants = refresh_standings(&next.participants, &next.rounds);
    Ok(advance_status(&next))
}

/// Apply any automatic transition: Playing -> CompleteRounds once enough rounds
/// are scheduled for the current active count, or fewer than two participants remain.
pub fn advance_status(tournament: &Tournament) -> Tournament {
    let scheduled = tournament.rounds.len() as u32;
    let active = tournament.active_count();
    let due = scheduled >= rounds_required(active) || active < 2;
    if tournament.status == TournamentStatus::Playing && due {
        log::info!(
            "tournament {}: all rounds scheduled ({} rounds, {} active)",
            tournament.id,
            scheduled,
            active
        );
        return with_status(tournament, TournamentStatus::CompleteRounds);
    }
    tournament.clone()
}

/// CompleteRounds -> CompleteTournament once every match has a result.
pub fn finalize_rounds(tournament: &Tournament, now: DateTime<Utc>) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::FinalizeRounds, |s| {
        s == TournamentStatus::CompleteRounds
    })?;
    if let Some(round) = tournament.rounds.iter().find(|r| !r.is_complete()) {
        return Err(TournamentError::RoundIncomplete {
            round: round.number,
            pending: round.pending_matches(),
        });
    }
    let mut next = with_status(tournament, TournamentStatus::CompleteTournament);
    next.ended_at = Some(now);
    Ok(next)
}

/// CompleteTournament -> Finalized. Terminal.
pub fn confirm(tournament: &Tournament) -> Result<Tournament, TournamentError> {
    require_status(tournament, Action::Confirm, |s| {
        s == TournamentStatus::CompleteTournament
    })?;
    Ok(with_status(tournament, TournamentStatus::Finalized))
}

fn with_status(tournament: &Tournament, status: TournamentStatus) -> Tournament {
    Tournament {
        status,
        ..tournament.clone()
    }
}
