//! Persistence boundary: the operations the service needs from a tournament store,
//! and an in-memory implementation.

use crate::models::{
    Match, MatchId, Participant, ParticipantId, Round, RoundId, Tournament, TournamentId,
    TournamentStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tokio::sync::broadcast;

/// Buffered change notifications per tournament before slow subscribers start lagging.
const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Participant not found in store: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("Match not found in store: {0}")]
    MatchNotFound(MatchId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Worth trying the same write again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Cached score fields of one participant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub participant: ParticipantId,
    pub points: f64,
    pub tiebreak1: f64,
    pub tiebreak2: f64,
}

impl ScoreUpdate {
    pub fn of(participant: &Participant) -> Self {
        Self {
            participant: participant.id,
            points: participant.points,
            tiebreak1: participant.tiebreak1,
            tiebreak2: participant.tiebreak2,
        }
    }
}

/// Change notification for one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    ParticipantChanged(ParticipantId),
    ParticipantRemoved(ParticipantId),
    RoundCreated(RoundId),
    MatchChanged(MatchId),
    StatusChanged(TournamentStatus),
}

/// Storage for tournaments. Every write is independently retryable.
pub trait TournamentStore: Send + Sync {
    fn create_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;

    /// Full snapshot: header, participants and rounds.
    fn fetch_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError>;

    fn fetch_participants(&self, id: TournamentId) -> Result<Vec<Participant>, StoreError>;

    fn fetch_rounds(&self, id: TournamentId) -> Result<Vec<Round>, StoreError>;

    /// Insert or replace a participant.
    fn write_participant(&self, id: TournamentId, participant: &Participant) -> Result<(), StoreError>;

    fn delete_participant(&self, id: TournamentId, participant: ParticipantId) -> Result<(), StoreError>;

    /// Create a round. Writing a round id that already exists is a no-op.
    fn write_round(&self, id: TournamentId, round: &Round) -> Result<(), StoreError>;

    /// Replace an existing match (matched by id). Fails if the match does not exist.
    fn write_match(&self, id: TournamentId, m: &Match) -> Result<(), StoreError>;

    /// Fails if the participant does not exist.
    fn write_participant_score_update(&self, id: TournamentId, update: &ScoreUpdate) -> Result<(), StoreError>;

    fn write_tournament_status(&self, id: TournamentId, status: TournamentStatus) -> Result<(), StoreError>;

    fn write_timestamps(
        &self,
        id: TournamentId,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    /// Live change notifications for one tournament.
    fn subscribe(&self, id: TournamentId) -> Result<broadcast::Receiver<StoreEvent>, StoreError>;
}

struct Entry {
    tournament: Tournament,
    events: broadcast::Sender<StoreEvent>,
}

/// Tournaments held in memory, keyed by id.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<TournamentId, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, id: TournamentId, f: impl FnOnce(&Entry) -> T) -> Result<T, StoreError> {
        let g = self.entries.read().map_err(|_| lock_error())?;
        let entry = g.get(&id).ok_or(StoreError::TournamentNotFound(id))?;
        Ok(f(entry))
    }

    /// Apply `f` and broadcast the event it returns, if any.
    fn update(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> Result<Option<StoreEvent>, StoreError>,
    ) -> Result<(), StoreError> {
        let mut g = self.entries.write().map_err(|_| lock_error())?;
        let entry = g.get_mut(&id).ok_or(StoreError::TournamentNotFound(id))?;
        if let Some(event) = f(&mut entry.tournament)? {
            // No subscribers is fine.
            let _ = entry.events.send(event);
        }
        Ok(())
    }
}

fn lock_error() -> StoreError {
    StoreError::Unavailable("lock error".to_string())
}

impl TournamentStore for MemoryStore {
    fn create_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut g = self.entries.write().map_err(|_| lock_error())?;
        g.entry(tournament.id).or_insert_with(|| Entry {
            tournament: tournament.clone(),
            events: broadcast::channel(EVENT_CAPACITY).0,
        });
        Ok(())
    }

    fn fetch_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        self.read(id, |e| e.tournament.clone())
    }

    fn fetch_participants(&self, id: TournamentId) -> Result<Vec<Participant>, StoreError> {
        self.read(id, |e| e.tournament.participants.clone())
    }

    fn fetch_rounds(&self, id: TournamentId) -> Result<Vec<Round>, StoreError> {
        self.read(id, |e| e.tournament.rounds.clone())
    }

    fn write_participant(&self, id: TournamentId, participant: &Participant) -> Result<(), StoreError> {
        self.update(id, |t| {
            match t.participant_mut(participant.id) {
                Some(existing) => *existing = participant.clone(),
                None => t.participants.push(participant.clone()),
            }
            Ok(Some(StoreEvent::ParticipantChanged(participant.id)))
        })
    }

    fn delete_participant(&self, id: TournamentId, participant: ParticipantId) -> Result<(), StoreError> {
        self.update(id, |t| {
            let before = t.participants.len();
            t.participants.retain(|p| p.id != participant);
            Ok((t.participants.len() != before).then_some(StoreEvent::ParticipantRemoved(participant)))
        })
    }

    fn write_round(&self, id: TournamentId, round: &Round) -> Result<(), StoreError> {
        self.update(id, |t| {
            if t.rounds.iter().any(|r| r.id == round.id) {
                return Ok(None);
            }
            t.rounds.push(round.clone());
            Ok(Some(StoreEvent::RoundCreated(round.id)))
        })
    }

    fn write_match(&self, id: TournamentId, m: &Match) -> Result<(), StoreError> {
        self.update(id, |t| {
            let existing = t.find_match_mut(m.id).ok_or(StoreError::MatchNotFound(m.id))?;
            *existing = m.clone();
            Ok(Some(StoreEvent::MatchChanged(m.id)))
        })
    }

    fn write_participant_score_update(&self, id: TournamentId, update: &ScoreUpdate) -> Result<(), StoreError> {
        self.update(id, |t| {
            let p = t
                .participant_mut(update.participant)
                .ok_or(StoreError::ParticipantNotFound(update.participant))?;
            p.points = update.points;
            p.tiebreak1 = update.tiebreak1;
            p.tiebreak2 = update.tiebreak2;
            Ok(Some(StoreEvent::ParticipantChanged(update.participant)))
        })
    }

    fn write_tournament_status(&self, id: TournamentId, status: TournamentStatus) -> Result<(), StoreError> {
        self.update(id, |t| {
            t.status = status;
            Ok(Some(StoreEvent::StatusChanged(status)))
        })
    }

    fn write_timestamps(
        &self,
        id: TournamentId,
        started_at: Option<DateTime<Utc>>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        self.update(id, |t| {
            t.started_at = started_at;
            t.ended_at = ended_at;
            Ok(None)
        })
    }

    fn subscribe(&self, id: TournamentId) -> Result<broadcast::Receiver<StoreEvent>, StoreError> {
        self.read(id, |e| e.events.subscribe())
    }
}
