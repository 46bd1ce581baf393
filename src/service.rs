//! Orchestration: read a fresh snapshot from the store, run the engine, persist the result.
//!
//! Mutating calls are serialized per tournament, so two round generations for
//! the same tournament can never interleave.

use crate::config::ServiceConfig;
use crate::ids::{IdGenerator, RandomIds};
use crate::logic::{self, standings_table, write_standings_csv, StandingRow};
use crate::models::{MatchId, MatchResult, ParticipantId, Tournament, TournamentError, TournamentId};
use crate::store::{ScoreUpdate, StoreError, StoreEvent, TournamentStore};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Runs tournament operations against a [`TournamentStore`].
pub struct TournamentService<S> {
    store: S,
    config: ServiceConfig,
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
    rng: Mutex<StdRng>,
    ids: Mutex<Box<dyn IdGenerator + Send>>,
}

impl<S: TournamentStore> TournamentService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self::with_ids(store, config, RandomIds)
    }

    pub fn with_ids(store: S, config: ServiceConfig, ids: impl IdGenerator + Send + 'static) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
            ids: Mutex::new(Box::new(ids)),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_tournament(&self, name: &str) -> ServiceResult<Tournament> {
        let id = self.next_id();
        let tournament = Tournament::new(id, name.trim());
        self.retry("create tournament", || self.store.create_tournament(&tournament))?;
        log::info!("created tournament {} ({})", tournament.name, id);
        Ok(tournament)
    }

    pub fn tournament(&self, id: TournamentId) -> ServiceResult<Tournament> {
        Ok(self.store.fetch_tournament(id)?)
    }

    pub fn subscribe(&self, id: TournamentId) -> ServiceResult<broadcast::Receiver<StoreEvent>> {
        Ok(self.store.subscribe(id)?)
    }

    pub fn add_participant(&self, id: TournamentId, name: &str) -> ServiceResult<Tournament> {
        self.mutate(id, |t| {
            let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
            let (next, _) = logic::add_participant(t, name, &mut **ids)?;
            Ok(next)
        })
    }

    pub fn remove_participant(&self, id: TournamentId, participant: ParticipantId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| logic::remove_participant(t, participant))
    }

    pub fn drop_participant(&self, id: TournamentId, participant: ParticipantId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| logic::drop_participant(t, participant))
    }

    pub fn close(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.mutate(id, logic::close)
    }

    pub fn reopen(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.mutate(id, logic::reopen)
    }

    pub fn start(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| logic::start(t, Utc::now()))
    }

    pub fn record_result(&self, id: TournamentId, match_id: MatchId, result: MatchResult) -> ServiceResult<Tournament> {
        self.mutate(id, |t| logic::record_result(t, match_id, result))
    }

    pub fn reopen_match(&self, id: TournamentId, match_id: MatchId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| logic::reopen_match(t, match_id))
    }

    pub fn finalize_rounds(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.mutate(id, |t| logic::finalize_rounds(t, Utc::now()))
    }

    pub fn confirm(&self, id: TournamentId) -> ServiceResult<Tournament> {
        self.mutate(id, logic::confirm)
    }

    /// Pair the next round.
    ///
    /// Scores for every participant are recomputed and written before pairing
    /// runs; pairing then works from a fresh read of participants and rounds.
    pub fn generate_round(&self, id: TournamentId) -> ServiceResult<Tournament> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut current = self.store.fetch_tournament(id)?;
        // Reject illegal calls before writing anything.
        logic::check_can_generate(&current)?;

        let refreshed = logic::refresh_standings(&current.participants, &current.rounds);
        for p in refreshed.iter().filter(|p| p.is_active()) {
            let update = ScoreUpdate::of(p);
            self.retry("score update", || {
                self.store.write_participant_score_update(id, &update)
            })?;
        }

        current.participants = self.store.fetch_participants(id)?;
        current.rounds = self.store.fetch_rounds(id)?;

        let next = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
            logic::next_round(&current, &mut *rng, &mut **ids)?
        };
        self.persist(&current, &next)?;
        Ok(next)
    }

    pub fn standings(&self, id: TournamentId) -> ServiceResult<Vec<StandingRow>> {
        let participants = self.store.fetch_participants(id)?;
        Ok(standings_table(&participants))
    }

    pub fn standings_csv(&self, id: TournamentId) -> ServiceResult<String> {
        let rows = self.standings(id)?;
        let mut buf = Vec::new();
        write_standings_csv(&rows, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Run `op` on a fresh snapshot inside the tournament's critical section and persist the difference.
    fn mutate(
        &self,
        id: TournamentId,
        op: impl FnOnce(&Tournament) -> Result<Tournament, TournamentError>,
    ) -> ServiceResult<Tournament> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.store.fetch_tournament(id)?;
        let next = op(&current)?;
        self.persist(&current, &next)?;
        Ok(next)
    }

    /// Write everything that differs between two snapshots of the same tournament.
    fn persist(&self, before: &Tournament, after: &Tournament) -> ServiceResult<()> {
        let id = after.id;

        for p in &before.participants {
            if after.participant(p.id).is_none() {
                self.retry("delete participant", || self.store.delete_participant(id, p.id))?;
            }
        }
        for p in &after.participants {
            if before.participant(p.id) != Some(p) {
                self.retry("write participant", || self.store.write_participant(id, p))?;
            }
        }

        for round in &after.rounds {
            match before.rounds.iter().find(|r| r.id == round.id) {
                None => self.retry("write round", || self.store.write_round(id, round))?,
                Some(old) => {
                    for m in &round.matches {
                        if old.find_match(m.id) != Some(m) {
                            self.retry("write match", || self.store.write_match(id, m))?;
                        }
                    }
                }
            }
        }

        if before.started_at != after.started_at || before.ended_at != after.ended_at {
            self.retry("write timestamps", || {
                self.store.write_timestamps(id, after.started_at, after.ended_at)
            })?;
        }
        if before.status != after.status {
            self.retry("write status", || self.store.write_tournament_status(id, after.status))?;
            log::info!("tournament {}: {} -> {}", id, before.status, after.status);
        }
        Ok(())
    }

    /// Attempt a store write up to `write_attempts` times while it fails with a retryable error.
    fn retry<T>(&self, what: &str, mut op: impl FnMut() -> Result<T, StoreError>) -> Result<T, StoreError> {
        let attempts = self.config.write_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    log::warn!("{} failed (attempt {}/{}): {}", what, attempt, attempts, e);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn lock_for(&self, id: TournamentId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(id).or_default().clone()
    }

    fn next_id(&self) -> uuid::Uuid {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).next_id()
    }
}
