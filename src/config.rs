//! Service configuration.

use std::env;

/// Environment variable holding a fixed RNG seed for round-1 shuffles.
pub const RNG_SEED_VAR: &str = "SWISS_RNG_SEED";
/// Environment variable holding how many times a store write is attempted.
pub const WRITE_ATTEMPTS_VAR: &str = "SWISS_WRITE_ATTEMPTS";

/// Settings for [`crate::TournamentService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Seed for the pairing RNG (None = seeded from the OS).
    pub rng_seed: Option<u64>,
    /// Attempts per store write before giving up (at least 1).
    pub write_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            write_attempts: 3,
        }
    }
}

impl ServiceConfig {
    /// Defaults, overridden by `SWISS_RNG_SEED` and `SWISS_WRITE_ATTEMPTS` when set and valid.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(seed) = parse_var(RNG_SEED_VAR) {
            config.rng_seed = Some(seed);
        }
        if let Some(attempts) = parse_var(WRITE_ATTEMPTS_VAR) {
            config.write_attempts = attempts;
        }
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_write_attempts(mut self, attempts: u32) -> Self {
        self.write_attempts = attempts;
        self
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}
