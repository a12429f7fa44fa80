use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::game::repository::StoreError;
use crate::game::validation::ValidationError;

/// Identifier of a game aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a player. Games carry a fixed roster of player ids; profile
/// data (name, guest flag, lifetime aggregates) lives in the player repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Top-level error surfaced by the engine's command/query API.
///
/// Validation failures are terminal and never retried. Conflicts and transient
/// store failures are retried inside the transaction coordinator and only show
/// up here wrapped in `TransactionFailed` once retries are exhausted.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Game {0} is already completed")]
    GameCompleted(GameId),

    #[error("Round {0} is not correctable")]
    RoundNotCorrectable(u8),

    #[error("Transaction failed after {attempts} attempts")]
    TransactionFailed {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
