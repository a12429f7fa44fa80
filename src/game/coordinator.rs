//! Retryable units of work against the game store.
//!
//! Every mutating engine operation runs as fetch -> mutate -> save against a
//! fresh read. A losing writer re-reads and re-applies rather than blindly
//! overwriting, which serializes operations on the same game.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::game::core::{Game, MIN_PLAYERS};
use crate::game::repository::{GameStore, StoreError};
use crate::shared::{AppError, GameId};

/// Backoff policy for conflicting or transiently failing units of work.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(200),
        }
    }
}

enum AttemptError {
    /// Store-level failure, candidate for another attempt.
    Store(StoreError),
    /// Logical failure; retrying cannot fix an invalid submission.
    Terminal(AppError),
}

pub struct TransactionCoordinator {
    store: Arc<dyn GameStore>,
    policy: RetryPolicy,
}

impl TransactionCoordinator {
    pub fn new(store: Arc<dyn GameStore>, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Runs `op` against a freshly fetched aggregate and commits the result.
    ///
    /// `op` must be safe to re-execute: each attempt gets its own fresh read,
    /// and a conflicting save throws the attempt's aggregate away. Validation
    /// errors from `op` are terminal and returned immediately. Exhausted
    /// retries surface as `TransactionFailed` wrapping the last store error.
    pub async fn perform<T, F>(&self, game_id: GameId, op: F) -> Result<T, AppError>
    where
        F: Fn(&mut Game) -> Result<T, AppError> + Send + Sync + 'static,
        T: Send + 'static,
    {
        let op = Arc::new(op);
        let mut attempt = 0;
        loop {
            attempt += 1;

            // Each attempt runs on its own task: once a unit of work has begun
            // against the store it runs to completion even if the caller drops
            // this future, so a cancellation cannot split a write.
            let outcome = tokio::spawn(Self::run_attempt(
                self.store.clone(),
                game_id,
                op.clone(),
            ))
            .await
            .map_err(|err| AppError::Internal(format!("transaction task failed: {err}")))?;

            match outcome {
                Ok(value) => return Ok(value),
                Err(AttemptError::Terminal(err)) => return Err(err),
                Err(AttemptError::Store(err)) => {
                    if err.is_retryable() && attempt < self.policy.max_attempts {
                        warn!(
                            %game_id,
                            attempt,
                            error = %err,
                            "Store rejected unit of work, retrying from a fresh read"
                        );
                        tokio::time::sleep(self.policy.delay).await;
                        continue;
                    }
                    error!(%game_id, attempts = attempt, error = %err, "Transaction failed");
                    return Err(AppError::TransactionFailed {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }

    async fn run_attempt<T, F>(
        store: Arc<dyn GameStore>,
        game_id: GameId,
        op: Arc<F>,
    ) -> Result<T, AttemptError>
    where
        F: Fn(&mut Game) -> Result<T, AppError> + Send + Sync + 'static,
        T: Send + 'static,
    {
        let mut game = store
            .fetch(game_id)
            .await
            .map_err(AttemptError::Store)?
            .ok_or(AttemptError::Terminal(AppError::GameNotFound(game_id)))?;

        let value = (*op)(&mut game).map_err(AttemptError::Terminal)?;

        store.save(&game).await.map_err(AttemptError::Store)?;
        Self::verify_committed(&store, game_id)
            .await
            .map_err(AttemptError::Store)?;

        Ok(value)
    }

    /// Persists a brand-new aggregate, retrying transient store failures.
    pub async fn create(&self, game: Game) -> Result<Game, AppError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.store.save(&game).await {
                Ok(_) => {
                    let committed = Self::verify_committed(&self.store, game.id()).await?;
                    return Ok(committed);
                }
                // A conflict on create means someone else owns this id; a
                // blind re-save can never win, so surface it.
                Err(err @ StoreError::Conflict(_)) => return Err(err.into()),
                Err(err) => {
                    if attempt < self.policy.max_attempts {
                        warn!(game_id = %game.id(), attempt, error = %err, "Create failed, retrying");
                        tokio::time::sleep(self.policy.delay).await;
                        continue;
                    }
                    return Err(AppError::TransactionFailed {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }

    /// Re-fetches the aggregate after commit and checks that its expected
    /// relationships survived. Guards against eventually-consistent merges in
    /// the underlying store handing back a hollowed-out aggregate.
    async fn verify_committed(
        store: &Arc<dyn GameStore>,
        game_id: GameId,
    ) -> Result<Game, StoreError> {
        match store.fetch(game_id).await? {
            Some(game) if game.player_count() >= MIN_PLAYERS && game.round(1).is_some() => Ok(game),
            Some(_) => Err(StoreError::Unavailable(format!(
                "game {game_id} re-read with missing players or rounds after commit"
            ))),
            None => Err(StoreError::Unavailable(format!(
                "game {game_id} missing after commit"
            ))),
        }
    }
}
