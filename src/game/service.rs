use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::game::coordinator::{RetryPolicy, TransactionCoordinator};
use crate::game::core::{CardColor, Game, GameError, RoundOutcome, Seat};
use crate::game::repository::GameStore;
use crate::shared::{AppError, GameId, PlayerId};

/// Command and query surface of the engine. Every mutation is a retryable
/// unit of work through the transaction coordinator; reads go straight to
/// the store.
pub struct GameService {
    store: Arc<dyn GameStore>,
    coordinator: TransactionCoordinator,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: Arc<dyn GameStore>, policy: RetryPolicy) -> Self {
        let coordinator = TransactionCoordinator::new(store.clone(), policy);
        Self { store, coordinator }
    }

    /// Creates a game with a fixed roster and the given starting dealer.
    /// Round 1 is materialized immediately.
    pub async fn create_game(
        &self,
        seats: Vec<Seat>,
        dealer_index: usize,
    ) -> Result<Game, AppError> {
        let game = Game::new(GameId::new(), seats, dealer_index)?;
        info!(
            game_id = %game.id(),
            players = game.player_count(),
            dealer_index,
            "Creating game"
        );
        self.coordinator.create(game).await
    }

    /// Submits scores for the current round of `game_id`.
    pub async fn submit_scores(
        &self,
        game_id: GameId,
        scores: HashMap<PlayerId, i32>,
    ) -> Result<RoundOutcome, AppError> {
        self.coordinator
            .perform(game_id, move |game| {
                game.submit_scores(scores.clone())
                    .map_err(|err| map_game_error(game_id, err))
            })
            .await
    }

    /// Skips the current round. Only legal in rounds 9-11.
    pub async fn skip_round(&self, game_id: GameId) -> Result<RoundOutcome, AppError> {
        self.coordinator
            .perform(game_id, move |game| {
                game.skip_round().map_err(|err| map_game_error(game_id, err))
            })
            .await
    }

    /// Skips every remaining optional round in one unit of work, leaving the
    /// game at round 12.
    pub async fn skip_optional_rounds(&self, game_id: GameId) -> Result<RoundOutcome, AppError> {
        self.coordinator
            .perform(game_id, move |game| {
                game.skip_through_optional()
                    .map_err(|err| map_game_error(game_id, err))
            })
            .await
    }

    /// Out-of-band correction of an already-completed round's scores.
    /// Re-validates, does not re-run dealer rotation.
    pub async fn correct_scores(
        &self,
        game_id: GameId,
        round_number: u8,
        scores: HashMap<PlayerId, i32>,
    ) -> Result<(), AppError> {
        self.coordinator
            .perform(game_id, move |game| {
                game.correct_scores(round_number, scores.clone())
                    .map_err(|err| map_game_error(game_id, err))
            })
            .await
    }

    /// Records the cosmetic first-card tag on the current round.
    pub async fn set_first_card_color(
        &self,
        game_id: GameId,
        color: CardColor,
    ) -> Result<(), AppError> {
        self.coordinator
            .perform(game_id, move |game| {
                game.set_first_card_color(color)
                    .map_err(|err| map_game_error(game_id, err))
            })
            .await
    }

    /// Repairs a game whose `is_active` flag went stale relative to its round
    /// record. Returns whether a repair was committed.
    pub async fn reconcile_completion(&self, game_id: GameId) -> Result<bool, AppError> {
        self.coordinator
            .perform(game_id, move |game| Ok(game.reconcile_completion()))
            .await
    }

    pub async fn get_game(&self, game_id: GameId) -> Result<Game, AppError> {
        self.store
            .fetch(game_id)
            .await?
            .ok_or(AppError::GameNotFound(game_id))
    }

    /// Deletes the game and, with it, all its owned rounds.
    pub async fn delete_game(&self, game_id: GameId) -> Result<(), AppError> {
        self.store.delete(game_id).await?;
        info!(%game_id, "Deleted game");
        Ok(())
    }
}

fn map_game_error(game_id: GameId, err: GameError) -> AppError {
    match err {
        GameError::Validation(err) => err.into(),
        GameError::AlreadyCompleted => AppError::GameCompleted(game_id),
        GameError::RoundNotCorrectable(number) => AppError::RoundNotCorrectable(number),
    }
}
