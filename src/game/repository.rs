use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::game::core::Game;
use crate::shared::{GameId, PlayerId};

/// Failures reported by the persistent store. Both variants are retryable:
/// a conflict means a concurrent writer won and the unit of work must re-read,
/// an unavailable store is a transient I/O condition.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Concurrent modification of game {0}")]
    Conflict(GameId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict(_) | StoreError::Unavailable(_))
    }
}

/// Transactional key-object store for game aggregates. A save commits the
/// game and all its owned rounds as one unit or not at all.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn fetch(&self, id: GameId) -> Result<Option<Game>, StoreError>;

    /// Commits the aggregate, detecting concurrent modification via the
    /// game's version token. Returns the committed version.
    async fn save(&self, game: &Game) -> Result<u64, StoreError>;

    async fn delete(&self, id: GameId) -> Result<(), StoreError>;

    /// Completed games (snapshot archived) that include the player. This is
    /// the read path for lifetime statistics.
    async fn completed_games_for(&self, player_id: PlayerId) -> Result<Vec<Game>, StoreError>;
}

/// In-memory store with compare-and-swap saves keyed on the aggregate's
/// version counter.
#[derive(Default)]
pub struct InMemoryGameStore {
    games: Arc<RwLock<HashMap<GameId, Game>>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn fetch(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        let games = self.games.read().await;
        Ok(games.get(&id).cloned())
    }

    async fn save(&self, game: &Game) -> Result<u64, StoreError> {
        let mut games = self.games.write().await;
        if let Some(existing) = games.get(&game.id()) {
            if existing.version() != game.version() {
                return Err(StoreError::Conflict(game.id()));
            }
        }
        let mut committed = game.clone();
        committed.set_version(game.version() + 1);
        let version = committed.version();
        games.insert(game.id(), committed);
        Ok(version)
    }

    async fn delete(&self, id: GameId) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        games.remove(&id);
        Ok(())
    }

    async fn completed_games_for(&self, player_id: PlayerId) -> Result<Vec<Game>, StoreError> {
        let games = self.games.read().await;
        Ok(games
            .values()
            .filter(|game| {
                game.snapshots()
                    .iter()
                    .any(|snapshot| snapshot.player_id == player_id)
            })
            .cloned()
            .collect())
    }
}
