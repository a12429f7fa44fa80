//! Mock store collaborators.
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use roundbook::game::{GameStore, InMemoryGameStore, StoreError};
use roundbook::{Game, GameId, PlayerId};

/// Store wrapper simulating an external concurrent writer: the first
/// `failures` saves are rejected with a conflict, later saves go through.
pub struct ConflictingStore {
    pub inner: Arc<InMemoryGameStore>,
    failures: AtomicU32,
    pub save_attempts: AtomicU32,
}

impl ConflictingStore {
    pub fn failing_first(failures: u32) -> Self {
        Self::over(Arc::new(InMemoryGameStore::new()), failures)
    }

    /// Wraps an existing store so already-seeded games stay visible.
    pub fn over(inner: Arc<InMemoryGameStore>, failures: u32) -> Self {
        Self {
            inner,
            failures: AtomicU32::new(failures),
            save_attempts: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl GameStore for ConflictingStore {
    async fn fetch(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        self.inner.fetch(id).await
    }

    async fn save(&self, game: &Game) -> Result<u64, StoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict(game.id()));
        }
        self.inner.save(game).await
    }

    async fn delete(&self, id: GameId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn completed_games_for(&self, player_id: PlayerId) -> Result<Vec<Game>, StoreError> {
        self.inner.completed_games_for(player_id).await
    }
}
