//! Player profiles and their repository.
//!
//! A profile carries the display name, the guest flag and the lifetime
//! aggregates. The aggregates are derived data: nothing outside the
//! statistics recompute writes them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::shared::PlayerId;
use crate::stats::PlayerStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_guest: bool,
    pub games_played: u32,
    pub games_won: u32,
    pub total_score: i64,
    pub average_position: f64,
}

impl Player {
    pub fn new(name: impl Into<String>, is_guest: bool) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            is_guest,
            games_played: 0,
            games_won: 0,
            total_score: 0,
            average_position: 0.0,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlayerError {
    #[error("Player {0} already exists")]
    AlreadyExists(PlayerId),

    #[error("Player not found: {0}")]
    NotFound(PlayerId),
}

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn register(&self, player: Player) -> Result<(), PlayerError>;

    async fn get(&self, id: PlayerId) -> Option<Player>;

    /// Overwrites the derived lifetime aggregates with a freshly recomputed
    /// set. The only write path for those fields.
    async fn apply_stats(&self, stats: &PlayerStats) -> Result<(), PlayerError>;

    async fn all_players(&self) -> Vec<Player>;

    async fn remove(&self, id: PlayerId) -> bool;
}

/// In-memory implementation. Uses RwLock for concurrent access with read
/// optimization.
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: Arc<RwLock<HashMap<PlayerId, Player>>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn register(&self, player: Player) -> Result<(), PlayerError> {
        let mut players = self.players.write().await;
        if players.contains_key(&player.id) {
            return Err(PlayerError::AlreadyExists(player.id));
        }

        info!(
            player_id = %player.id,
            name = %player.name,
            is_guest = player.is_guest,
            "Registered player"
        );
        players.insert(player.id, player);
        Ok(())
    }

    async fn get(&self, id: PlayerId) -> Option<Player> {
        let players = self.players.read().await;
        let result = players.get(&id).cloned();

        debug!(player_id = %id, found = result.is_some(), "Player lookup");
        result
    }

    async fn apply_stats(&self, stats: &PlayerStats) -> Result<(), PlayerError> {
        let mut players = self.players.write().await;
        let player = players
            .get_mut(&stats.player_id)
            .ok_or(PlayerError::NotFound(stats.player_id))?;

        player.games_played = stats.games_played;
        player.games_won = stats.games_won;
        player.total_score = stats.total_score;
        player.average_position = stats.average_position;
        Ok(())
    }

    async fn all_players(&self) -> Vec<Player> {
        let players = self.players.read().await;
        players.values().cloned().collect()
    }

    async fn remove(&self, id: PlayerId) -> bool {
        let mut players = self.players.write().await;
        players.remove(&id).is_some()
    }
}
