use std::sync::Arc;

use tracing::debug;

use crate::game::repository::GameStore;
use crate::player::{PlayerError, PlayerRepository};
use crate::shared::PlayerId;

use super::{PlayerStats, StatsError};

/// Recomputes lifetime statistics from the archive of completed games.
///
/// This is a pure full recompute, not an incremental update: every call scans
/// the player's completed-game snapshots and derives the aggregates from
/// scratch, so re-running it any number of times yields the same result and
/// retried transactions cannot double-count anything.
pub struct StatsService {
    games: Arc<dyn GameStore>,
    players: Arc<dyn PlayerRepository>,
}

impl StatsService {
    pub fn new(games: Arc<dyn GameStore>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { games, players }
    }

    /// Derives the player's lifetime aggregates from their completed-game
    /// snapshots and persists them on the profile.
    pub async fn recompute(&self, player_id: PlayerId) -> Result<PlayerStats, StatsError> {
        let stats = self.derive(player_id).await?;

        self.players
            .apply_stats(&stats)
            .await
            .map_err(|err| match err {
                PlayerError::NotFound(id) => StatsError::PlayerNotFound(id),
                PlayerError::AlreadyExists(id) => StatsError::PlayerNotFound(id),
            })?;

        Ok(stats)
    }

    /// The recompute itself, without persisting. Reads only archived
    /// snapshots, never the round-by-round history of a completed game.
    pub async fn derive(&self, player_id: PlayerId) -> Result<PlayerStats, StatsError> {
        let games = self.games.completed_games_for(player_id).await?;

        let snapshots: Vec<_> = games
            .iter()
            .filter_map(|game| {
                game.snapshots()
                    .iter()
                    .find(|snapshot| snapshot.player_id == player_id)
            })
            .collect();

        debug!(
            %player_id,
            completed_games = snapshots.len(),
            "Recomputing lifetime statistics"
        );

        if snapshots.is_empty() {
            return Ok(PlayerStats::empty(player_id));
        }

        let games_played = snapshots.len() as u32;
        let games_won = snapshots.iter().filter(|s| s.position == 1).count() as u32;
        let total_score = snapshots.iter().map(|s| s.score as i64).sum();
        let average_position =
            snapshots.iter().map(|s| s.position as f64).sum::<f64>() / snapshots.len() as f64;

        Ok(PlayerStats {
            player_id,
            games_played,
            games_won,
            total_score,
            average_position,
        })
    }
}
