use serde::{Deserialize, Serialize};

use crate::shared::PlayerId;

/// Lifetime aggregates for one player, derived in full from the snapshots of
/// the completed games they appear in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub games_played: u32,
    pub games_won: u32,
    pub total_score: i64,
    /// Mean final position across completed games; 0.0 with no games.
    pub average_position: f64,
}

impl PlayerStats {
    pub fn empty(player_id: PlayerId) -> Self {
        Self {
            player_id,
            games_played: 0,
            games_won: 0,
            total_score: 0,
            average_position: 0.0,
        }
    }
}
