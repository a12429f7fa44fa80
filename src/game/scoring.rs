//! Pure scoring functions: per-player totals, ascending rankings and the
//! immutable completion snapshot.

use serde::{Deserialize, Serialize};

use crate::game::core::Game;
use crate::shared::PlayerId;

/// Immutable per-player record of a completed game: final score and rank.
/// Created once at completion; lifetime statistics read only these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    pub score: i32,
    /// 1-based rank, ascending by total score (lower is better).
    pub position: usize,
}

/// Sum of a player's scores over completed, non-skipped rounds. Skipped and
/// in-progress rounds contribute nothing, whatever stray data they carry.
pub fn total_score(game: &Game, player_id: PlayerId) -> i32 {
    game.rounds()
        .filter(|round| round.is_scored())
        .map(|round| round.scores.get(&player_id).copied().unwrap_or(0))
        .sum()
}

/// All players ordered ascending by total score. Ties keep seat order: the
/// sort is stable over the game's fixed roster, so two tied players rank in
/// the order they sit.
pub fn ranking(game: &Game) -> Vec<(PlayerId, i32)> {
    let mut totals: Vec<(PlayerId, i32)> = game
        .player_ids()
        .map(|id| (id, total_score(game, id)))
        .collect();
    totals.sort_by_key(|&(_, total)| total);
    totals
}

/// One snapshot per player, positions 1..=player_count assigned along the
/// ranking. Pure: callers decide whether the result gets archived.
pub fn build_snapshots(game: &Game) -> Vec<PlayerSnapshot> {
    ranking(game)
        .into_iter()
        .enumerate()
        .map(|(index, (player_id, score))| PlayerSnapshot {
            player_id,
            name: game
                .seats()
                .iter()
                .find(|seat| seat.player_id == player_id)
                .map(|seat| seat.name.clone())
                .unwrap_or_default(),
            score,
            position: index + 1,
        })
        .collect()
}
