//! Game setup utilities.
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::collections::HashMap;

use roundbook::{Game, GameId, GameService, PlayerId, Seat};

pub fn seats(names: &[&str]) -> Vec<Seat> {
    names
        .iter()
        .map(|name| Seat {
            player_id: PlayerId::new(),
            name: name.to_string(),
        })
        .collect()
}

/// Score map where `winner_index` scores 0 and everyone else a distinct
/// positive value.
pub fn scores_with_winner(game: &Game, winner_index: usize) -> HashMap<PlayerId, i32> {
    game.player_ids()
        .enumerate()
        .map(|(i, id)| (id, if i == winner_index { 0 } else { 10 + 5 * i as i32 }))
        .collect()
}

/// Score map from explicit per-seat values, in roster order.
pub fn scores_by_seat(game: &Game, values: &[i32]) -> HashMap<PlayerId, i32> {
    game.player_ids().zip(values.iter().copied()).collect()
}

/// Submits winning rounds until the game sits at `target`, `winner_index`
/// winning every round on the way.
pub async fn play_to_round(
    service: &GameService,
    game_id: GameId,
    target: u8,
    winner_index: usize,
) -> Game {
    loop {
        let game = service.get_game(game_id).await.unwrap();
        if game.current_round() >= target {
            return game;
        }
        service
            .submit_scores(game_id, scores_with_winner(&game, winner_index))
            .await
            .unwrap();
    }
}

/// Drives a game from wherever it is to completion: mandatory rounds won by
/// `winner_index`, optional rounds skipped, round 12 submitted.
pub async fn complete_game(service: &GameService, game_id: GameId, winner_index: usize) -> Game {
    play_to_round(service, game_id, 9, winner_index).await;
    service.skip_optional_rounds(game_id).await.unwrap();
    let game = service.get_game(game_id).await.unwrap();
    service
        .submit_scores(game_id, scores_with_winner(&game, winner_index))
        .await
        .unwrap();
    service.get_game(game_id).await.unwrap()
}
