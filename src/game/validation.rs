//! Pure validation of round submissions against game invariants.
//!
//! Every variant carries enough context (round number, offending player ids)
//! for a caller to drive a corrective prompt without re-deriving anything.

use thiserror::Error;

use crate::game::core::{
    Game, Round, FIRST_OPTIONAL_ROUND, LAST_OPTIONAL_ROUND, MAX_PLAYERS, MAX_ROUND_SCORE,
    MIN_PLAYERS, ROUND_COUNT,
};
use crate::shared::PlayerId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("A game takes {MIN_PLAYERS} to {MAX_PLAYERS} players, got {count}")]
    InvalidPlayerCount { count: usize },

    #[error("Dealer index {dealer_index} is out of range for {player_count} players")]
    InvalidDealerIndex {
        dealer_index: usize,
        player_count: usize,
    },

    #[error("Round number {number} is not valid for this operation")]
    InvalidRoundNumber { number: u8 },

    #[error("Round {round}: score map does not match the roster (missing {missing:?}, unexpected {unexpected:?})")]
    MissingScores {
        round: u8,
        missing: Vec<PlayerId>,
        unexpected: Vec<PlayerId>,
    },

    #[error("Round {round}: score {score} for player {player} is outside 0..={MAX_ROUND_SCORE}")]
    ScoreOutOfRange {
        round: u8,
        player: PlayerId,
        score: i32,
    },

    #[error("Round {round}: exactly one player must score 0")]
    NoWinner { round: u8 },

    #[error("Round {round}: more than one player scored 0")]
    MultipleWinners { round: u8, winners: Vec<PlayerId> },
}

/// Checks the fixed game setup: roster size and dealer index.
pub fn validate_setup(player_count: usize, dealer_index: usize) -> Result<(), ValidationError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(ValidationError::InvalidPlayerCount {
            count: player_count,
        });
    }
    if dealer_index >= player_count {
        return Err(ValidationError::InvalidDealerIndex {
            dealer_index,
            player_count,
        });
    }
    Ok(())
}

/// Checks a round against the game it belongs to.
///
/// A skipped round is valid only in 9-11 and carries no score constraints.
/// A normal round must score every roster member exactly once, each value in
/// 0..=999, with exactly one player at 0 (the round's winner).
pub fn validate_round(round: &Round, game: &Game) -> Result<(), ValidationError> {
    if round.number < 1 || round.number > ROUND_COUNT {
        return Err(ValidationError::InvalidRoundNumber {
            number: round.number,
        });
    }
    if round.dealer_index >= game.player_count() {
        return Err(ValidationError::InvalidDealerIndex {
            dealer_index: round.dealer_index,
            player_count: game.player_count(),
        });
    }

    if round.is_skipped {
        if !(FIRST_OPTIONAL_ROUND..=LAST_OPTIONAL_ROUND).contains(&round.number) {
            return Err(ValidationError::InvalidRoundNumber {
                number: round.number,
            });
        }
        return Ok(());
    }

    let mut missing: Vec<PlayerId> = game
        .player_ids()
        .filter(|id| !round.scores.contains_key(id))
        .collect();
    let mut unexpected: Vec<PlayerId> = round
        .scores
        .keys()
        .filter(|id| !game.has_player(**id))
        .copied()
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        missing.sort();
        unexpected.sort();
        return Err(ValidationError::MissingScores {
            round: round.number,
            missing,
            unexpected,
        });
    }

    for (player, score) in &round.scores {
        if !(0..=MAX_ROUND_SCORE).contains(score) {
            return Err(ValidationError::ScoreOutOfRange {
                round: round.number,
                player: *player,
                score: *score,
            });
        }
    }

    let mut winners: Vec<PlayerId> = round
        .scores
        .iter()
        .filter(|(_, score)| **score == 0)
        .map(|(id, _)| *id)
        .collect();
    winners.sort();

    match winners.len() {
        1 => Ok(()),
        0 => Err(ValidationError::NoWinner {
            round: round.number,
        }),
        _ => Err(ValidationError::MultipleWinners {
            round: round.number,
            winners,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::core::Seat;
    use crate::shared::GameId;
    use rstest::rstest;
    use std::collections::HashMap;

    fn game_with(players: usize) -> Game {
        let seats = (0..players)
            .map(|i| Seat {
                player_id: PlayerId::new(),
                name: format!("Player {i}"),
            })
            .collect();
        Game::new(GameId::new(), seats, 0).unwrap()
    }

    fn scored_round(game: &Game, number: u8, scores: &[i32]) -> Round {
        let mut round = Round::new(number, 0);
        round.scores = game
            .player_ids()
            .zip(scores.iter().copied())
            .collect::<HashMap<_, _>>();
        round
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    fn setup_rejects_bad_player_counts(#[case] count: usize) {
        assert_eq!(
            validate_setup(count, 0),
            Err(ValidationError::InvalidPlayerCount { count })
        );
    }

    #[rstest]
    #[case(2, 2)]
    #[case(4, 7)]
    fn setup_rejects_out_of_range_dealer(#[case] players: usize, #[case] dealer: usize) {
        assert_eq!(
            validate_setup(players, dealer),
            Err(ValidationError::InvalidDealerIndex {
                dealer_index: dealer,
                player_count: players
            })
        );
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn rejects_round_number_outside_schedule(#[case] number: u8) {
        let game = game_with(2);
        let round = Round::new(number, 0);
        assert_eq!(
            validate_round(&round, &game),
            Err(ValidationError::InvalidRoundNumber { number })
        );
    }

    #[test]
    fn rejects_dealer_beyond_roster() {
        let game = game_with(2);
        let round = Round::new(1, 2);
        assert_eq!(
            validate_round(&round, &game),
            Err(ValidationError::InvalidDealerIndex {
                dealer_index: 2,
                player_count: 2
            })
        );
    }

    #[rstest]
    #[case(9)]
    #[case(10)]
    #[case(11)]
    fn skip_is_valid_in_optional_rounds(#[case] number: u8) {
        let game = game_with(3);
        let mut round = Round::new(number, 0);
        round.is_skipped = true;
        assert_eq!(validate_round(&round, &game), Ok(()));
    }

    #[rstest]
    #[case(1)]
    #[case(8)]
    #[case(12)]
    fn skip_is_rejected_elsewhere(#[case] number: u8) {
        let game = game_with(3);
        let mut round = Round::new(number, 0);
        round.is_skipped = true;
        assert_eq!(
            validate_round(&round, &game),
            Err(ValidationError::InvalidRoundNumber { number })
        );
    }

    #[test]
    fn skipped_round_ignores_score_constraints() {
        let game = game_with(2);
        let mut round = Round::new(9, 0);
        round.is_skipped = true;
        // Stray data must not matter on a skipped round.
        round.scores.insert(PlayerId::new(), 5000);
        assert_eq!(validate_round(&round, &game), Ok(()));
    }

    #[test]
    fn accepts_exactly_one_winner() {
        let game = game_with(3);
        let round = scored_round(&game, 1, &[0, 10, 15]);
        assert_eq!(validate_round(&round, &game), Ok(()));
    }

    #[test]
    fn rejects_missing_player_score() {
        let game = game_with(3);
        let mut round = scored_round(&game, 1, &[0, 10, 15]);
        let dropped = game.player_ids().nth(2).unwrap();
        round.scores.remove(&dropped);

        match validate_round(&round, &game) {
            Err(ValidationError::MissingScores { round: 1, missing, unexpected }) => {
                assert_eq!(missing, vec![dropped]);
                assert!(unexpected.is_empty());
            }
            other => panic!("expected MissingScores, got {other:?}"),
        }
    }

    #[test]
    fn rejects_score_for_unknown_player() {
        let game = game_with(2);
        let mut round = scored_round(&game, 1, &[0, 10]);
        let outsider = PlayerId::new();
        round.scores.insert(outsider, 3);

        match validate_round(&round, &game) {
            Err(ValidationError::MissingScores { unexpected, missing, .. }) => {
                assert_eq!(unexpected, vec![outsider]);
                assert!(missing.is_empty());
            }
            other => panic!("expected MissingScores, got {other:?}"),
        }
    }

    #[rstest]
    #[case(-1)]
    #[case(1000)]
    fn rejects_out_of_range_scores(#[case] bad: i32) {
        let game = game_with(2);
        let round = scored_round(&game, 1, &[0, bad]);
        assert!(matches!(
            validate_round(&round, &game),
            Err(ValidationError::ScoreOutOfRange { round: 1, score, .. }) if score == bad
        ));
    }

    #[test]
    fn boundary_score_of_999_is_accepted() {
        let game = game_with(2);
        let round = scored_round(&game, 1, &[0, 999]);
        assert_eq!(validate_round(&round, &game), Ok(()));
    }

    #[test]
    fn rejects_round_with_no_winner() {
        let game = game_with(2);
        let round = scored_round(&game, 4, &[5, 10]);
        assert_eq!(
            validate_round(&round, &game),
            Err(ValidationError::NoWinner { round: 4 })
        );
    }

    #[test]
    fn rejects_round_with_two_winners() {
        let game = game_with(3);
        let round = scored_round(&game, 2, &[0, 0, 12]);
        match validate_round(&round, &game) {
            Err(ValidationError::MultipleWinners { round: 2, winners }) => {
                assert_eq!(winners.len(), 2);
            }
            other => panic!("expected MultipleWinners, got {other:?}"),
        }
    }
}
