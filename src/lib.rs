// Library crate for the round-scoring engine.
// This file exposes the public API for integration tests and embedding callers.

pub mod game;
pub mod player;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use game::{
    Game, GameService, GameStore, InMemoryGameStore, PlayerSnapshot, RetryPolicy, Round,
    RoundOutcome, Seat, TransactionCoordinator, ValidationError,
};
pub use player::{InMemoryPlayerRepository, Player, PlayerRepository};
pub use shared::{AppError, GameId, PlayerId};
pub use stats::{PlayerStats, StatsService};
