// Public API
pub use coordinator::{RetryPolicy, TransactionCoordinator};
pub use core::{CardColor, Game, GameError, Round, RoundOutcome, Seat};
pub use repository::{GameStore, InMemoryGameStore, StoreError};
pub use scoring::{build_snapshots, ranking, total_score, PlayerSnapshot};
pub use service::GameService;
pub use validation::{validate_round, ValidationError};

// Internal modules
pub mod coordinator;
pub mod core;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod validation;
