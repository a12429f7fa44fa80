//! Shared test wiring.
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;

use roundbook::game::InMemoryGameStore;
use roundbook::{GameService, InMemoryPlayerRepository, RetryPolicy, StatsService};

/// Installs a tracing subscriber honoring RUST_LOG, once per process.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestSetup {
    pub store: Arc<InMemoryGameStore>,
    pub players: Arc<InMemoryPlayerRepository>,
    pub game_service: GameService,
    pub stats_service: StatsService,
}

impl TestSetup {
    pub fn new() -> Self {
        init_tracing();
        let store = Arc::new(InMemoryGameStore::new());
        let players = Arc::new(InMemoryPlayerRepository::new());
        let game_service = GameService::with_policy(
            store.clone(),
            RetryPolicy {
                max_attempts: 3,
                delay: std::time::Duration::from_millis(1),
            },
        );
        let stats_service = StatsService::new(store.clone(), players.clone());
        Self {
            store,
            players,
            game_service,
            stats_service,
        }
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}
