use thiserror::Error;

use crate::game::repository::StoreError;
use crate::shared::PlayerId;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),
}
