mod errors;
pub mod models;
pub mod service;

pub use errors::StatsError;
pub use models::PlayerStats;
pub use service::StatsService;
