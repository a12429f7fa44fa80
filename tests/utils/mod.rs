pub mod builders;
pub mod mocks;
pub mod setup;
