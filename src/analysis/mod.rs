pub mod associations;
pub mod health;
pub mod performance;
pub mod trend;
