mod base;
mod config;
mod stat;
pub use base::Coordinator;
pub use config::HogwildTrainerConfig;
pub use stat::CoordinatorStat;
