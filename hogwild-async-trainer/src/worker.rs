mod base;
mod stat;
pub use base::{Worker, WorkerShared};
pub use stat::{worker_stats_fmt, WorkerStat};
