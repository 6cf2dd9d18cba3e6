mod base;
pub use base::WorkerManager;
