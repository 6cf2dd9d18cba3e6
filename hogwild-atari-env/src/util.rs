//! Utilities for test.
pub mod test;
